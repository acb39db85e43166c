use eframe::egui::Color32;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Colour of a plotted series.
///
/// `Cycle(i)` picks the i-th colour of the default cycle; measured series
/// use it, reference curves use the fixed colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesColor {
    Cycle(usize),
    Red,
}

/// Default colour cycle (blue, orange, green, red, purple, brown).
const CYCLE: [(u8, u8, u8); 6] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
];

impl SeriesColor {
    pub const BLUE: SeriesColor = SeriesColor::Cycle(0);
    pub const ORANGE: SeriesColor = SeriesColor::Cycle(1);
    pub const GREEN: SeriesColor = SeriesColor::Cycle(2);

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SeriesColor::Cycle(i) => CYCLE[i % CYCLE.len()],
            SeriesColor::Red => (0xff, 0x00, 0x00),
        }
    }

    pub fn to_color32(self) -> Color32 {
        let (r, g, b) = self.rgb();
        Color32::from_rgb(r, g, b)
    }

    pub fn to_rgb_color(self) -> RGBColor {
        let (r, g, b) = self.rgb();
        RGBColor(r, g, b)
    }
}
