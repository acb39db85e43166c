//! Print output (pdf, ps, eps) through a recording plotters backend.
//!
//! [`PrintBackend`] keeps every primitive the chart code draws as a
//! [`Mark`] in pixel space, then writes the page when the drawing area is
//! presented. Text is set in the standard Helvetica face, so no font files
//! are needed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Pt, Rgb, TextMatrix};

use crate::error::{Error, Result};

const PX_TO_PT: f64 = 0.75;
const PX_TO_MM: f64 = 0.264583;
/// Average Helvetica advance, in ems.
const EM_WIDTH: f64 = 0.55;
const CIRCLE_SEGMENTS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintFormat {
    Pdf,
    Ps,
    Eps,
}

/// One drawing primitive, in pixels with the origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Stroke {
        points: Vec<(f64, f64)>,
        closed: bool,
        rgb: (u8, u8, u8),
        width: f64,
    },
    Fill {
        points: Vec<(f64, f64)>,
        rgb: (u8, u8, u8),
    },
    /// `origin` is the start of the baseline; `angle` is counter-clockwise
    /// in degrees.
    Text {
        text: String,
        origin: (f64, f64),
        size: f64,
        rgb: (u8, u8, u8),
        angle: f64,
    },
}

pub struct PrintBackend {
    path: PathBuf,
    format: PrintFormat,
    size: (u32, u32),
    marks: Vec<Mark>,
    saved: bool,
}

impl PrintBackend {
    pub fn new(path: &Path, format: PrintFormat, size: (u32, u32)) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
            size,
            marks: Vec::new(),
            saved: false,
        }
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    fn stroke(&mut self, points: Vec<(f64, f64)>, closed: bool, style: &impl BackendStyle) {
        let color = style.color();
        if color.alpha == 0.0 || points.len() < 2 {
            return;
        }
        self.marks.push(Mark::Stroke {
            points,
            closed,
            rgb: flatten(color),
            width: f64::from(style.stroke_width().max(1)),
        });
    }

    fn fill(&mut self, points: Vec<(f64, f64)>, color: BackendColor) {
        if color.alpha == 0.0 || points.len() < 3 {
            return;
        }
        self.marks.push(Mark::Fill {
            points,
            rgb: flatten(color),
        });
    }
}

impl DrawingBackend for PrintBackend {
    type ErrorType = Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> std::result::Result<(), DrawingErrorKind<Error>> {
        Ok(())
    }

    fn present(&mut self) -> std::result::Result<(), DrawingErrorKind<Error>> {
        if self.saved {
            return Ok(());
        }
        write_print(&self.path, self.format, self.size, &self.marks)
            .map_err(DrawingErrorKind::DrawingError)?;
        self.saved = true;
        log::debug!("wrote {} marks to {}", self.marks.len(), self.path.display());
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        let (x, y) = (f64::from(point.0), f64::from(point.1));
        self.fill(vec![(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)], color);
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        self.stroke(vec![px(from), px(to)], false, style);
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        let (x0, y0) = px(upper_left);
        let (x1, y1) = px(bottom_right);
        let corners = vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        if fill {
            self.fill(corners, style.color());
        } else {
            self.stroke(corners, true, style);
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        self.stroke(path.into_iter().map(px).collect(), false, style);
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        let (cx, cy) = px(center);
        let r = f64::from(radius);
        let points = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
                (cx + r * t.cos(), cy + r * t.sin())
            })
            .collect();
        if fill {
            self.fill(points, style.color());
        } else {
            self.stroke(points, true, style);
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        self.fill(vert.into_iter().map(px).collect(), style.color());
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> std::result::Result<(), DrawingErrorKind<Error>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }
        let size = style.size();
        let anchor = style.anchor();
        let (origin, angle) = place_text(
            px(pos),
            anchor.h_pos,
            anchor.v_pos,
            style.transform(),
            text_width(text, size),
            size,
        );
        self.marks.push(Mark::Text {
            text: text.to_string(),
            origin,
            size,
            rgb: flatten(color),
            angle,
        });
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> std::result::Result<(u32, u32), DrawingErrorKind<Error>> {
        let size = style.size();
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }
}

fn px(coord: BackendCoord) -> (f64, f64) {
    (f64::from(coord.0), f64::from(coord.1))
}

/// Blend a translucent colour over the white page.
fn flatten(color: BackendColor) -> (u8, u8, u8) {
    let a = color.alpha.clamp(0.0, 1.0);
    let mix = |c: u8| (f64::from(c) * a + 255.0 * (1.0 - a)).round() as u8;
    (mix(color.rgb.0), mix(color.rgb.1), mix(color.rgb.2))
}

fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * EM_WIDTH
}

/// Baseline start and counter-clockwise angle of a text anchored at `pos`.
fn place_text(
    pos: (f64, f64),
    h: HPos,
    v: VPos,
    transform: FontTransform,
    width: f64,
    size: f64,
) -> ((f64, f64), f64) {
    let dx = match h {
        HPos::Left => 0.0,
        HPos::Center => -width / 2.0,
        HPos::Right => -width,
    };
    let dy = match v {
        VPos::Top => 0.8 * size,
        VPos::Center => 0.3 * size,
        VPos::Bottom => -0.2 * size,
    };
    let ((dx, dy), angle) = match transform {
        FontTransform::None => ((dx, dy), 0.0),
        FontTransform::Rotate90 => ((-dy, dx), -90.0),
        FontTransform::Rotate180 => ((-dx, -dy), 180.0),
        FontTransform::Rotate270 => ((dy, -dx), 90.0),
    };
    ((pos.0 + dx, pos.1 + dy), angle)
}

/// Write the recorded marks to `path`.
pub fn write_print(path: &Path, format: PrintFormat, size: (u32, u32), marks: &[Mark]) -> Result<()> {
    match format {
        PrintFormat::Pdf => write_pdf(path, size, marks),
        PrintFormat::Ps | PrintFormat::Eps => {
            let mut out = BufWriter::new(File::create(path)?);
            write_postscript(&mut out, size, marks, format == PrintFormat::Eps)?;
            out.flush()?;
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

fn write_pdf(path: &Path, size: (u32, u32), marks: &[Mark]) -> Result<()> {
    let height = f64::from(size.1);
    let (doc, page, layer) = PdfDocument::new(
        "sbfplot",
        Mm(f64::from(size.0) * PX_TO_MM),
        Mm(height * PX_TO_MM),
        "plot",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(Error::render)?;

    let to_point = |&(x, y): &(f64, f64)| (Point::new(Mm(x * PX_TO_MM), Mm((height - y) * PX_TO_MM)), false);

    for mark in marks {
        match mark {
            Mark::Stroke {
                points,
                closed,
                rgb,
                width,
            } => {
                layer.set_outline_color(pdf_color(*rgb));
                layer.set_outline_thickness(width * PX_TO_PT);
                layer.add_shape(Line {
                    points: points.iter().map(to_point).collect(),
                    is_closed: *closed,
                    has_fill: false,
                    has_stroke: true,
                    is_clipping_path: false,
                });
            }
            Mark::Fill { points, rgb } => {
                layer.set_fill_color(pdf_color(*rgb));
                layer.add_shape(Line {
                    points: points.iter().map(to_point).collect(),
                    is_closed: true,
                    has_fill: true,
                    has_stroke: false,
                    is_clipping_path: false,
                });
            }
            Mark::Text {
                text,
                origin,
                size,
                rgb,
                angle,
            } => {
                layer.set_fill_color(pdf_color(*rgb));
                layer.begin_text_section();
                layer.set_font(&font, size * PX_TO_PT);
                layer.set_text_matrix(TextMatrix::TranslateRotate(
                    Pt(origin.0 * PX_TO_PT),
                    Pt((height - origin.1) * PX_TO_PT),
                    *angle,
                ));
                layer.write_text(printable(text), &font);
                layer.end_text_section();
            }
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    doc.save(&mut out).map_err(Error::render)?;
    Ok(())
}

fn pdf_color((r, g, b): (u8, u8, u8)) -> Color {
    let unit = |c: u8| f64::from(c) / 255.0;
    Color::Rgb(Rgb::new(unit(r), unit(g), unit(b), None))
}

// ---------------------------------------------------------------------------
// PostScript
// ---------------------------------------------------------------------------

/// Write a one-page PostScript program, or an encapsulated one when `eps`.
pub fn write_postscript(
    out: &mut impl Write,
    size: (u32, u32),
    marks: &[Mark],
    eps: bool,
) -> std::io::Result<()> {
    let height = f64::from(size.1);
    let (w, h) = (f64::from(size.0) * PX_TO_PT, height * PX_TO_PT);

    if eps {
        writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
    } else {
        writeln!(out, "%!PS-Adobe-3.0")?;
    }
    writeln!(out, "%%Creator: sbfplot")?;
    writeln!(out, "%%BoundingBox: 0 0 {} {}", w.ceil() as u32, h.ceil() as u32)?;
    if !eps {
        writeln!(out, "%%Pages: 1")?;
    }
    writeln!(out, "%%EndComments")?;
    if !eps {
        writeln!(out, "<< /PageSize [{w:.2} {h:.2}] >> setpagedevice")?;
    }
    writeln!(out, "1 setlinejoin 1 setlinecap")?;

    for mark in marks {
        match mark {
            Mark::Stroke {
                points,
                closed,
                rgb,
                width,
            } => {
                writeln!(out, "{} setrgbcolor {:.2} setlinewidth", ps_color(*rgb), width * PX_TO_PT)?;
                writeln!(out, "newpath")?;
                ps_path(out, height, points)?;
                if *closed {
                    writeln!(out, "closepath")?;
                }
                writeln!(out, "stroke")?;
            }
            Mark::Fill { points, rgb } => {
                writeln!(out, "{} setrgbcolor", ps_color(*rgb))?;
                writeln!(out, "newpath")?;
                ps_path(out, height, points)?;
                writeln!(out, "closepath fill")?;
            }
            Mark::Text {
                text,
                origin,
                size,
                rgb,
                angle,
            } => {
                let (x, y) = ps_coord(height, *origin);
                writeln!(out, "{} setrgbcolor", ps_color(*rgb))?;
                writeln!(out, "/Helvetica findfont {:.2} scalefont setfont", size * PX_TO_PT)?;
                writeln!(
                    out,
                    "gsave {x:.2} {y:.2} translate {angle} rotate 0 0 moveto ({}) show grestore",
                    ps_string(text)
                )?;
            }
        }
    }

    writeln!(out, "showpage")?;
    writeln!(out, "%%EOF")?;
    Ok(())
}

fn ps_coord(height: f64, (x, y): (f64, f64)) -> (f64, f64) {
    (x * PX_TO_PT, (height - y) * PX_TO_PT)
}

fn ps_path(out: &mut impl Write, height: f64, points: &[(f64, f64)]) -> std::io::Result<()> {
    for (i, &p) in points.iter().enumerate() {
        let (x, y) = ps_coord(height, p);
        let op = if i == 0 { "moveto" } else { "lineto" };
        writeln!(out, "{x:.2} {y:.2} {op}")?;
    }
    Ok(())
}

fn ps_color((r, g, b): (u8, u8, u8)) -> String {
    let unit = |c: u8| f64::from(c) / 255.0;
    format!("{:.3} {:.3} {:.3}", unit(r), unit(g), unit(b))
}

/// Helvetica's built-in encoding only covers ASCII.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn ps_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in printable(text).chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
