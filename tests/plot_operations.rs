mod common;

use std::path::Path;

use common::{CountingFilter, RecordingSurface};
use sbfplot::{
    CheckOutcome, Error, LegendPosition, OutputFormat, PlotKind, PlotOptions, PlotSession,
    SeriesColor,
};

fn quiet() -> PlotOptions {
    PlotOptions {
        show: false,
        save: false,
        ..PlotOptions::default()
    }
}

fn labels(figure: &sbfplot::Figure) -> Vec<&str> {
    figure.series().map(|s| s.label.as_str()).collect()
}

#[test]
fn test_empty_filter_rejected_by_every_plot() {
    let mut session = PlotSession::new(CountingFilter::uniform(5, 0));
    let mut surface = RecordingSurface::default();
    let opts = PlotOptions {
        show: true,
        save: true,
        ..PlotOptions::default()
    };

    for kind in PlotKind::ALL {
        let err = session.plot(kind, &opts, &mut surface).unwrap_err();
        assert!(matches!(err, Error::EmptyFilter), "{kind}: {err}");
    }
    assert!(surface.saved.is_empty());
    assert!(surface.shown.is_empty());
}

#[test]
fn test_invalid_format_checked_before_filter() {
    let mut session = PlotSession::new(CountingFilter::uniform(5, 3));
    let mut surface = RecordingSurface::default();
    let opts = PlotOptions {
        format: "jpg".into(),
        ..quiet()
    };

    let err = session.cells(&opts, &mut surface).unwrap_err();

    assert!(matches!(err, Error::InvalidFormat(ref f) if f == "jpg"));
    assert_eq!(session.filter().touched(), 0);
}

#[test]
fn test_filter_without_sources_is_invalid() {
    let mut filter = CountingFilter::uniform(5, 3);
    filter.insert_file_list.clear();
    let mut session = PlotSession::new(filter);

    let err = session
        .safep(&quiet(), &mut RecordingSurface::default())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidFilter(_)));
}

#[test]
fn test_areas_barchart_has_one_bar_per_area() {
    let mut session = PlotSession::new(CountingFilter::uniform(10, 10));
    let mut surface = RecordingSurface::default();

    let out = session.areas_barchart(&quiet(), &mut surface).unwrap();

    let bars = out.figure.bars.as_ref().unwrap();
    let expected: Vec<(f64, f64)> = (1..=10).map(|a| (a as f64, 10.0)).collect();
    assert_eq!(bars.points, expected);
    assert_eq!(bars.label, "Members");
    assert!(out.figure.lines.is_empty());
    assert!(!out.figure.grid);
    assert_eq!(out.figure.legend, None);
    assert_eq!(out.figure.x_label, "Set");
}

#[test]
fn test_bar_charts_are_never_sampled() {
    let mut session = PlotSession::new(CountingFilter::uniform(1000, 3));

    let members = session.figure(PlotKind::Elements, &quiet()).unwrap();
    let cells = session.figure(PlotKind::Cells, &quiet()).unwrap();

    let bars = members.bars.as_ref().unwrap();
    assert_eq!(bars.points.len(), 1000);
    assert!(bars.xs().eq((1..=1000).map(|a| a as f64)));

    let cell_bars = cells.series_named("Cells").unwrap();
    let expected = cells.series_named("Expected cells").unwrap();
    assert_eq!(cell_bars.points.len(), 1000);
    assert_eq!(expected.points.len(), 1000);
    assert!(cell_bars.xs().eq(expected.xs()));
}

#[test]
fn test_legend_override_ignored_without_legend() {
    let mut session = PlotSession::new(CountingFilter::uniform(3, 1));
    let opts = PlotOptions {
        legend: Some(LegendPosition::LowerLeft),
        ..quiet()
    };

    let bars = session.figure(PlotKind::Elements, &opts).unwrap();
    let curve = session.figure(PlotKind::Safep, &opts).unwrap();

    assert_eq!(bars.legend, None);
    assert_eq!(curve.legend, Some(LegendPosition::LowerLeft));
}

#[test]
fn test_cells_overlay_expected_curve() {
    let mut session = PlotSession::new(CountingFilter::uniform(4, 3));

    let fig = session.figure(PlotKind::Cells, &quiet()).unwrap();

    assert_eq!(labels(&fig), ["Cells", "Expected cells"]);
    let bars = fig.series_named("Cells").unwrap();
    assert!(bars.ys().all(|y| y == 6.0));
    let expected = fig.series_named("Expected cells").unwrap();
    assert_eq!(expected.color, SeriesColor::Red);
    assert_eq!(expected.line_width, 0.8);
    assert_eq!(expected.ys().collect::<Vec<_>>(), [2.0, 4.0, 6.0, 8.0]);

    let without = session
        .figure(
            PlotKind::Cells,
            &PlotOptions {
                expected: false,
                ..quiet()
            },
        )
        .unwrap();
    assert_eq!(labels(&without), ["Cells"]);
}

#[test]
fn test_large_filter_curves_share_sampled_axis() {
    let mut session = PlotSession::new(CountingFilter::uniform(1000, 1));

    let fig = session.figure(PlotKind::Emersion, &quiet()).unwrap();

    assert_eq!(labels(&fig), ["Expected emersion", "Emersion"]);
    let expected = fig.series_named("Expected emersion").unwrap();
    let measured = fig.series_named("Emersion").unwrap();
    assert_eq!(expected.points.len(), 250);
    assert_eq!(measured.points.len(), 250);
    assert!(expected.xs().eq(measured.xs()));
    assert_eq!(measured.points[0].0, 1.0);
    assert_eq!(measured.points[1].0, 5.0);
    assert!(measured.xs().all(|x| x <= 1000.0));
}

#[test]
fn test_sampled_curves_never_exceed_resolution() {
    for n in [1, 254, 255, 256, 382, 510, 511, 4000] {
        let mut session = PlotSession::new(CountingFilter::uniform(n, 1));
        let fig = session.figure(PlotKind::Safep, &quiet()).unwrap();
        let points = &fig.lines[0].points;
        assert!(points.len() <= 255, "{n} areas gave {} points", points.len());
        assert!(points.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

#[test]
fn test_fpp_series_and_toggles() {
    let non_elements = vec![
        CheckOutcome::Miss { expected: None },
        CheckOutcome::CrossAreaHit {
            expected: None,
            reported: 2,
        },
    ];
    let filter = CountingFilter::uniform(3, 2).with_check_file("non.csv", non_elements);
    let mut session = PlotSession::new(filter);

    let plain = session.figure(PlotKind::Fpp, &quiet()).unwrap();
    assert_eq!(labels(&plain), ["A priori FPP", "FPP"]);
    assert_eq!(plain.legend, Some(LegendPosition::UpperRight));
    assert!(plain.grid);

    let opts = PlotOptions {
        apriori: false,
        non_elements: Some("non.csv".into()),
        ..quiet()
    };
    let fig = session.figure(PlotKind::Fpp, &opts).unwrap();
    assert_eq!(labels(&fig), ["FPP", "FPR"]);
    let fpr = fig.series_named("FPR").unwrap();
    assert_eq!(fpr.ys().collect::<Vec<_>>(), [0.0, 0.5, 0.0]);
}

#[test]
fn test_isep_series_and_toggles() {
    let insert = vec![
        CheckOutcome::TrueHit { area: 1 },
        CheckOutcome::CrossAreaHit {
            expected: Some(1),
            reported: 2,
        },
    ];
    let filter = CountingFilter::uniform(2, 2).with_check_file("insert.csv", insert);
    let mut session = PlotSession::new(filter);
    let opts = PlotOptions {
        expected_ise: true,
        ..quiet()
    };

    let fig = session.figure(PlotKind::Isep, &opts).unwrap();

    assert_eq!(labels(&fig), ["A priori ISEP", "ISEP", "ISER", "Expected ISE"]);
    assert_eq!(fig.series_named("ISER").unwrap().ys().collect::<Vec<_>>(), [0.5, 0.0]);
    // a priori ISEP times the members of the area
    assert_eq!(
        fig.series_named("Expected ISE").unwrap().ys().collect::<Vec<_>>(),
        [0.02, 0.04]
    );

    let bare = PlotOptions {
        apriori: false,
        iser: false,
        ..quiet()
    };
    let fig = session.figure(PlotKind::Isep, &bare).unwrap();
    assert_eq!(labels(&fig), ["ISEP"]);
}

#[test]
fn test_multi_source_iser_saves_nothing() {
    let mut filter = CountingFilter::uniform(3, 2);
    filter.insert_file_list = vec!["a.csv".into(), "b.csv".into()];
    let mut session = PlotSession::new(filter);
    let mut surface = RecordingSurface::default();
    let opts = PlotOptions {
        save: true,
        ..quiet()
    };

    let err = session.isep(&opts, &mut surface).unwrap_err();

    assert!(matches!(err, Error::UnsupportedMultiSource(2)));
    assert!(surface.saved.is_empty());

    // Without the measured rate the plot goes through.
    let opts = PlotOptions { iser: false, ..opts };
    session.isep(&opts, &mut surface).unwrap();
    assert_eq!(surface.saved.len(), 1);
}

#[test]
fn test_title_carries_first_insert_source() {
    let mut session = PlotSession::new(CountingFilter::uniform(2, 1));

    let fig = session.figure(PlotKind::Safep, &quiet()).unwrap();
    assert_eq!(fig.title, "A priori safeness probability (insert.csv)");

    let opts = PlotOptions {
        title: Some("Run 7".into()),
        ..quiet()
    };
    let fig = session.figure(PlotKind::Safep, &opts).unwrap();
    assert_eq!(fig.title, "Run 7 (insert.csv)");

    session.filter_mut().insert_file_list = vec![String::new()];
    let fig = session.figure(PlotKind::Safep, &opts).unwrap();
    assert_eq!(fig.title, "Run 7");
}

#[test]
fn test_save_uses_filename_and_output_dir() {
    let mut session = PlotSession::new(CountingFilter::uniform(4, 1));
    let mut surface = RecordingSurface::default();
    let opts = PlotOptions {
        save: true,
        format: "png".into(),
        filename: Some("areas".into()),
        output_dir: "plots".into(),
        ..quiet()
    };

    let out = session.areas_barchart(&opts, &mut surface).unwrap();

    let expected = Path::new("plots").join("areas.png");
    assert_eq!(out.saved_to.as_deref(), Some(expected.as_path()));
    assert_eq!(surface.saved.len(), 1);
    let (path, format, figure) = &surface.saved[0];
    assert_eq!(path, &expected);
    assert_eq!(*format, OutputFormat::Png);
    assert_eq!(figure, &out.figure);
    assert!(surface.shown.is_empty());
}

#[test]
fn test_show_and_save_flags() {
    let mut session = PlotSession::new(CountingFilter::uniform(4, 1));

    let mut surface = RecordingSurface::default();
    let out = session
        .emersion(
            &PlotOptions {
                show: true,
                ..quiet()
            },
            &mut surface,
        )
        .unwrap();
    assert!(out.saved_to.is_none());
    assert!(surface.saved.is_empty());
    assert_eq!(surface.shown.len(), 1);

    let mut surface = RecordingSurface::default();
    session
        .emersion(
            &PlotOptions {
                show: true,
                save: true,
                ..quiet()
            },
            &mut surface,
        )
        .unwrap();
    assert_eq!(surface.saved.len(), 1);
    assert_eq!(surface.shown.len(), 1);
    assert_eq!(surface.saved[0].1, OutputFormat::Pdf);
}
