//! Raster-to-commands pipeline, end to end.

use image::{GrayImage, Luma};
use plotkit_pipeline::{
    raster_to_commands, ExtractionParameters, Style, ToolpathParameters,
};

fn filled_square(size: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
    let mut img = GrayImage::new(size, size);
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            img.put_pixel(x, y, Luma([255u8]));
        }
    }
    img
}

#[test]
fn filled_square_produces_one_drawn_loop() {
    let img = filled_square(128, 20, 20, 60);
    let params = ToolpathParameters {
        pen_up_delay: 0.0,
        pen_down_delay: 0.0,
        ..Default::default()
    };

    let report =
        raster_to_commands(&img, &ExtractionParameters::default(), &params).unwrap();
    assert!(report.is_clean());

    let program = &report.accepted;
    assert_eq!(program[0], "G21");
    assert_eq!(program.last().unwrap(), "M30");

    // One contour: one travel to its start, one pen-down, one drawing feed.
    assert_eq!(program.iter().filter(|l| *l == "M3 S0").count(), 1);
    assert_eq!(program.iter().filter(|l| *l == "G1 F500").count(), 1);
    // Header/footer travel to origin plus the contour start.
    assert_eq!(
        program.iter().filter(|l| l.starts_with("G0 X")).count(),
        3
    );

    // The square closes: first and last draw moves hit the same point.
    let draws: Vec<&String> = program.iter().filter(|l| l.starts_with("G1 X")).collect();
    assert!(draws.len() >= 5);
    assert_eq!(draws.first().unwrap(), draws.last().unwrap());
}

#[test]
fn blank_raster_yields_minimal_program() {
    let img = GrayImage::new(64, 64);
    let report = raster_to_commands(
        &img,
        &ExtractionParameters::default(),
        &ToolpathParameters::default(),
    )
    .unwrap();
    assert!(report.is_clean());
    // Header (8) + travel feed + footer (3), nothing else.
    assert_eq!(report.accepted.len(), 12);
}

#[test]
fn stylized_raster_flows_through_pipeline() {
    // A gradient photo through the silhouette filter must yield a
    // traceable binary raster and a clean program.
    let mut img = GrayImage::new(96, 96);
    for (x, y, p) in img.enumerate_pixels_mut() {
        p.0[0] = ((x + y) * 255 / 190) as u8;
    }
    let stylized = Style::Silhouette.apply(&img);

    let report = raster_to_commands(
        &stylized,
        &ExtractionParameters::default(),
        &ToolpathParameters::default(),
    )
    .unwrap();
    assert!(report.is_clean());
    assert!(report.accepted.len() >= 12);
}

#[test]
fn parameters_survive_json_round_trip() {
    let params = ToolpathParameters {
        scale_x: 0.25,
        add_noise: true,
        ..Default::default()
    };
    let json = serde_json::to_string(&params).unwrap();
    let back: ToolpathParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back.scale_x, 0.25);
    assert!(back.add_noise);

    // Partial configs fall back to defaults for unset fields.
    let partial: ToolpathParameters =
        serde_json::from_str(r#"{"feed_rate_drawing": 800.0}"#).unwrap();
    assert_eq!(partial.feed_rate_drawing, 800.0);
    assert_eq!(partial.feed_rate_travel, 2000.0);
}
