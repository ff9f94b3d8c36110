#![cfg(feature = "image")]

use subpix_edges::detect::{detect_edges, detect_edges_from_gray_u8};
use subpix_edges::{CannyZernikeParams, Denoise, DetectOptions, EdgesError, Roi};

fn vertical_step(w: u32, h: u32, first_bright_col: u32) -> image::GrayImage {
    image::GrayImage::from_fn(w, h, |x, _| {
        image::Luma([if x < first_bright_col { 50 } else { 200 }])
    })
}

#[test]
fn default_pipeline_keeps_step_location() {
    let img = vertical_step(40, 40, 20);
    let result = detect_edges(&img, &DetectOptions::default()).expect("detect");
    let pixels: Vec<_> = result.edge_map.edge_pixels().collect();
    assert!(!pixels.is_empty());

    let points = result.subpixel.expect("subpixel enabled");
    for (p, &(_, y)) in points.iter().zip(&pixels) {
        if (3..=36).contains(&y) {
            assert!((p.x - 19.5).abs() <= 1.0, "x = {} at row {y}", p.x);
        }
    }
}

#[test]
fn gaussian_and_unfiltered_pipelines_agree_on_a_clean_step() {
    let img = vertical_step(32, 32, 16);
    let plain = DetectOptions::default().with_denoise(Denoise::None);
    let smooth = DetectOptions::default().with_denoise(Denoise::gaussian());
    let a = detect_edges(&img, &plain).expect("plain");
    let b = detect_edges(&img, &smooth).expect("gaussian");

    let mean_x = |pts: &[subpix_edges::SubpixelEdgePoint]| {
        pts.iter().map(|p| p.x).sum::<f64>() / pts.len() as f64
    };
    let ma = mean_x(a.subpixel.as_deref().expect("subpixel"));
    let mb = mean_x(b.subpixel.as_deref().expect("subpixel"));
    assert!((ma - 15.5).abs() < 0.1, "plain mean {ma}");
    assert!((mb - 15.5).abs() < 0.5, "gaussian mean {mb}");
}

#[test]
fn intensity_thresholds_match_ratio_thresholds() {
    let img = vertical_step(32, 32, 16);
    let abs = DetectOptions::default()
        .with_denoise(Denoise::None)
        .with_params(CannyZernikeParams::from_thresholds(51.0, 153.0));
    let rel = DetectOptions::default()
        .with_denoise(Denoise::None)
        .with_params(CannyZernikeParams::from_thresholds(0.2, 0.6));
    let a = detect_edges(&img, &abs).expect("absolute");
    let b = detect_edges(&img, &rel).expect("ratio");
    assert_eq!(a.edge_map, b.edge_map);
}

#[test]
fn roi_points_are_in_full_image_coordinates() {
    let img = vertical_step(64, 48, 40);
    let opts = DetectOptions::default()
        .with_denoise(Denoise::None)
        .with_roi(Roi::new(30, 10, 20, 20));
    let result = detect_edges(&img, &opts).expect("detect");
    assert_eq!(
        (result.edge_map.width, result.edge_map.height),
        (64, 48)
    );
    for (x, y) in result.edge_map.edge_pixels() {
        assert!(x == 39 || x == 40);
        assert!((11..29).contains(&y));
    }
    for p in result.subpixel.expect("subpixel enabled") {
        assert!((p.x - 39.5).abs() <= 0.5);
        assert!(p.y > 10.5 && p.y < 28.5);
    }
}

#[test]
fn blank_buffer_yields_no_edges() {
    let pixels = vec![0u8; 20 * 10];
    let result =
        detect_edges_from_gray_u8(20, 10, &pixels, &DetectOptions::default()).expect("detect");
    assert!(result.edge_map.is_blank());
    assert_eq!(result.subpixel.map(|p| p.len()), Some(0));
}

#[test]
fn invalid_thresholds_surface_as_detect_error() {
    let img = vertical_step(16, 16, 8);
    let opts = DetectOptions::default().with_params(CannyZernikeParams {
        low_threshold_ratio: 0.0,
        ..CannyZernikeParams::default()
    });
    let err = detect_edges(&img, &opts).unwrap_err();
    assert!(matches!(err, EdgesError::Detect(_)));
}
