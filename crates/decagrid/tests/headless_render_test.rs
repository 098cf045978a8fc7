//! Headless rendering integration tests.
//!
//! These tests render through a real GPU adapter (hardware or software
//! fallback) and compare the result with the CPU kernel. Without an adapter
//! they print a note and return early; any other error fails the test.

use decagrid::*;

const WIDTH: u32 = 200;
const HEIGHT: u32 = 150;

/// Off-decade zoom so no pixel extent sits on a power of ten.
fn test_view() -> View {
    View::default()
        .with_camera(Vec2::new(0.03, -0.02), Vec2::new(137.0, 61.0))
        .with_background_color(Vec3::ZERO)
}

fn render_or_skip(view: &View) -> Option<Vec<u8>> {
    match render_to_image(WIDTH, HEIGHT, view) {
        Ok(pixels) => Some(pixels),
        Err(e) if e.is_adapter_unavailable() => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
            None
        }
        Err(e) => panic!("headless render failed: {e}"),
    }
}

#[test]
fn headless_matches_cpu_kernel() {
    let view = test_view();
    let Some(pixels) = render_or_skip(&view) else {
        return;
    };
    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);

    let transforms = view.transforms(WIDTH, HEIGHT).unwrap();
    let expected = rasterize(WIDTH, HEIGHT, &transforms, view.grid_scale);

    // Black background and white lines: the red channel is the alpha.
    let mismatched = pixels
        .chunks_exact(4)
        .zip(&expected)
        .filter(|(px, alpha)| (f32::from(px[0]) / 255.0 - **alpha).abs() > 2.0 / 255.0)
        .count();

    // Pixels whose local coordinate sits right on a line edge may round
    // differently on the GPU.
    let total = (WIDTH * HEIGHT) as usize;
    assert!(
        mismatched * 50 <= total,
        "{mismatched} of {total} pixels differ from the CPU kernel"
    );
    assert!(expected.iter().any(|a| *a > 0.0), "view should contain grid lines");
}

#[test]
fn headless_is_idempotent() {
    let view = test_view();
    let Some(first) = render_or_skip(&view) else {
        return;
    };
    let second = render_to_image(WIDTH, HEIGHT, &view).expect("second render failed");
    assert_eq!(first, second);
}

#[test]
fn headless_output_is_opaque_and_bounded() {
    let view = test_view().with_background_color(Vec3::new(0.2, 0.3, 0.4));
    let Some(pixels) = render_or_skip(&view) else {
        return;
    };

    // Alpha never exceeds 0.4, so every pixel keeps part of the background.
    let max_red = (255.0f32 * (0.2 + 0.4 * 0.8)).ceil() as u8 + 1;
    for px in pixels.chunks_exact(4) {
        assert!(px[3] >= 254);
        assert!(px[0] <= max_red);
    }
}

#[test]
fn headless_polar_layout_renders() {
    let view = test_view()
        .with_camera(Vec2::ZERO, Vec2::splat(23.0))
        .with_projection(LocalProjection::Polar);
    let Some(pixels) = render_or_skip(&view) else {
        return;
    };
    let first = &pixels[0..4];
    assert!(
        !pixels.chunks_exact(4).all(|px| px == first),
        "polar grid should not be uniform"
    );
}

#[test]
fn render_to_file_writes_png() {
    let path = std::env::temp_dir().join("decagrid_headless_test.png");
    match render_to_file(&path, 64, 48, &test_view()) {
        Ok(()) => {
            let bytes = std::fs::read(&path).expect("png not written");
            assert!(bytes.starts_with(b"\x89PNG"));
            let _ = std::fs::remove_file(&path);
        }
        Err(e) if e.is_adapter_unavailable() => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
        }
        Err(e) => panic!("render_to_file failed: {e}"),
    }
}

#[test]
fn headless_rejects_empty_canvas() {
    let err = render_to_image(0, HEIGHT, &test_view()).unwrap_err();
    assert!(!err.is_adapter_unavailable());
    assert!(matches!(
        err,
        DecagridError::Grid(GridError::InvalidCanvasSize { width: 0, .. })
    ));
}
