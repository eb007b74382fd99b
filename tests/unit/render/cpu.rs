use super::*;

const BG: Rgba8 = Rgba8::rgb(0x1a, 0x20, 0x2c);
const DOT: Rgba8 = Rgba8::rgb(0xd6, 0xbc, 0xfa);

#[test]
fn background_fills_every_pixel() {
    let mut s = CpuSurface::new(8, 6).unwrap();
    s.fill_background(BG);
    let frame = s.render();
    assert_eq!((frame.width, frame.height), (8, 6));
    assert_eq!(frame.data.len(), 8 * 6 * 4);
    assert!(frame.premultiplied);
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, BG.premultiplied());
    }
}

#[test]
fn circle_covers_center_and_not_corners() {
    let mut s = CpuSurface::new(40, 40).unwrap();
    s.fill_background(BG);
    s.fill_circle(Point::new(20.0, 20.0), 10.0, DOT);
    let frame = s.render();
    assert_eq!(frame.pixel(20, 20), Some(DOT.premultiplied()));
    assert_eq!(frame.pixel(0, 0), Some(BG.premultiplied()));
    assert_eq!(frame.pixel(39, 39), Some(BG.premultiplied()));
}

#[test]
fn background_fill_discards_previous_dots() {
    let mut s = CpuSurface::new(20, 20).unwrap();
    s.fill_background(BG);
    s.fill_circle(Point::new(10.0, 10.0), 5.0, DOT);
    s.fill_background(BG);
    let frame = s.render();
    assert_eq!(frame.pixel(10, 10), Some(BG.premultiplied()));
}

#[test]
fn degenerate_radius_draws_nothing() {
    let mut s = CpuSurface::new(10, 10).unwrap();
    s.fill_background(BG);
    s.fill_circle(Point::new(5.0, 5.0), f64::NAN, DOT);
    s.fill_circle(Point::new(5.0, 5.0), 0.0, DOT);
    let frame = s.render();
    assert_eq!(frame.pixel(5, 5), Some(BG.premultiplied()));
}

#[test]
fn invalid_sizes_are_rejected() {
    assert!(CpuSurface::new(0, 10).is_err());
    assert!(CpuSurface::new(70_000, 10).is_err());
}
