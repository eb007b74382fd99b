use super::*;

#[test]
fn canvas_is_half_the_viewport_width() {
    let vp = Viewport::new(640.0, 480.0).unwrap();
    assert_eq!(vp.canvas_side(), 320.0);
    let canvas = vp.raster_canvas().unwrap();
    assert_eq!((canvas.width, canvas.height), (320, 320));
}

#[test]
fn height_does_not_affect_canvas() {
    let a = Viewport::new(800.0, 100.0).unwrap();
    let b = Viewport::new(800.0, 2000.0).unwrap();
    assert_eq!(a.raster_canvas().unwrap(), b.raster_canvas().unwrap());
}

#[test]
fn raster_canvas_rounds_and_never_collapses() {
    assert_eq!(Viewport::new(321.0, 1.0).unwrap().raster_canvas().unwrap().width, 161);
    assert_eq!(Viewport::new(0.5, 1.0).unwrap().raster_canvas().unwrap().width, 1);
}

#[test]
fn invalid_viewports_are_rejected() {
    assert!(Viewport::new(0.0, 10.0).is_err());
    assert!(Viewport::new(10.0, -1.0).is_err());
    assert!(Viewport::new(f64::NAN, 10.0).is_err());
    assert!(Viewport::new(f64::INFINITY, 10.0).is_err());
}
