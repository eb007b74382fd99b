use super::*;
use crate::render::surface::RecordingSurface;

fn config(initial: &str) -> EngineConfig {
    EngineConfig {
        grid_size: 4,
        canvas: Some(Canvas { width: 40, height: 40 }),
        initial_expression: initial.to_owned(),
        presets: vec!["1".into(), "-1".into(), "x+".into()],
        ..EngineConfig::default()
    }
}

#[test]
fn new_engine_is_stopped_at_time_zero() {
    let engine = Engine::new(config("1")).unwrap();
    assert!(!engine.is_running());
    assert_eq!(engine.pending_refreshes(), 0);
    assert_eq!(engine.time(), 0.0);
    assert_eq!(engine.active_source(), "1");
    assert_eq!(engine.cursor(), 0);
}

#[test]
fn invalid_initial_expression_fails_construction() {
    let err = Engine::new(config("x+")).unwrap_err();
    assert!(matches!(err, TixelError::Compile(_)));
}

#[test]
fn refresh_ticks_then_renders() {
    let mut engine = Engine::new(config("t")).unwrap();
    let mut surface = RecordingSurface::new(40, 40);
    assert!(engine.refresh(&mut surface).is_none());

    assert!(engine.start());
    assert!(!engine.start());
    assert_eq!(engine.pending_refreshes(), 2);

    let stats = engine.refresh(&mut surface).unwrap();
    assert!((engine.time() - 0.004).abs() < 1e-12);
    assert_eq!(stats.positive, 16);
    assert_eq!(engine.pending_refreshes(), 2);

    for _ in 0..9 {
        engine.refresh(&mut surface);
    }
    assert!((engine.time() - 0.04).abs() < 1e-12);
}

#[test]
fn stop_leaves_nothing_pending() {
    let mut engine = Engine::new(config("1")).unwrap();
    let mut surface = RecordingSurface::new(40, 40);
    engine.start();
    engine.refresh(&mut surface);
    let t = engine.time();

    assert!(engine.stop());
    assert!(!engine.stop());
    assert_eq!(engine.pending_refreshes(), 0);

    surface.clear();
    assert!(engine.refresh(&mut surface).is_none());
    assert_eq!(engine.time(), t);
    assert!(surface.calls().is_empty());
}

#[test]
fn paused_clock_still_renders() {
    let mut engine = Engine::new(EngineConfig {
        start_paused: true,
        ..config("1")
    })
    .unwrap();
    let mut surface = RecordingSurface::new(40, 40);
    engine.start();
    assert!(engine.refresh(&mut surface).is_some());
    assert_eq!(engine.time(), 0.0);

    engine.clock_mut().resume();
    engine.refresh(&mut surface);
    assert!(engine.time() > 0.0);
}

#[test]
fn set_expression_swaps_or_keeps_handle() {
    let mut engine = Engine::new(config("1")).unwrap();
    assert!(engine.set_expression("x/3").is_replaced());
    assert_eq!(engine.generation(), 1);

    assert!(matches!(engine.set_expression("x+"), SwapOutcome::Rejected(_)));
    assert_eq!(engine.active_source(), "x/3");
    assert_eq!(engine.pending_source(), "x+");

    assert_eq!(engine.set_expression("x+"), SwapOutcome::Unchanged);
    assert_eq!(engine.generation(), 1);
}

#[test]
fn cycling_resets_time_and_advances_cursor() {
    let mut engine = Engine::new(config("0")).unwrap();
    let mut surface = RecordingSurface::new(40, 40);
    engine.start();
    engine.refresh(&mut surface);
    assert!(engine.time() > 0.0);

    assert!(engine.cycle_example().is_replaced());
    assert_eq!(engine.time(), 0.0);
    assert_eq!(engine.cursor(), 1);
    assert_eq!(engine.active_source(), "1");

    assert!(engine.cycle_example().is_replaced());
    assert_eq!(engine.active_source(), "-1");

    assert!(matches!(engine.cycle_example(), SwapOutcome::Rejected(_)));
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.active_source(), "-1");
}

#[test]
fn resize_recomputes_geometry() {
    let mut engine = Engine::new(config("1")).unwrap();
    let canvas = engine
        .resize_viewport(Viewport::new(160.0, 90.0).unwrap())
        .unwrap();
    assert_eq!((canvas.width, canvas.height), (80, 80));
    assert_eq!(engine.layout().config().cell_scale_x(), 20.0);

    engine.resize_canvas(400.0, 200.0).unwrap();
    assert_eq!(engine.layout().cells()[0].canvas_y, 25.0);
    assert!(engine.resize_canvas(0.0, 10.0).is_err());
}

#[test]
fn grid_size_change_updates_clock_increment() {
    let mut engine = Engine::new(config("1")).unwrap();
    engine.set_grid_size(32).unwrap();
    assert_eq!(engine.layout().cells().len(), 1024);
    assert!((engine.clock().incr() - 0.032).abs() < 1e-12);
    assert!(engine.set_grid_size(0).is_err());
}
