use super::*;

fn library() -> PresetLibrary {
    PresetLibrary::new(vec!["a".into(), "b".into(), "c".into()]).unwrap()
}

#[test]
fn set_expression_replaces_pending_text() {
    let mut bridge = InteractionBridge::new("1", library());
    assert_eq!(bridge.pending(), "1");
    assert_eq!(bridge.set_expression("x*y"), "x*y");
    assert_eq!(bridge.pending(), "x*y");
    assert_eq!(bridge.cursor(), 0);
}

#[test]
fn cycling_walks_presets_circularly() {
    let mut bridge = InteractionBridge::new("1", library());
    let mut clock = Clock::new(0.5).unwrap();
    let mut seen = Vec::new();
    for k in 1..=7 {
        clock.tick();
        seen.push(bridge.cycle_example(&mut clock).to_owned());
        assert_eq!(bridge.cursor(), k % 3);
        assert_eq!(clock.time(), 0.0);
    }
    assert_eq!(seen, ["a", "b", "c", "a", "b", "c", "a"]);
}

#[test]
fn cycling_keeps_pause_state() {
    let mut bridge = InteractionBridge::new("1", library());
    let mut clock = Clock::new(1.0).unwrap();
    clock.pause();
    bridge.cycle_example(&mut clock);
    assert!(clock.is_paused());
}
