use super::*;

#[test]
fn grid_increment_is_size_over_thousand() {
    let clock = Clock::for_grid(16).unwrap();
    assert_eq!(clock.incr(), 0.016);
    assert_eq!(clock.time(), 0.0);
    assert_eq!(clock.state(), ClockState::Running);
}

#[test]
fn ticks_accumulate_while_running() {
    let mut clock = Clock::new(0.25).unwrap();
    assert_eq!(clock.tick(), 0.25);
    assert_eq!(clock.tick(), 0.5);
    assert_eq!(clock.time(), 0.5);
}

#[test]
fn paused_clock_ignores_ticks() {
    let mut clock = Clock::new(1.0).unwrap();
    clock.tick();
    clock.pause();
    assert!(clock.is_paused());
    assert_eq!(clock.tick(), 1.0);
    clock.resume();
    assert_eq!(clock.tick(), 2.0);
}

#[test]
fn reset_returns_to_zero_and_keeps_state() {
    let mut clock = Clock::new(1.0).unwrap();
    clock.tick();
    clock.pause();
    clock.reset();
    assert_eq!(clock.time(), 0.0);
    assert!(clock.is_paused());
}

#[test]
fn time_never_decreases_across_ticks() {
    let mut clock = Clock::for_grid(7).unwrap();
    let mut last = clock.time();
    for k in 0..500 {
        if k % 37 == 0 {
            clock.pause();
        } else if k % 11 == 0 {
            clock.resume();
        }
        let now = clock.tick();
        assert!(now >= last);
        last = now;
    }
}

#[test]
fn invalid_increments_are_rejected() {
    assert!(Clock::new(-0.1).is_err());
    assert!(Clock::new(f64::NAN).is_err());
    let mut clock = Clock::new(0.0).unwrap();
    assert!(clock.set_incr(f64::INFINITY).is_err());
    assert!(clock.set_incr(0.5).is_ok());
    assert_eq!(clock.tick(), 0.5);
}
