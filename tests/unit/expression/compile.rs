use super::*;

#[test]
fn valid_expression_compiles_and_evaluates() {
    let f = compile("x*y+t");
    assert!(!f.is_error());
    assert_eq!(f.eval(1.0, 0.0, 2.0, 3.0), 7.0);
    assert_eq!(f.program().unwrap().source(), "x*y+t");
}

#[test]
fn syntax_error_yields_sentinel_with_offset() {
    let f = compile("x+");
    assert!(f.is_error());
    assert!(f.eval(1.0, 1.0, 1.0, 1.0).is_nan());
    match f.rejection() {
        Some(Rejection::Invalid { offset, .. }) => assert_eq!(*offset, Some(2)),
        other => panic!("unexpected rejection: {other:?}"),
    }
}

#[test]
fn nan_at_canary_is_rejected() {
    for src in ["0/0", "sqrt(-x)", "Infinity-Infinity", "acos(2)", "undefined"] {
        let f = compile(src);
        assert_eq!(f.rejection(), Some(&Rejection::NotANumber), "{src}");
    }
}

#[test]
fn nan_elsewhere_is_accepted() {
    let f = compile("sqrt(x-1)");
    assert!(!f.is_error());
    assert!(f.eval(0.0, 0.0, 0.0, 0.0).is_nan());
    assert_eq!(f.eval(0.0, 0.0, 5.0, 0.0), 2.0);
}

#[test]
fn infinity_is_numeric() {
    assert!(!compile("x/0").is_error());
}

#[test]
fn backslash_separates_statements() {
    let f = compile("a=2\\a*3");
    assert_eq!(f.eval(0.0, 0.0, 0.0, 0.0), 6.0);
    assert_eq!(f.program().unwrap().source(), "a=2\\a*3");
    assert_eq!(f.program().unwrap().local_count(), 1);
}

#[test]
fn program_ending_in_separator_is_rejected() {
    assert!(compile("t\\").is_error());
    assert!(compile("").is_error());
    assert!(compile("\\\\").is_error());
}

#[test]
fn evaluation_is_deterministic() {
    let f = compile("sin(t*i)+random()*x-y");
    let a = f.eval(0.3, 7.0, 2.0, 9.0);
    for _ in 0..4 {
        assert_eq!(a.to_bits(), f.eval(0.3, 7.0, 2.0, 9.0).to_bits());
    }
}

#[test]
fn scratch_reuse_matches_fresh_evaluation() {
    let f = compile("q=x*2,q+y");
    let p = f.program().unwrap();
    let mut scratch = EvalScratch::new();
    for k in 0..10 {
        let x = f64::from(k);
        assert_eq!(p.eval_with(&mut scratch, 0.0, 0.0, x, 1.0), p.eval(0.0, 0.0, x, 1.0));
    }
}

#[test]
fn rejection_messages_are_readable() {
    let r = compile("x+").rejection().cloned().unwrap();
    assert!(r.to_string().contains("byte 2"));
    assert!(Rejection::NotANumber.to_string().contains("NaN"));
}

#[test]
fn compile_error_display_includes_offset() {
    let e = ExprCompileError::from(ExprError::new(3, "boom"));
    assert_eq!(e.to_string(), "expr compile error at byte 3: boom");
}

fn assert_too_deep(src: &str) {
    let f = compile(src);
    match f.rejection() {
        Some(Rejection::Invalid { message, .. }) => {
            assert!(message.contains("nested too deeply"), "{message}");
        }
        other => panic!("unexpected rejection: {other:?}"),
    }
    assert!(f.eval(1.0, 1.0, 1.0, 1.0).is_nan());
}

#[test]
fn deep_parentheses_are_rejected() {
    assert_too_deep(&format!("{}1{}", "(".repeat(1000), ")".repeat(1000)));
    assert!(!compile(&format!("{}x{}", "(".repeat(40), ")".repeat(40))).is_error());
}

#[test]
fn long_operator_chains_are_rejected() {
    assert_too_deep(&format!("{}1", "1+".repeat(1000)));
    assert_too_deep(&format!("{}1", "x||".repeat(1000)));
    assert_too_deep(&format!("{}2", "2**".repeat(1000)));
    assert_eq!(compile(&format!("{}1", "1+".repeat(99))).eval(0.0, 0.0, 0.0, 0.0), 100.0);
}

#[test]
fn long_prefix_chains_are_rejected() {
    assert_too_deep(&format!("{}1", "!".repeat(1000)));
    assert_too_deep(&format!("{}x", "- ".repeat(1000)));
    assert_eq!(compile(&format!("{}1", "!".repeat(10))).eval(0.0, 0.0, 0.0, 0.0), 1.0);
}

#[test]
fn nested_calls_and_conditionals_are_rejected() {
    assert_too_deep(&format!("{}x{}", "sin(".repeat(500), ")".repeat(500)));
    assert_too_deep(&format!("{}1", "x?1:".repeat(1000)));
    assert_too_deep(&format!("{}1", "a=".repeat(1000)));
}

#[test]
fn oversized_source_is_rejected_before_parsing() {
    for src in [
        format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000)),
        format!("{}1", "1+".repeat(200_000)),
        format!("{}1", "!".repeat(100_000)),
    ] {
        match compile(&src).rejection() {
            Some(Rejection::Invalid { offset: None, message }) => {
                assert!(message.contains("byte limit"), "{message}");
            }
            other => panic!("unexpected rejection: {other:?}"),
        }
    }
    let wide = format!("{}0", "0+".repeat((MAX_SOURCE_LEN - 1) / 2));
    assert!(wide.len() <= MAX_SOURCE_LEN);
    assert!(compile(&wide).is_error());
}
