use super::*;
use crate::expression::compile::try_compile;

fn eval_at(src: &str, t: f64, i: f64, x: f64, y: f64) -> f64 {
    try_compile(src).unwrap().eval(t, i, x, y)
}

fn eval(src: &str) -> f64 {
    eval_at(src, 1.0, 1.0, 1.0, 1.0)
}

#[test]
fn arithmetic_follows_js_precedence() {
    assert_eq!(eval("1+2*3"), 7.0);
    assert_eq!(eval("(1+2)*3"), 9.0);
    assert_eq!(eval("2**3**2"), 512.0);
    assert_eq!(eval("(-2)**2"), 4.0);
    assert_eq!(eval("10-4-3"), 3.0);
    assert_eq!(eval("5/0"), f64::INFINITY);
}

#[test]
fn remainder_truncates_toward_zero() {
    assert_eq!(eval("7%3"), 1.0);
    assert_eq!(eval("-7%3"), -1.0);
    assert_eq!(eval("7%-3"), 1.0);
    assert_eq!(eval("5.5%2"), 1.5);
}

#[test]
fn bitwise_ops_use_int32() {
    assert_eq!(eval("5&3"), 1.0);
    assert_eq!(eval("5|3"), 7.0);
    assert_eq!(eval("5^3"), 6.0);
    assert_eq!(eval("~5"), -6.0);
    assert_eq!(eval("1<<31"), -2_147_483_648.0);
    assert_eq!(eval("1<<33"), 2.0);
    assert_eq!(eval("-8>>1"), -4.0);
    assert_eq!(eval("-1>>>0"), 4_294_967_295.0);
    assert_eq!(eval("2.7|0"), 2.0);
    assert_eq!(eval("-2.7|0"), -2.0);
    assert_eq!(eval("NaN|0"), 0.0);
}

#[test]
fn comparisons_yield_one_or_zero() {
    assert_eq!(eval("3>2"), 1.0);
    assert_eq!(eval("3<=2"), 0.0);
    assert_eq!(eval("2===2"), 1.0);
    assert_eq!(eval("NaN==NaN"), 0.0);
    assert_eq!(eval("NaN!=NaN"), 1.0);
    assert_eq!(eval("NaN<1"), 0.0);
}

#[test]
fn logical_ops_return_deciding_operand() {
    assert_eq!(eval("0||5"), 5.0);
    assert_eq!(eval("3&&0"), 0.0);
    assert_eq!(eval("2&&7"), 7.0);
    assert_eq!(eval("NaN||4"), 4.0);
    assert!(eval("NaN&&4").is_nan());
    assert_eq!(eval("!0"), 1.0);
    assert_eq!(eval("!NaN"), 1.0);
    assert_eq!(eval("!-3"), 0.0);
}

#[test]
fn logical_ops_short_circuit_side_effects() {
    assert_eq!(eval("a=1,0&&(a=5),a"), 1.0);
    assert_eq!(eval("a=1,1||(a=5),a"), 1.0);
    assert_eq!(eval("a=1,1&&(a=5),a"), 5.0);
}

#[test]
fn conditional_picks_branch() {
    assert_eq!(eval_at("x>0?10:20", 0.0, 0.0, 1.0, 0.0), 10.0);
    assert_eq!(eval_at("x>0?10:20", 0.0, 0.0, -1.0, 0.0), 20.0);
    assert_eq!(eval_at("x?y?1:2:3", 0.0, 0.0, 1.0, 0.0), 2.0);
}

#[test]
fn assignments_update_slots() {
    assert_eq!(eval("x+=2"), 3.0);
    assert_eq!(eval("a=5;a-=2;a*=3"), 9.0);
    assert_eq!(eval("a=2;a**=3"), 8.0);
    assert_eq!(eval("a=1;a<<=4"), 16.0);
    assert_eq!(eval("a=b=3;a+b"), 6.0);
    assert_eq!(eval_at("y-=8", 0.0, 0.0, 0.0, 10.0), 2.0);
}

#[test]
fn updates_return_old_or_new_value() {
    assert_eq!(eval("a=1;a++"), 1.0);
    assert_eq!(eval("a=1;++a"), 2.0);
    assert_eq!(eval("a=1;a++;a"), 2.0);
    assert_eq!(eval("a=3;a--;--a"), 1.0);
    assert_eq!(eval_at("i++ + i", 0.0, 4.0, 0.0, 0.0), 9.0);
}

#[test]
fn locals_start_as_nan_every_evaluation() {
    assert!(eval("a=a+1").is_nan());

    let program = try_compile("a=(a==a)?a+1:1").unwrap();
    let mut scratch = crate::expression::compile::EvalScratch::new();
    assert_eq!(program.eval_with(&mut scratch, 0.0, 0.0, 0.0, 0.0), 1.0);
    assert_eq!(program.eval_with(&mut scratch, 0.0, 0.0, 0.0, 0.0), 1.0);
}

#[test]
fn variadic_builtins_match_math() {
    assert_eq!(eval("max()"), f64::NEG_INFINITY);
    assert_eq!(eval("min()"), f64::INFINITY);
    assert_eq!(eval("max(1,5,3)"), 5.0);
    assert_eq!(eval("min(4,-2,3)"), -2.0);
    assert!(eval("max(1,NaN,3)").is_nan());
    assert_eq!(eval("hypot(3,4)"), 5.0);
    assert_eq!(eval("hypot()"), 0.0);
    assert_eq!(eval("hypot(NaN,Infinity)"), f64::INFINITY);
    assert!(eval("hypot(NaN,1)").is_nan());
}

#[test]
fn rounding_and_sign() {
    assert_eq!(eval("round(2.5)"), 3.0);
    assert_eq!(eval("round(-2.5)"), -2.0);
    assert_eq!(eval("round(-2.6)"), -3.0);
    assert_eq!(eval("round(0.49999999999999994)"), 0.0);
    assert_eq!(eval("trunc(-4.7)"), -4.0);
    assert_eq!(eval("sign(-3)"), -1.0);
    assert_eq!(eval("sign(0)"), 0.0);
    assert!(eval("sign(NaN)").is_nan());
}

#[test]
fn power_edge_cases() {
    assert!(eval("pow(1,Infinity)").is_nan());
    assert!(eval("1**Infinity").is_nan());
    assert_eq!(eval("pow(NaN,0)"), 1.0);
    assert!(eval("pow(1,NaN)").is_nan());
    assert_eq!(eval("pow(2,10)"), 1024.0);
}

#[test]
fn integer_builtins() {
    assert_eq!(eval("imul(3,4)"), 12.0);
    assert_eq!(eval("imul(0xffffffff,5)"), -5.0);
    assert_eq!(eval("clz32(1)"), 31.0);
    assert_eq!(eval("clz32(0)"), 32.0);
    assert_eq!(eval("clz32(-1)"), 0.0);
    assert_eq!(eval("fround(5.5)"), 5.5);
    assert_ne!(eval("fround(0.1)"), 0.1);
}

#[test]
fn missing_arguments_read_as_nan() {
    assert!(eval("sqrt()").is_nan());
    assert!(eval("atan2(1)").is_nan());
    assert!((eval("atan2(1,1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
}

#[test]
fn math_prefix_is_optional() {
    assert_eq!(eval("Math.sin(0)"), 0.0);
    assert_eq!(eval("Math.PI"), std::f64::consts::PI);
    assert_eq!(eval("Math.max(1,2)"), eval("max(1,2)"));
}

#[test]
fn random_is_a_pure_function_of_inputs() {
    let p = try_compile("random()").unwrap();
    let a = p.eval(3.0, 1.0, 2.0, 5.0);
    assert!((0.0..1.0).contains(&a));
    assert_eq!(a, p.eval(3.0, 1.0, 2.0, 5.0));
    assert_ne!(a, p.eval(3.5, 1.0, 2.0, 5.0));
    assert_ne!(eval("random()-random()"), 0.0);
}

#[test]
fn default_pattern_evaluates() {
    let src = "hypot(x-=t%4*5,y-=8)<6&&x<y|y<-x";
    assert_eq!(eval_at(src, 0.0, 0.0, 8.0, 8.0), 0.0);
    assert_eq!(eval_at(src, 0.0, 0.0, 3.0, 8.0), 0.0);
    assert_eq!(eval_at(src, 0.0, 0.0, 0.0, 10.0), 1.0);
}

#[test]
fn int32_conversion_wraps() {
    assert_eq!(to_int32(4_294_967_301.0), 5);
    assert_eq!(to_int32(-1.0), -1);
    assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
    assert_eq!(to_int32(f64::NAN), 0);
    assert_eq!(to_int32(f64::INFINITY), 0);
    assert_eq!(to_uint32(-1.0), u32::MAX);
}

#[test]
fn truthiness() {
    assert!(truthy(1.0));
    assert!(truthy(-0.5));
    assert!(!truthy(0.0));
    assert!(!truthy(-0.0));
    assert!(!truthy(f64::NAN));
}
