#![allow(missing_docs)]

use wiremap::{Decoded, WireScalar};

#[test]
fn booleans_render_as_one_and_zero() {
    assert_eq!(true.encode(None).expect("encode"), "1");
    assert_eq!(false.encode(None).expect("encode"), "0");

    assert_eq!(bool::decode("1").expect("decode"), Decoded::Value(true));
    assert_eq!(bool::decode("0").expect("decode"), Decoded::Value(false));
    assert_eq!(bool::decode("").expect("decode"), Decoded::Empty);
    assert!(bool::decode("yes").is_err());
}

#[test]
fn numbers_use_invariant_formatting() {
    assert_eq!(42i64.encode(None).expect("encode"), "42");
    assert_eq!((-7i32).encode(None).expect("encode"), "-7");
    assert_eq!(180.0f64.encode(None).expect("encode"), "180");

    assert_eq!(i64::decode("42").expect("decode"), Decoded::Value(42));
    assert_eq!(f64::decode("1.5").expect("decode"), Decoded::Value(1.5));
    assert_eq!(u32::decode("").expect("decode"), Decoded::Empty);
    assert!(i64::decode("1,5").is_err());
    assert!(u8::decode("300").is_err());
}

#[test]
fn money_format_fixes_two_decimals() {
    assert_eq!(180.0f64.encode(Some("0.00")).expect("encode"), "180.00");
    assert_eq!(0.5f64.encode(Some("0.00")).expect("encode"), "0.50");
    assert_eq!((-60.0f64).encode(Some("0.00")).expect("encode"), "-60.00");
    assert_eq!(12.346f64.encode(Some("0.00")).expect("encode"), "12.35");
    // Integers route through the same spec.
    assert_eq!(5i64.encode(Some("0.00")).expect("encode"), "5.00");
}

#[test]
fn zero_padded_width_formats() {
    assert_eq!(7u32.encode(Some("000")).expect("encode"), "007");
    assert_eq!(1.5f64.encode(Some("00.0")).expect("encode"), "01.5");
}

#[test]
fn invalid_format_spec_is_rejected() {
    assert!(1.0f64.encode(Some("yyyy-MM")).is_err());
    assert!(1.0f64.encode(Some(".00")).is_err());
}

#[test]
fn strings_pass_through() {
    let text = "Cupom de desconto (CEB-0A9B8C13EA9D)".to_string();
    assert_eq!(text.encode(None).expect("encode"), text);
    assert_eq!(String::decode("").expect("decode"), Decoded::Value(String::new()));
}
