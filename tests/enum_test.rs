#![allow(missing_docs)]

use wiremap::{Decoded, Wiremap, WireCollection, WireEnum, WireObject, WireScalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WireEnum)]
enum CurrencyCode {
    #[default]
    #[wire(code = "")]
    Undefined,
    #[wire(code = "USD")]
    UsDollar,
    #[wire(code = "EUR")]
    Euro,
    #[wire(code = "BRL")]
    BrazilianReal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WireEnum)]
enum PaymentAction {
    #[default]
    Sale,
    Authorization,
    Order,
}

#[test]
fn declared_codes_win_over_variant_names() {
    assert_eq!(CurrencyCode::UsDollar.encode(None).expect("encode"), "USD");
    assert_eq!(CurrencyCode::decode("BRL").expect("decode"), Decoded::Value(CurrencyCode::BrazilianReal));
    // The undefined variant claims the empty string explicitly.
    assert_eq!(CurrencyCode::Undefined.encode(None).expect("encode"), "");
    assert_eq!(CurrencyCode::decode("").expect("decode"), Decoded::Value(CurrencyCode::Undefined));
}

#[test]
fn variants_without_codes_use_their_names() {
    assert_eq!(PaymentAction::Authorization.encode(None).expect("encode"), "Authorization");
    assert_eq!(
        PaymentAction::decode("Order").expect("decode"),
        Decoded::Value(PaymentAction::Order)
    );
    assert_eq!(PaymentAction::decode("").expect("decode"), Decoded::Empty);
}

#[test]
fn unknown_codes_decode_to_no_value_not_an_error() {
    assert_eq!(CurrencyCode::decode("XYZ").expect("decode"), Decoded::NotFound);
    assert_eq!(PaymentAction::decode("Refund").expect("decode"), Decoded::NotFound);
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct PaymentSetup {
    #[wire(name = "PAYMENTACTION")]
    action: PaymentAction,
    #[wire(name = "CURRENCYCODE", default = "CurrencyCode::Undefined", write_default)]
    currency: CurrencyCode,
    #[wire(name = "BILLINGCODE")]
    billing: Option<CurrencyCode>,
}

#[test]
fn enums_round_trip_through_the_engine() {
    let setup = PaymentSetup {
        action: PaymentAction::Authorization,
        currency: CurrencyCode::Euro,
        billing: Some(CurrencyCode::UsDollar),
    };

    let wire = Wiremap::save(&setup).expect("save");
    assert_eq!(wire.get("PAYMENTACTION"), Some("Authorization"));
    assert_eq!(wire.get("CURRENCYCODE"), Some("EUR"));
    assert_eq!(wire.get("BILLINGCODE"), Some("USD"));

    let loaded: PaymentSetup = Wiremap::load(&wire).expect("load");
    assert_eq!(loaded, setup);
}

#[test]
fn undefined_enum_with_empty_code_is_elided_even_when_kept() {
    // write_default asks for the entry, but the default's encoding is the
    // empty string, and empty entries stay elided.
    let setup = PaymentSetup::default();
    let wire = Wiremap::save(&setup).expect("save");
    assert!(!wire.contains_key("CURRENCYCODE"));
}

#[test]
fn unknown_code_loads_as_the_declared_default() {
    let mut wire = WireCollection::new();
    wire.append("CURRENCYCODE", "XYZ");

    let setup: PaymentSetup = Wiremap::load(&wire).expect("load");
    assert_eq!(setup.currency, CurrencyCode::Undefined);
}

#[test]
fn unknown_code_clears_a_nullable_enum() {
    let mut wire = WireCollection::new();
    wire.append("BILLINGCODE", "???");

    let mut setup = PaymentSetup { billing: Some(CurrencyCode::Euro), ..PaymentSetup::default() };
    Wiremap::load_into(&wire, &mut setup).expect("load_into");
    assert_eq!(setup.billing, None);
}

#[test]
fn empty_enum_value_assigns_the_default() {
    let mut wire = WireCollection::new();
    wire.append("PAYMENTACTION", "");

    let mut setup =
        PaymentSetup { action: PaymentAction::Order, ..PaymentSetup::default() };
    Wiremap::load_into(&wire, &mut setup).expect("load_into");
    assert_eq!(setup.action, PaymentAction::Sale);
}
