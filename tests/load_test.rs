#![allow(missing_docs)]

use std::collections::HashMap;

use wiremap::{MismatchKind, Wiremap, WireCollection, WireObject, WiremapError};

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct SurveyBlock {
    #[wire(
        name = "L_SURVEYCHOICE{Index}",
        pattern = r"^L_SURVEYCHOICE(?<Index>\d+)$",
        key = "Index"
    )]
    choices: Vec<String>,
}

#[test]
fn sparse_indices_expand_with_empty_placeholders() {
    let mut wire = WireCollection::new();
    wire.append("L_SURVEYCHOICE0", "first");
    wire.append("L_SURVEYCHOICE3", "fourth");

    let block: SurveyBlock = Wiremap::load(&wire).expect("load");
    assert_eq!(block.choices.len(), 4);
    assert_eq!(block.choices[0], "first");
    assert_eq!(block.choices[1], "");
    assert_eq!(block.choices[2], "");
    assert_eq!(block.choices[3], "fourth");
}

#[test]
fn unrecognized_keys_are_skipped() {
    let mut wire = WireCollection::new();
    wire.append("CORRELATIONID", "ab1234");
    wire.append("L_SURVEYCHOICE0", "kept");

    let block: SurveyBlock = Wiremap::load(&wire).expect("load");
    assert_eq!(block.choices, vec!["kept".to_string()]);
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct ShippingInfo {
    #[wire(name = "SHIPTOCITY")]
    city: String,
    #[wire(name = "SHIPTOZIP")]
    zip: String,
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct OrderDetails {
    #[wire(name = "INVNUM")]
    invoice: String,
    #[wire(object)]
    shipping: ShippingInfo,
    #[wire(object)]
    note: Option<NoteBlock>,
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct NoteBlock {
    #[wire(name = "NOTETEXT")]
    text: String,
}

#[test]
fn unknown_names_probe_nested_complex_fields() {
    let mut wire = WireCollection::new();
    wire.append("SHIPTOCITY", "Sao Paulo");
    wire.append("SHIPTOZIP", "01310-100");
    wire.append("INVNUM", "INV-7");

    let details: OrderDetails = Wiremap::load(&wire).expect("load");
    assert_eq!(details.invoice, "INV-7");
    assert_eq!(details.shipping.city, "Sao Paulo");
    assert_eq!(details.shipping.zip, "01310-100");
    // Never touched, so never instantiated.
    assert_eq!(details.note, None);
}

#[test]
fn optional_nested_objects_are_instantiated_on_demand() {
    let mut wire = WireCollection::new();
    wire.append("NOTETEXT", "leave at the door");

    let details: OrderDetails = Wiremap::load(&wire).expect("load");
    assert_eq!(details.note, Some(NoteBlock { text: "leave at the door".into() }));
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct Quantities {
    #[wire(name = "QTY", empty_ignore = false)]
    required: i64,
    #[wire(name = "CYCLES")]
    cycles: Option<u32>,
    #[wire(name = "TAXAMT", default = "1.5")]
    tax: f64,
}

#[test]
fn empty_value_loads_the_declared_default() {
    let mut wire = WireCollection::new();
    wire.append("TAXAMT", "");

    let mut target = Quantities { tax: 40.0, ..Quantities::default() };
    Wiremap::load_into(&wire, &mut target).expect("load_into");
    assert_eq!(target.tax, 1.5);
}

#[test]
fn empty_value_into_required_number_fails_when_not_ignored() {
    let mut wire = WireCollection::new();
    wire.append("QTY", "");

    let error = Wiremap::load::<Quantities>(&wire).expect_err("empty is not a number");
    assert!(matches!(error, WiremapError::UnsupportedDecode { field: "required", .. }));
}

#[test]
fn empty_value_into_nullable_number_clears_it() {
    let mut wire = WireCollection::new();
    wire.append("CYCLES", "");

    let mut target = Quantities { cycles: Some(12), ..Quantities::default() };
    Wiremap::load_into(&wire, &mut target).expect("load_into");
    assert_eq!(target.cycles, None);
}

#[test]
fn unparsable_text_is_a_decode_error() {
    let mut wire = WireCollection::new();
    wire.append("QTY", "many");

    let error = Wiremap::load::<Quantities>(&wire).expect_err("not a number");
    assert!(matches!(error, WiremapError::UnsupportedDecode { field: "required", .. }));
}

#[derive(Debug, Clone, PartialEq, WireObject)]
struct VersionedResponse {
    #[wire(name = "VERSION", readonly)]
    version: String,
    #[wire(name = "ACK")]
    ack: String,
}

impl Default for VersionedResponse {
    fn default() -> Self {
        Self { version: "94.0".into(), ack: String::new() }
    }
}

#[test]
fn readonly_field_accepts_its_own_value() {
    let mut wire = WireCollection::new();
    wire.append("VERSION", "94.0");
    wire.append("ACK", "Success");

    let response: VersionedResponse = Wiremap::load(&wire).expect("load");
    assert_eq!(response.ack, "Success");
    assert_eq!(response.version, "94.0");
}

#[test]
fn readonly_field_with_a_different_value_fails_validation() {
    let mut wire = WireCollection::new();
    wire.append("VERSION", "95.0");

    let error = Wiremap::load::<VersionedResponse>(&wire).expect_err("no setter");
    assert!(matches!(
        error,
        WiremapError::ValidationMismatch { field: "version", kind: MismatchKind::NoSetter, .. }
    ));
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct CappedOrder {
    #[wire(name = "QTY", set_with = "CappedOrder::set_quantity")]
    quantity: i64,
}

impl CappedOrder {
    fn set_quantity(&mut self, value: i64) {
        // Business rule: never more than 10 units.
        self.quantity = value.min(10);
    }
}

#[test]
fn custom_setter_runs_and_clamping_is_reported() {
    let mut wire = WireCollection::new();
    wire.append("QTY", "3");
    let order: CappedOrder = Wiremap::load(&wire).expect("load");
    assert_eq!(order.quantity, 3);

    let mut wire = WireCollection::new();
    wire.append("QTY", "50");
    let error = Wiremap::load::<CappedOrder>(&wire).expect_err("clamped value differs");
    assert!(matches!(
        error,
        WiremapError::ValidationMismatch { field: "quantity", kind: MismatchKind::Ineffective, .. }
    ));
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct FixedPair {
    #[wire(name = "B{I}", pattern = r"^B(?<I>\d+)$", key = "I")]
    slots: [i64; 2],
}

#[test]
fn fixed_arrays_accept_in_range_indices() {
    let mut wire = WireCollection::new();
    wire.append("B1", "7");

    let pair: FixedPair = Wiremap::load(&wire).expect("load");
    assert_eq!(pair.slots, [0, 7]);
}

#[test]
fn fixed_arrays_are_never_resized() {
    let mut wire = WireCollection::new();
    wire.append("B5", "1");

    let error = Wiremap::load::<FixedPair>(&wire).expect_err("out of bounds");
    assert!(matches!(
        error,
        WiremapError::ListBounds { field: "slots", index: 5, len: 2 }
    ));
}

#[derive(Debug, Default, WireObject)]
struct NamedMap {
    #[wire(name = "META")]
    meta: HashMap<String, String>,
}

#[test]
fn dictionary_fields_fail_loudly_on_load() {
    let mut wire = WireCollection::new();
    wire.append("META", "a=1");

    let error = Wiremap::load::<NamedMap>(&wire).expect_err("dictionaries are unsupported");
    assert!(matches!(error, WiremapError::DictionaryUnsupported { field: "meta" }));
}
