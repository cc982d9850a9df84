#![allow(missing_docs)]

use std::collections::HashMap;

use wiremap::{Wiremap, WireCollection, WireObject, WiremapError};

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct PageStyle {
    #[wire(name = "LOCALECODE", default = "\"US\".into()", write_default)]
    locale: String,
    #[wire(name = "BRANDNAME")]
    brand: String,
    #[wire(name = "DESC", write_default, empty_ignore = false)]
    description: String,
    #[wire(name = "HDRIMG", write_default)]
    header_image: String,
}

#[test]
fn default_equal_value_is_elided() {
    let style = PageStyle { brand: String::new(), ..PageStyle::default() };
    let wire = Wiremap::save(&style).expect("save");
    // brand equals its default and write_default is off.
    assert!(!wire.contains_key("BRANDNAME"));
}

#[test]
fn write_default_emits_the_default_encoding() {
    let style = PageStyle { locale: "US".into(), ..PageStyle::default() };
    let wire = Wiremap::save(&style).expect("save");
    assert_eq!(wire.get("LOCALECODE"), Some("US"));
}

#[test]
fn write_default_with_empty_default_is_still_omitted() {
    // header_image defaults to ""; empty_ignore collapses the entry away
    // even though write_default asks for it.
    let style = PageStyle::default();
    let wire = Wiremap::save(&style).expect("save");
    assert!(!wire.contains_key("HDRIMG"));
}

#[test]
fn empty_ignore_off_writes_the_empty_value() {
    let style = PageStyle::default();
    let wire = Wiremap::save(&style).expect("save");
    assert_eq!(wire.get("DESC"), Some(""));
}

#[test]
fn empty_value_collapses_to_default_encoding() {
    // locale explicitly emptied: the empty encoding is replaced by the
    // default's encoding under empty_ignore.
    let style = PageStyle { locale: String::new(), ..PageStyle::default() };
    let wire = Wiremap::save(&style).expect("save");
    assert_eq!(wire.get("LOCALECODE"), Some("US"));
}

#[test]
fn save_into_is_additive() {
    let mut wire = WireCollection::new();
    wire.append("VERSION", "94.0");

    let style = PageStyle { brand: "Cerebello".into(), ..PageStyle::default() };
    Wiremap::save_into(&style, &mut wire).expect("save_into");

    assert_eq!(wire.get("VERSION"), Some("94.0"));
    assert_eq!(wire.get("BRANDNAME"), Some("Cerebello"));
    // The preexisting entry is still first.
    assert_eq!(wire.iter().next(), Some(("VERSION", "94.0")));
}

#[derive(Debug, Default, WireObject)]
struct CustomFields {
    #[wire]
    extras: HashMap<String, String>,
}

#[test]
fn dictionary_fields_fail_loudly_on_save() {
    let mut fields = CustomFields::default();
    fields.extras.insert("a".into(), "1".into());

    let error = Wiremap::save(&fields).expect_err("dictionaries are unsupported");
    assert!(matches!(error, WiremapError::DictionaryUnsupported { field: "extras" }));
}

#[derive(Debug, Default, WireObject)]
struct SurveyBlock {
    #[wire(name = "SURVEYQUESTION")]
    question: String,
    #[wire(
        name = "L_SURVEYCHOICE{Index}",
        pattern = r"^L_SURVEYCHOICE(?<Index>\d+)$",
        key = "Index"
    )]
    choices: Vec<String>,
}

#[test]
fn scalar_list_elements_are_written_with_their_indices() {
    let block = SurveyBlock {
        question: "Favourite plan?".into(),
        choices: vec!["Item 1".into(), "Item 2".into(), "Item 3".into()],
    };

    let wire = Wiremap::save(&block).expect("save");
    assert_eq!(wire.get("L_SURVEYCHOICE0"), Some("Item 1"));
    assert_eq!(wire.get("L_SURVEYCHOICE1"), Some("Item 2"));
    assert_eq!(wire.get("L_SURVEYCHOICE2"), Some("Item 3"));
    assert!(!wire.contains_key("L_SURVEYCHOICE3"));
}
