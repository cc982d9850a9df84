#![allow(missing_docs)]

use wiremap::WireCollection;

#[test]
fn multivalued_keys_preserve_insertion_order() {
    let mut wire = WireCollection::new();
    wire.append("L_ERRORCODE0", "10412");
    wire.append("L_ERRORCODE0", "10417");
    wire.append("ACK", "Failure");

    assert_eq!(wire.len(), 3);
    assert_eq!(wire.get("L_ERRORCODE0"), Some("10412"));
    let values: Vec<_> = wire.get_values("L_ERRORCODE0").collect();
    assert_eq!(values, vec!["10412", "10417"]);
}

#[test]
fn all_keys_yields_each_distinct_key_once() {
    let mut wire = WireCollection::new();
    wire.append("TOKEN", "EC-1");
    wire.append("L_NAME0", "a");
    wire.append("TOKEN", "EC-2");
    wire.append("L_NAME1", "b");

    let keys: Vec<_> = wire.all_keys().collect();
    assert_eq!(keys, vec!["TOKEN", "L_NAME0", "L_NAME1"]);
}

#[test]
fn get_on_missing_key_is_none() {
    let wire = WireCollection::new();
    assert_eq!(wire.get("MISSING"), None);
    assert!(!wire.contains_key("MISSING"));
    assert_eq!(wire.get_values("MISSING").count(), 0);
    assert!(wire.is_empty());
}

#[test]
fn merge_from_is_additive() {
    let mut target = WireCollection::new();
    target.append("TOKEN", "EC-1");

    let mut source = WireCollection::new();
    source.append("TOKEN", "EC-2");
    source.append("AMT", "10.00");

    target.merge_from(&source);

    // The earlier entry survives; the copy appends.
    let tokens: Vec<_> = target.get_values("TOKEN").collect();
    assert_eq!(tokens, vec!["EC-1", "EC-2"]);
    assert_eq!(target.get("AMT"), Some("10.00"));
}

#[test]
fn collects_from_pairs() {
    let wire: WireCollection =
        vec![("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
            .into_iter()
            .collect();
    let entries: Vec<_> = wire.iter().collect();
    assert_eq!(entries, vec![("A", "1"), ("B", "2")]);
}

#[cfg(feature = "query")]
mod query {
    use super::*;

    #[test]
    fn query_string_round_trip() {
        let mut wire = WireCollection::new();
        wire.append("METHOD", "SetExpressCheckout");
        wire.append("DESC", "Premium package & more");
        wire.append("L_NAME0", "Plan=basic");

        let query = wire.to_query_string();
        assert!(!query.contains(' '));
        assert!(query.starts_with("METHOD=SetExpressCheckout&"));

        let back = WireCollection::from_query_string(&query);
        assert_eq!(back, wire);
    }

    #[test]
    fn parses_bare_keys_and_leading_question_mark() {
        let wire = WireCollection::from_query_string("?flag&TOKEN=EC-1");
        assert_eq!(wire.get("flag"), Some(""));
        assert_eq!(wire.get("TOKEN"), Some("EC-1"));
    }
}
