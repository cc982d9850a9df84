#![allow(missing_docs)]

use wiremap::{LoadContext, Wiremap, WireCollection, WireObject, WiremapError};

/// Credential shapes mirror the two authentication styles of the wire
/// protocol: one carries a signature, the other a certificate subject.
trait Credential: WireObject + std::fmt::Debug {
    fn style(&self) -> &'static str;
}

#[derive(Debug, Default, WireObject)]
struct SignatureCredential {
    #[wire(name = "USER")]
    user: String,
    #[wire(name = "PWD")]
    password: String,
    #[wire(name = "SIGNATURE")]
    signature: String,
}

impl Credential for SignatureCredential {
    fn style(&self) -> &'static str {
        "signature"
    }
}

#[derive(Debug, Default, WireObject)]
struct CertificateCredential {
    #[wire(name = "USER")]
    user: String,
    #[wire(name = "PWD")]
    password: String,
}

impl Credential for CertificateCredential {
    fn style(&self) -> &'static str {
        "certificate"
    }
}

fn signature_present(cx: &LoadContext<'_>, _instance: &ApiCall) -> bool {
    cx.has_key("SIGNATURE")
}

fn make_signature() -> Box<dyn Credential> {
    Box::new(SignatureCredential::default())
}

fn make_certificate() -> Box<dyn Credential> {
    Box::new(CertificateCredential::default())
}

#[derive(Debug, Default, WireObject)]
struct ApiCall {
    #[wire(name = "METHOD", order = -2, write_default)]
    method: String,
    #[wire(
        order = -1,
        decision(index = 1, make = "make_signature", when = "signature_present"),
        decision(index = 2, make = "make_certificate")
    )]
    credential: Option<Box<dyn Credential>>,
    #[wire(name = "TOKEN")]
    token: String,
}

#[test]
fn decision_chain_picks_the_signature_shape() {
    let mut wire = WireCollection::new();
    wire.append("USER", "merchant_api1.example.com");
    wire.append("PWD", "hunter2");
    wire.append("SIGNATURE", "A6k...");
    wire.append("TOKEN", "EC-10");

    let call: ApiCall = Wiremap::load(&wire).expect("load");
    let credential = call.credential.expect("credential chosen");
    assert_eq!(credential.style(), "signature");
    assert_eq!(call.token, "EC-10");
}

#[test]
fn decision_chain_falls_back_in_evaluation_order() {
    let mut wire = WireCollection::new();
    wire.append("USER", "merchant_api1.example.com");
    wire.append("PWD", "hunter2");

    let call: ApiCall = Wiremap::load(&wire).expect("load");
    let credential = call.credential.expect("credential chosen");
    assert_eq!(credential.style(), "certificate");
}

#[test]
fn existing_values_are_reused_not_replaced() {
    let mut call = ApiCall {
        credential: Some(Box::new(SignatureCredential {
            user: "preset".into(),
            ..SignatureCredential::default()
        })),
        ..ApiCall::default()
    };

    // No SIGNATURE key: a fresh decision would pick the certificate
    // shape, but the field already holds a value.
    let mut wire = WireCollection::new();
    wire.append("PWD", "updated");
    Wiremap::load_into(&wire, &mut call).expect("load_into");

    let credential = call.credential.expect("credential kept");
    assert_eq!(credential.style(), "signature");
}

#[test]
fn polymorphic_credentials_save_their_own_fields() {
    let call = ApiCall {
        method: "SetExpressCheckout".into(),
        credential: Some(Box::new(SignatureCredential {
            user: "merchant".into(),
            password: "pw".into(),
            signature: "A6k...".into(),
        })),
        token: "EC-11".into(),
    };

    let wire = Wiremap::save(&call).expect("save");
    let keys: Vec<_> = wire.iter().map(|(k, _)| k.to_string()).collect();
    // Save order: METHOD (-2), then the credential block (-1), then TOKEN.
    assert_eq!(keys, vec!["METHOD", "USER", "PWD", "SIGNATURE", "TOKEN"]);
}

#[derive(Debug, Default, WireObject)]
struct Uninstantiable {
    #[wire]
    payload: Option<Box<dyn Credential>>,
}

#[test]
fn a_dyn_field_without_decisions_cannot_be_instantiated() {
    let mut wire = WireCollection::new();
    wire.append("USER", "anyone");

    let error = Wiremap::load::<Uninstantiable>(&wire).expect_err("no constructor");
    assert!(matches!(error, WiremapError::TypeNotInstantiable { field: "payload" }));
}
