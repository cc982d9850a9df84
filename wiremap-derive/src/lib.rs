//! # Wiremap Derive Macros
//!
//! This crate provides the procedural macros for `wiremap`. It turns
//! `#[wire(...)]` field attributes into the static descriptor tables the
//! engine runs on, and enum `#[wire(code = "...")]` attributes into a
//! scalar codec implementation.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitBool, LitInt, LitStr, parse_macro_input};

// --- ATTRIBUTE MODEL ---

#[derive(Default)]
struct DecisionAttr {
    index: i32,
    type_label: Option<String>,
    make: Option<syn::Path>,
    when: Option<syn::Path>,
}

#[derive(Default)]
struct FieldAttrs {
    mapped: bool,
    name: Option<String>,
    format: Option<String>,
    pattern: Option<String>,
    key: Option<String>,
    default: Option<syn::Expr>,
    write_default: bool,
    keep_empty: bool,
    order: Option<syn::Expr>,
    object: bool,
    dictionary: bool,
    elem_scalar: bool,
    readonly: bool,
    no_default: bool,
    set_with: Option<syn::Path>,
    decisions: Vec<DecisionAttr>,
    elem_decisions: Vec<DecisionAttr>,
}

fn parse_decision(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<DecisionAttr> {
    let mut decision = DecisionAttr::default();
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("index") {
            decision.index = inner.value()?.parse::<LitInt>()?.base10_parse()?;
            Ok(())
        } else if inner.path.is_ident("make") {
            let lit: LitStr = inner.value()?.parse()?;
            decision.type_label = Some(lit.value());
            decision.make = Some(lit.parse()?);
            Ok(())
        } else if inner.path.is_ident("when") {
            let lit: LitStr = inner.value()?.parse()?;
            decision.when = Some(lit.parse()?);
            Ok(())
        } else {
            Err(inner.error("unknown decision key. Supported: index, make, when"))
        }
    })?;
    if decision.make.is_none() {
        return Err(meta.error("decision requires a `make` constructor path"));
    }
    Ok(decision)
}

/// Parses the `#[wire(...)]` attributes of one field.
fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("wire") {
            continue;
        }
        out.mapped = true;
        // A bare `#[wire]` marks the field with all defaults.
        if matches!(attr.meta, syn::Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("format") {
                out.format = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("pattern") {
                out.pattern = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("key") {
                out.key = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("default") {
                out.default = Some(meta.value()?.parse::<LitStr>()?.parse()?);
            } else if meta.path.is_ident("write_default") {
                out.write_default = true;
            } else if meta.path.is_ident("empty_ignore") {
                out.keep_empty = !meta.value()?.parse::<LitBool>()?.value;
            } else if meta.path.is_ident("order") {
                out.order = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("object") {
                out.object = true;
            } else if meta.path.is_ident("dictionary") {
                out.dictionary = true;
            } else if meta.path.is_ident("elem_scalar") {
                out.elem_scalar = true;
            } else if meta.path.is_ident("readonly") {
                out.readonly = true;
            } else if meta.path.is_ident("no_default") {
                out.no_default = true;
            } else if meta.path.is_ident("set_with") {
                out.set_with = Some(meta.value()?.parse::<LitStr>()?.parse()?);
            } else if meta.path.is_ident("decision") {
                let decision = parse_decision(&meta)?;
                out.decisions.push(decision);
            } else if meta.path.is_ident("elem_decision") {
                let decision = parse_decision(&meta)?;
                out.elem_decisions.push(decision);
            } else {
                return Err(meta.error(
                    "unknown wire attribute key. Supported: name, format, pattern, key, \
                     default, write_default, empty_ignore, order, object, dictionary, \
                     elem_scalar, readonly, no_default, set_with, decision, elem_decision",
                ));
            }
            Ok(())
        })?;
    }

    Ok(out)
}

// --- TYPE CLASSIFICATION ---

fn path_last(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    }
}

fn generic_arg(segment: &syn::PathSegment) -> Option<&syn::Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|a| match a {
            syn::GenericArgument::Type(t) => Some(t),
            _ => None,
        }),
        _ => None,
    }
}

fn as_option(ty: &syn::Type) -> Option<&syn::Type> {
    path_last(ty).filter(|s| s.ident == "Option").and_then(generic_arg)
}

fn is_box_dyn(ty: &syn::Type) -> bool {
    path_last(ty)
        .filter(|s| s.ident == "Box")
        .and_then(generic_arg)
        .is_some_and(|inner| matches!(inner, syn::Type::TraitObject(_)))
}

fn is_primitive_scalar(ty: &syn::Type) -> bool {
    const NAMES: &[&str] = &[
        "String", "bool", "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize",
        "f32", "f64",
    ];
    path_last(ty).is_some_and(|s| {
        s.arguments.is_empty() && NAMES.iter().any(|n| s.ident == n)
    })
}

fn is_dictionary(ty: &syn::Type) -> bool {
    path_last(ty).is_some_and(|s| s.ident == "HashMap" || s.ident == "BTreeMap")
}

enum ElemKind<'a> {
    Scalar(&'a syn::Type),
    Object { ty: &'a syn::Type, boxed_dyn: bool },
}

enum ValueKind<'a> {
    Scalar(&'a syn::Type),
    Object { ty: &'a syn::Type, boxed_dyn: bool },
    List { list_ty: &'a syn::Type, elem: ElemKind<'a>, fixed: bool },
    Dictionary,
}

struct FieldPlan<'a> {
    ident: &'a syn::Ident,
    attrs: FieldAttrs,
    optional: bool,
    kind: ValueKind<'a>,
}

fn classify<'a>(ty: &'a syn::Type, attrs: &FieldAttrs) -> syn::Result<(bool, ValueKind<'a>)> {
    let (optional, inner) = match as_option(ty) {
        Some(inner) => (true, inner),
        None => (false, ty),
    };

    if attrs.dictionary || is_dictionary(inner) {
        return Ok((optional, ValueKind::Dictionary));
    }

    // Collections: Vec, GuardedList, fixed-size arrays.
    let list = match inner {
        syn::Type::Array(arr) => Some((inner, &*arr.elem, true)),
        _ => path_last(inner)
            .filter(|s| s.ident == "Vec" || s.ident == "GuardedList")
            .and_then(generic_arg)
            .map(|elem| (inner, elem, false)),
    };
    if let Some((list_ty, elem_ty, fixed)) = list {
        let elem = if attrs.elem_scalar || is_primitive_scalar(elem_ty) {
            ElemKind::Scalar(elem_ty)
        } else {
            ElemKind::Object { ty: elem_ty, boxed_dyn: is_box_dyn(elem_ty) }
        };
        return Ok((optional, ValueKind::List { list_ty, elem, fixed }));
    }

    if attrs.object || is_box_dyn(inner) {
        return Ok((optional, ValueKind::Object { ty: inner, boxed_dyn: is_box_dyn(inner) }));
    }

    // Everything else is a scalar: primitives, String, and user enums or
    // newtypes implementing WireScalar.
    Ok((optional, ValueKind::Scalar(inner)))
}

// --- GENERATOR: WireObject ---

/// Derives `wiremap::schema::WireObject` for a struct with named fields.
///
/// Only fields carrying a `#[wire(...)]` attribute participate in
/// conversion.
#[proc_macro_derive(WireObject, attributes(wire))]
pub fn derive_wire_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new(name.span(), "WireObject does not support generic types")
            .to_compile_error()
            .into();
    }

    let fields = match input.data {
        Data::Struct(ds) => match ds.fields {
            Fields::Named(named) => named.named,
            _ => {
                return syn::Error::new(name.span(), "WireObject requires named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(name.span(), "WireObject only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut plans = Vec::new();
    for field in &fields {
        let attrs = match parse_field_attrs(&field.attrs) {
            Ok(attrs) => attrs,
            Err(e) => return e.to_compile_error().into(),
        };
        if !attrs.mapped {
            continue;
        }
        let Some(ident) = &field.ident else { continue };
        let (optional, kind) = match classify(&field.ty, &attrs) {
            Ok(done) => done,
            Err(e) => return e.to_compile_error().into(),
        };
        plans.push(FieldPlan { ident, attrs, optional, kind });
    }

    let field_defs = plans.iter().map(|plan| generate_field_def(&name, plan));
    let name_str = name.to_string();

    let expanded = quote! {
        impl wiremap::schema::WireObject for #name {
            fn schema(&self) -> &'static wiremap::schema::Schema {
                static FIELDS: &[wiremap::schema::FieldDef] = &[ #(#field_defs),* ];
                static SCHEMA: wiremap::schema::Schema = wiremap::schema::Schema {
                    type_name: #name_str,
                    fields: FIELDS,
                };
                &SCHEMA
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds the constructor thunk of one decision entry, type-checked
/// against the slot type it will populate.
fn decision_entries(
    host: &syn::Ident,
    slot_ty: proc_macro2::TokenStream,
    decisions: &[DecisionAttr],
) -> proc_macro2::TokenStream {
    let entries = decisions.iter().map(|d| {
        let index = d.index;
        let label = d.type_label.clone().unwrap_or_default();
        let make = d.make.as_ref();
        let decide = match &d.when {
            Some(when) => quote! {
                ::core::option::Option::Some(|cx, any| {
                    match any.downcast_ref::<#host>() {
                        ::core::option::Option::Some(instance) => #when(cx, instance),
                        ::core::option::Option::None => false,
                    }
                })
            },
            None => quote! { ::core::option::Option::None },
        };
        quote! {
            wiremap::schema::TypeDecision {
                index: #index,
                type_name: #label,
                decide: #decide,
                make: || {
                    let value: #slot_ty = #make();
                    ::std::boxed::Box::new(value)
                },
            }
        }
    });
    quote! { &[ #(#entries),* ] }
}

fn generate_field_def(host: &syn::Ident, plan: &FieldPlan<'_>) -> proc_macro2::TokenStream {
    let attrs = &plan.attrs;
    let field_name = plan.ident.to_string();

    let is_scalar = matches!(plan.kind, ValueKind::Scalar(_));
    let wire_name = match (&attrs.name, is_scalar) {
        (Some(name), _) => quote! { ::core::option::Option::Some(#name) },
        (None, true) => quote! { ::core::option::Option::Some(#field_name) },
        (None, false) => quote! { ::core::option::Option::None },
    };
    let value_format = option_str(&attrs.format);
    let name_pattern = option_str(&attrs.pattern);
    let key_name = option_str(&attrs.key);
    let write_default = attrs.write_default;
    let empty_ignore = !attrs.keep_empty;
    let save_order = match &attrs.order {
        Some(expr) => quote! { (#expr) as f32 },
        None => quote! { 0.0 },
    };

    let shape = generate_shape(host, plan);

    let slot_ty = slot_type(plan);
    let decisions = decision_entries(host, slot_ty, &attrs.decisions);
    let elem_decisions = match &plan.kind {
        ValueKind::List { elem, .. } => {
            let elem_ty = match elem {
                ElemKind::Scalar(ty) => quote! { #ty },
                ElemKind::Object { ty, .. } => quote! { #ty },
            };
            decision_entries(host, elem_ty, &attrs.elem_decisions)
        }
        _ => quote! { &[] },
    };

    quote! {
        wiremap::schema::FieldDef {
            field_name: #field_name,
            wire_name: #wire_name,
            value_format: #value_format,
            name_pattern: #name_pattern,
            key_name: #key_name,
            write_default: #write_default,
            empty_ignore: #empty_ignore,
            save_order: #save_order,
            shape: #shape,
            decisions: #decisions,
            element_decisions: #elem_decisions,
        }
    }
}

fn option_str(value: &Option<String>) -> proc_macro2::TokenStream {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(#s) },
        None => quote! { ::core::option::Option::None },
    }
}

/// The type a field decision's constructor must produce.
fn slot_type(plan: &FieldPlan<'_>) -> proc_macro2::TokenStream {
    match &plan.kind {
        ValueKind::Scalar(ty) => quote! { #ty },
        ValueKind::Object { ty, .. } => quote! { #ty },
        ValueKind::List { list_ty, .. } => quote! { #list_ty },
        ValueKind::Dictionary => quote! { () },
    }
}

fn generate_shape(host: &syn::Ident, plan: &FieldPlan<'_>) -> proc_macro2::TokenStream {
    match &plan.kind {
        ValueKind::Dictionary => quote! { wiremap::schema::FieldShape::Dictionary },
        ValueKind::Scalar(ty) => generate_scalar_shape(host, plan, ty),
        ValueKind::Object { ty, boxed_dyn } => generate_object_shape(host, plan, ty, *boxed_dyn),
        ValueKind::List { list_ty, elem, fixed } => {
            generate_list_shape(host, plan, list_ty, elem, *fixed)
        }
    }
}

fn generate_scalar_shape(
    host: &syn::Ident,
    plan: &FieldPlan<'_>,
    ty: &syn::Type,
) -> proc_macro2::TokenStream {
    let f = plan.ident;
    let attrs = &plan.attrs;

    if plan.optional {
        let mk_default = match &attrs.default {
            Some(expr) => quote! { || #expr },
            None => quote! { || ::core::option::Option::None },
        };
        let assign = if attrs.readonly {
            quote! { ::core::option::Option::None }
        } else if let Some(set) = &attrs.set_with {
            quote! { ::core::option::Option::Some(
                |any, text| wiremap::rt::assign_with_opt::<#host, #ty>(any, #set, text)
            ) }
        } else {
            quote! { ::core::option::Option::Some(
                |any, text| wiremap::rt::assign_opt::<#host, #ty>(any, |s| &mut s.#f, text)
            ) }
        };
        let assign_default = if attrs.readonly {
            quote! { ::core::option::Option::None }
        } else if let Some(set) = &attrs.set_with {
            quote! { ::core::option::Option::Some(
                |any| wiremap::rt::assign_default_with::<#host, ::core::option::Option<#ty>>(any, #set, #mk_default)
            ) }
        } else {
            quote! { ::core::option::Option::Some(
                |any| wiremap::rt::assign_default::<#host, ::core::option::Option<#ty>>(any, |s| &mut s.#f, #mk_default)
            ) }
        };
        quote! {
            wiremap::schema::FieldShape::Scalar(wiremap::schema::ScalarOps {
                encode: |any, format| wiremap::rt::encode_opt::<#host, #ty>(any, |s| &s.#f, format),
                encode_default: |format| wiremap::rt::encode_default_opt::<#ty>(#mk_default, format),
                is_default: |any| wiremap::rt::is_default::<#host, ::core::option::Option<#ty>>(any, |s| &s.#f, #mk_default),
                assign: #assign,
                assign_default: #assign_default,
                agrees: |any, text| wiremap::rt::agrees_opt::<#host, #ty>(any, |s| &s.#f, text),
            })
        }
    } else {
        let mk_default = match &attrs.default {
            Some(expr) => quote! { || #expr },
            None => quote! { || <#ty as ::core::default::Default>::default() },
        };
        let assign = if attrs.readonly {
            quote! { ::core::option::Option::None }
        } else if let Some(set) = &attrs.set_with {
            quote! { ::core::option::Option::Some(
                |any, text| wiremap::rt::assign_with::<#host, #ty>(any, #set, #mk_default, text)
            ) }
        } else {
            quote! { ::core::option::Option::Some(
                |any, text| wiremap::rt::assign::<#host, #ty>(any, |s| &mut s.#f, #mk_default, text)
            ) }
        };
        let assign_default = if attrs.readonly {
            quote! { ::core::option::Option::None }
        } else if let Some(set) = &attrs.set_with {
            quote! { ::core::option::Option::Some(
                |any| wiremap::rt::assign_default_with::<#host, #ty>(any, #set, #mk_default)
            ) }
        } else {
            quote! { ::core::option::Option::Some(
                |any| wiremap::rt::assign_default::<#host, #ty>(any, |s| &mut s.#f, #mk_default)
            ) }
        };
        quote! {
            wiremap::schema::FieldShape::Scalar(wiremap::schema::ScalarOps {
                encode: |any, format| wiremap::rt::encode::<#host, #ty>(any, |s| &s.#f, format),
                encode_default: |format| wiremap::rt::encode_default::<#ty>(#mk_default, format),
                is_default: |any| wiremap::rt::is_default::<#host, #ty>(any, |s| &s.#f, #mk_default),
                assign: #assign,
                assign_default: #assign_default,
                agrees: |any, text| wiremap::rt::agrees::<#host, #ty>(any, |s| &s.#f, #mk_default, text),
            })
        }
    }
}

fn generate_object_shape(
    host: &syn::Ident,
    plan: &FieldPlan<'_>,
    ty: &syn::Type,
    boxed_dyn: bool,
) -> proc_macro2::TokenStream {
    let f = plan.ident;

    if plan.optional {
        let (get, get_mut) = if boxed_dyn {
            (
                quote! { |any| any.downcast_ref::<#host>()
                    .and_then(|s| s.#f.as_deref())
                    .map(|v| v as &dyn wiremap::schema::WireObject) },
                quote! { |any| any.downcast_mut::<#host>()
                    .and_then(|s| s.#f.as_deref_mut())
                    .map(|v| v as &mut dyn wiremap::schema::WireObject) },
            )
        } else {
            (
                quote! { |any| any.downcast_ref::<#host>()
                    .and_then(|s| s.#f.as_ref())
                    .map(|v| v as &dyn wiremap::schema::WireObject) },
                quote! { |any| any.downcast_mut::<#host>()
                    .and_then(|s| s.#f.as_mut())
                    .map(|v| v as &mut dyn wiremap::schema::WireObject) },
            )
        };
        let make_default = if boxed_dyn || plan.attrs.no_default {
            quote! { ::core::option::Option::None }
        } else {
            quote! { ::core::option::Option::Some(
                || ::std::boxed::Box::new(<#ty as ::core::default::Default>::default())
            ) }
        };
        quote! {
            wiremap::schema::FieldShape::Object(wiremap::schema::ObjectOps {
                present: |any| any.downcast_ref::<#host>().is_some_and(|s| s.#f.is_some()),
                get: #get,
                get_mut: #get_mut,
                install: ::core::option::Option::Some(
                    |any, value| wiremap::rt::install::<#host, #ty>(any, |s| &mut s.#f, value)
                ),
                make_default: #make_default,
                clear: ::core::option::Option::Some(|any| {
                    if let ::core::option::Option::Some(s) = any.downcast_mut::<#host>() {
                        s.#f = ::core::option::Option::None;
                    }
                }),
            })
        }
    } else {
        let (get, get_mut) = if boxed_dyn {
            (
                quote! { |any| any.downcast_ref::<#host>()
                    .map(|s| &*s.#f as &dyn wiremap::schema::WireObject) },
                quote! { |any| any.downcast_mut::<#host>()
                    .map(|s| &mut *s.#f as &mut dyn wiremap::schema::WireObject) },
            )
        } else {
            (
                quote! { |any| any.downcast_ref::<#host>()
                    .map(|s| &s.#f as &dyn wiremap::schema::WireObject) },
                quote! { |any| any.downcast_mut::<#host>()
                    .map(|s| &mut s.#f as &mut dyn wiremap::schema::WireObject) },
            )
        };
        quote! {
            wiremap::schema::FieldShape::Object(wiremap::schema::ObjectOps {
                present: |_any| true,
                get: #get,
                get_mut: #get_mut,
                install: ::core::option::Option::None,
                make_default: ::core::option::Option::None,
                clear: ::core::option::Option::None,
            })
        }
    }
}

fn generate_list_shape(
    host: &syn::Ident,
    plan: &FieldPlan<'_>,
    list_ty: &syn::Type,
    elem: &ElemKind<'_>,
    fixed: bool,
) -> proc_macro2::TokenStream {
    let f = plan.ident;
    let can_expand = !fixed;

    let (proj, proj_mut, present, install, make_default, clear) = if plan.optional {
        (
            quote! { |s: &#host| s.#f.as_ref() },
            quote! { |s: &mut #host| s.#f.as_mut() },
            quote! { |any| any.downcast_ref::<#host>().is_some_and(|s| s.#f.is_some()) },
            quote! { ::core::option::Option::Some(
                |any, value| wiremap::rt::install::<#host, #list_ty>(any, |s| &mut s.#f, value)
            ) },
            if plan.attrs.no_default {
                quote! { ::core::option::Option::None }
            } else {
                quote! { ::core::option::Option::Some(
                    || ::std::boxed::Box::new(<#list_ty as ::core::default::Default>::default())
                ) }
            },
            quote! { ::core::option::Option::Some(|any| {
                if let ::core::option::Option::Some(s) = any.downcast_mut::<#host>() {
                    s.#f = ::core::option::Option::None;
                }
            }) },
        )
    } else {
        (
            quote! { |s: &#host| ::core::option::Option::Some(&s.#f) },
            quote! { |s: &mut #host| ::core::option::Option::Some(&mut s.#f) },
            quote! { |_any| true },
            quote! { ::core::option::Option::None },
            quote! { ::core::option::Option::None },
            quote! { ::core::option::Option::None },
        )
    };

    let (elem_ty, elem_make, element) = match elem {
        ElemKind::Scalar(ty) => (
            quote! { #ty },
            quote! { ::core::option::Option::Some(
                || <#ty as ::core::default::Default>::default()
            ) },
            quote! {
                wiremap::schema::ElementShape::Scalar(wiremap::schema::ScalarElementOps {
                    encode: |any, index, format|
                        wiremap::rt::elem_encode::<#host, #list_ty, #ty>(any, #proj, index, format),
                    assign: |any, index, text|
                        wiremap::rt::elem_assign::<#host, #list_ty, #ty>(any, #proj_mut, index, text),
                })
            },
        ),
        ElemKind::Object { ty, boxed_dyn } => {
            let element = if *boxed_dyn {
                quote! {
                    wiremap::schema::ElementShape::Object(wiremap::schema::ObjectElementOps {
                        get: |any, index| {
                            let list = (#proj)(any.downcast_ref::<#host>()?)?;
                            let element =
                                <#list_ty as wiremap::list::WireList<#ty>>::get(list, index)?;
                            ::core::option::Option::Some(&**element as &dyn wiremap::schema::WireObject)
                        },
                        get_mut: |any, index| {
                            let list = (#proj_mut)(any.downcast_mut::<#host>()?)?;
                            let element =
                                <#list_ty as wiremap::list::WireList<#ty>>::get_mut(list, index)?;
                            ::core::option::Option::Some(&mut **element as &mut dyn wiremap::schema::WireObject)
                        },
                    })
                }
            } else {
                quote! {
                    wiremap::schema::ElementShape::Object(wiremap::schema::ObjectElementOps {
                        get: |any, index|
                            wiremap::rt::elem_object::<#host, #list_ty, #ty>(any, #proj, index),
                        get_mut: |any, index|
                            wiremap::rt::elem_object_mut::<#host, #list_ty, #ty>(any, #proj_mut, index),
                    })
                }
            };
            let elem_make = if *boxed_dyn || plan.attrs.no_default {
                quote! { ::core::option::Option::None }
            } else {
                quote! { ::core::option::Option::Some(
                    || <#ty as ::core::default::Default>::default()
                ) }
            };
            (quote! { #ty }, elem_make, element)
        }
    };

    quote! {
        wiremap::schema::FieldShape::List(wiremap::schema::ListOps {
            present: #present,
            install: #install,
            make_default: #make_default,
            clear: #clear,
            len: |any| wiremap::rt::list_len::<#host, #list_ty, #elem_ty>(any, #proj),
            can_expand: #can_expand,
            expand: |any, seed|
                wiremap::rt::list_expand::<#host, #list_ty, #elem_ty>(any, #proj_mut, #elem_make, seed),
            truncate: |any, len|
                wiremap::rt::list_truncate::<#host, #list_ty, #elem_ty>(any, #proj_mut, len),
            element: #element,
        })
    }
}

// --- GENERATOR: WireEnum ---

/// Derives `wiremap::codec::WireScalar` for a fieldless enum.
///
/// Each variant encodes as its `#[wire(code = "...")]` string, falling
/// back to the variant's own name. Decoding an unknown code yields
/// "not found" rather than an error.
#[proc_macro_derive(WireEnum, attributes(wire))]
pub fn derive_wire_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let data_enum = match input.data {
        Data::Enum(e) => e,
        _ => {
            return syn::Error::new(name.span(), "WireEnum only supports enums")
                .to_compile_error()
                .into();
        }
    };

    let mut codes = Vec::new();
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.ident.span(), "WireEnum variants must be fieldless")
                .to_compile_error()
                .into();
        }
        let mut code = variant.ident.to_string();
        for attr in &variant.attrs {
            if !attr.path().is_ident("wire") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("code") {
                    code = meta.value()?.parse::<LitStr>()?.value();
                    Ok(())
                } else {
                    Err(meta.error("unknown wire attribute key on enum variant. Supported: code"))
                }
            });
            if let Err(e) = result {
                return e.to_compile_error().into();
            }
        }
        codes.push((variant.ident.clone(), code));
    }

    let encode_arms = codes.iter().map(|(variant, code)| {
        quote! { Self::#variant => #code, }
    });
    let decode_arms = codes.iter().map(|(variant, code)| {
        quote! { #code => wiremap::codec::Decoded::Value(Self::#variant), }
    });
    // An explicit "" code claims the empty string; otherwise empty means
    // "no value".
    let empty_arm = if codes.iter().any(|(_, code)| code.is_empty()) {
        quote! {}
    } else {
        quote! { "" => wiremap::codec::Decoded::Empty, }
    };

    let expanded = quote! {
        impl wiremap::codec::WireScalar for #name {
            fn encode(
                &self,
                _format: ::core::option::Option<&str>,
            ) -> wiremap::codec::CodecResult<::std::string::String> {
                ::core::result::Result::Ok(
                    ::std::string::ToString::to_string(match self { #(#encode_arms)* })
                )
            }

            fn decode(
                text: &str,
            ) -> wiremap::codec::CodecResult<wiremap::codec::Decoded<Self>> {
                ::core::result::Result::Ok(match text {
                    #(#decode_arms)*
                    #empty_arm
                    _ => wiremap::codec::Decoded::NotFound,
                })
            }
        }
    };

    TokenStream::from(expanded)
}
