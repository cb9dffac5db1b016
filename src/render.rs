//! Stub text for a single type and its members.
//!
//! Layout of a class body, each section only present when it has content:
//!
//! ```text
//! class Name: # Inherits from Base
//!     # Constructors
//!     # Properties
//!     # Fields
//!     # Methods
//!     # Nested Types
//! ```
//!
//! A body with nothing in it gets a lone `pass`.
//!
//! Conversion operators (`op_Implicit`, `op_Explicit`) become
//! `@overload def __init__` under `# Methods`. They do not join the
//! `# Constructors` overload set, so a type with a single constructor plus a
//! conversion ends up with one plain `__init__` and one lone `@overload`, which
//! strict type checkers reject.
pub mod operators;
pub mod params;

use std::fmt::Write;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::filter;
use crate::mapper::map;
use crate::model::{Constructor, Field, Member, Method, Property, TypeDescriptor, TypeKind};
use params::{render_params, safe_name, with_receiver};

const INDENT: &str = "    ";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Render `ty` at `depth` levels of indentation.
///
/// Returns `Ok(None)` when the type's kind has no stub form; that is logged and
/// the caller moves on. `Err` means the renderer itself failed and the run
/// should stop.
pub fn render_type(ty: &TypeDescriptor, depth: usize) -> Result<Option<String>> {
    let mut out = String::new();
    match ty.kind {
        TypeKind::Enum => render_enum(ty, &mut out, depth)?,
        TypeKind::Class | TypeKind::Struct | TypeKind::Interface => {
            render_class(ty, &mut out, depth)?
        }
        TypeKind::Unsupported => {
            let error = Error::UnsupportedTypeKind { name: qualified_name(ty) };
            warn!(origin = %ty.origin, "{error}");
            return Ok(None);
        }
    }
    Ok(Some(out))
}

fn render_enum(ty: &TypeDescriptor, out: &mut String, depth: usize) -> Result {
    let pad = INDENT.repeat(depth);
    writeln!(out, "{pad}class {}(Enum):", ty.name)?;
    if ty.enum_members.is_empty() {
        writeln!(out, "{pad}{INDENT}pass")?;
        return Ok(());
    }
    for member in &ty.enum_members {
        writeln!(out, "{pad}{INDENT}{} = {}", safe_name(&member.name), member.value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_class(ty: &TypeDescriptor, out: &mut String, depth: usize) -> Result {
    let pad = INDENT.repeat(depth);
    match &ty.base {
        Some(base) => writeln!(out, "{pad}class {}: # Inherits from {base}", ty.name)?,
        None => writeln!(out, "{pad}class {}:", ty.name)?,
    }

    let mut constructors = Vec::new();
    let mut properties = Vec::new();
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut nested = Vec::new();
    for member in &ty.members {
        if let Some(reason) = filter::member_rejection(member) {
            debug!(owner = %ty.name, member = member.name(), reason, "skipping member");
            continue;
        }
        match member {
            Member::Constructor(x) => constructors.push(x),
            Member::Property(x) => properties.push(x),
            Member::Field(x) => fields.push(x),
            Member::Method(x) => methods.push(x),
            Member::Nested(x) => nested.push(&**x),
        }
    }

    let inner = depth + 1;
    let sections = [
        ("# Constructors", render_constructors(&constructors, inner)?),
        ("# Properties", render_properties(&properties, inner)?),
        ("# Fields", render_fields(&fields, inner)?),
        ("# Methods", render_methods(&ty.name, &methods, inner)?),
        ("# Nested Types", render_nested(&nested, inner)?),
    ];

    let mut empty = true;
    for (header, body) in sections {
        if body.is_empty() {
            continue;
        }
        writeln!(out, "{pad}{INDENT}{header}")?;
        out.push_str(&body);
        empty = false;
    }
    if empty {
        writeln!(out, "{pad}{INDENT}pass")?;
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// MEMBERS
// ————————————————————————————————————————————————————————————————————————————

fn render_constructors(constructors: &[&Constructor], depth: usize) -> Result<String> {
    let pad = INDENT.repeat(depth);
    let overloaded = constructors.len() > 1;
    let mut out = String::new();
    for ctor in constructors {
        if overloaded {
            writeln!(out, "{pad}@overload")?;
        }
        writeln!(out, "{pad}def __init__({}) -> None: ...", with_receiver(&ctor.parameters))?;
    }
    Ok(out)
}

fn render_properties(properties: &[&Property], depth: usize) -> Result<String> {
    let pad = INDENT.repeat(depth);
    let mut out = String::new();
    for prop in properties {
        let ty = map(&prop.ty);
        if prop.is_indexer() {
            let key = map(&prop.index_parameters[0].ty);
            if prop.readable {
                writeln!(out, "{pad}def __getitem__(self, key: {key}) -> {ty}: ...")?;
            }
            if prop.writable {
                writeln!(out, "{pad}def __setitem__(self, key: {key}, value: {ty}) -> None: ...")?;
            }
        } else if prop.is_static {
            writeln!(out, "{pad}{}: {ty}", prop.name)?;
        } else {
            writeln!(out, "{pad}@property")?;
            writeln!(out, "{pad}def {}(self) -> {ty}: ...", prop.name)?;
            if prop.writable && prop.has_public_setter {
                writeln!(out, "{pad}@{}.setter", prop.name)?;
                writeln!(out, "{pad}def {}(self, value: {ty}) -> None: ...", prop.name)?;
            }
        }
    }
    Ok(out)
}

fn render_fields(fields: &[&Field], depth: usize) -> Result<String> {
    let pad = INDENT.repeat(depth);
    let mut out = String::new();
    for field in fields {
        let ty = map(&field.ty);
        if field.is_static {
            writeln!(out, "{pad}{}: ClassVar[{ty}]", field.name)?;
        } else {
            writeln!(out, "{pad}{}: {ty}", field.name)?;
        }
    }
    Ok(out)
}

/// Methods grouped by name, groups in order of first appearance.
fn render_methods(owner: &str, methods: &[&Method], depth: usize) -> Result<String> {
    let mut groups: IndexMap<&str, Vec<&Method>> = IndexMap::new();
    for &method in methods {
        groups.entry(method.name.as_str()).or_default().push(method);
    }

    let mut out = String::new();
    for group in groups.values() {
        let (operators, plain): (Vec<&Method>, Vec<&Method>) =
            group.iter().copied().partition(|m| m.operator.is_some());
        for method in operators {
            render_operator(owner, method, &mut out, depth)?;
        }
        let overloaded = plain.len() > 1;
        for method in plain {
            render_method(method, overloaded, &mut out, depth)?;
        }
    }
    Ok(out)
}

fn render_method(method: &Method, overloaded: bool, out: &mut String, depth: usize) -> Result {
    let pad = INDENT.repeat(depth);
    if overloaded {
        writeln!(out, "{pad}@overload")?;
    }
    let ret = map(&method.return_type);
    if method.is_static {
        writeln!(out, "{pad}@staticmethod")?;
        writeln!(out, "{pad}def {}({}) -> {ret}: ...", method.name, render_params(&method.parameters))?;
    } else {
        writeln!(out, "{pad}def {}({}) -> {ret}: ...", method.name, with_receiver(&method.parameters))?;
    }
    Ok(())
}

fn render_operator(owner: &str, method: &Method, out: &mut String, depth: usize) -> Result {
    let pad = INDENT.repeat(depth);
    let symbol = method.operator.as_deref().unwrap_or(&method.name);
    let params = with_receiver(&method.parameters);
    match operators::target_name(symbol) {
        None => {
            let error = Error::UnsupportedOperator {
                owner: owner.to_string(),
                symbol: symbol.to_string(),
            };
            warn!("{error}");
        }
        Some(operators::INITIALIZER) => {
            // conversions join the constructor overload set
            writeln!(out, "{pad}@overload")?;
            writeln!(out, "{pad}def __init__({params}) -> None: ...")?;
        }
        Some(target) => {
            let ret = map(&method.return_type);
            writeln!(out, "{pad}def {target}({params}) -> {ret}: ...")?;
        }
    }
    Ok(())
}

fn render_nested(nested: &[&TypeDescriptor], depth: usize) -> Result<String> {
    let mut out = String::new();
    for ty in nested {
        if let Some(text) = render_type(ty, depth)? {
            out.push('\n');
            out.push_str(&text);
        }
    }
    Ok(out)
}

fn qualified_name(ty: &TypeDescriptor) -> String {
    match ty.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => format!("{ns}.{}", ty.name),
        _ => ty.name.clone(),
    }
}
