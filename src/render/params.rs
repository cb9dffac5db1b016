use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::mapper::{element_of, map};
use crate::model::{DefaultValue, Direction, Parameter};

/// Identifiers that cannot be used as parameter or enum member names.
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "and", "as", "assert", "async", "await", "break", "class", "continue",
        "def", "del", "elif", "else", "except", "finally", "for", "from",
        "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
        "or", "pass", "raise", "return", "try", "while", "with", "yield",
        "None", "True", "False", "__import__", "__name__", "__doc__",
    ])
});

pub fn safe_name(name: &str) -> String {
    if name.is_empty() {
        return "arg".to_string();
    }
    if KEYWORDS.contains(name) {
        return format!("{name}_");
    }
    name.to_string()
}

/// Comma-joined parameter list, without any receiver.
pub fn render_params(params: &[Parameter]) -> String {
    params.iter().map(render_param).collect::<Vec<_>>().join(", ")
}

/// `self` followed by the parameter list.
pub fn with_receiver(params: &[Parameter]) -> String {
    if params.is_empty() {
        "self".to_string()
    } else {
        format!("self, {}", render_params(params))
    }
}

pub fn render_param(p: &Parameter) -> String {
    let name = safe_name(&p.name);

    if p.variadic {
        if let Some(element) = element_of(&p.ty) {
            return format!("*{name}: {}", map(element));
        }
    }

    let ty = match p.direction {
        // out parameters come back through the return value on the Python side
        Direction::OutRef => return format!("{name}: Any = None"),
        Direction::InRef | Direction::Normal => map(&p.ty),
    };

    match &p.default {
        None => format!("{name}: {ty}"),
        Some(DefaultValue::Null) => format!("{name}: Optional[{ty}] = None"),
        Some(DefaultValue::Bool(true)) => format!("{name}: {ty} = True"),
        Some(DefaultValue::Bool(false)) => format!("{name}: {ty} = False"),
        Some(DefaultValue::Literal(token)) => format!("{name}: {ty} = {token}"),
        Some(DefaultValue::NonPrimitive) => format!("{name}: {ty} = ..."),
    }
}
