//! `TypeRef` → Python type expression.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Container, Primitive, TypeRef};

/// Generic arity suffix in metadata names, e.g. the `` `2 `` in ``Dictionary`2``.
static ARITY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"`\d+$").unwrap());

impl Primitive {
    /// Fixed primitive table.
    pub fn target_name(self) -> &'static str {
        match self {
            Primitive::Void => "None",
            Primitive::Bool => "bool",
            Primitive::Byte
            | Primitive::Sbyte
            | Primitive::Int16
            | Primitive::Uint16
            | Primitive::Int32
            | Primitive::Uint32
            | Primitive::Int64
            | Primitive::Uint64 => "int",
            Primitive::Single | Primitive::Double | Primitive::Decimal => "float",
            Primitive::String | Primitive::Char => "str",
            Primitive::Object => "Any",
            Primitive::DateTime => "datetime",
        }
    }
}

pub fn map(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive { primitive } => primitive.target_name().to_string(),
        TypeRef::Nullable { inner } => format!("Optional[{}]", map(inner)),
        TypeRef::Array { element } => format!("List[{}]", map(element)),
        TypeRef::Container { container, args } => match container {
            Container::List | Container::Sequence => format!("List[{}]", arg(args, 0)),
            Container::Set => format!("Set[{}]", arg(args, 0)),
            Container::Dict => format!("Dict[{}, {}]", arg(args, 0), arg(args, 1)),
        },
        TypeRef::Generic { name, args } => {
            let name = strip_arity(name);
            if args.is_empty() {
                name.to_string()
            } else {
                let args = args.iter().map(map).collect::<Vec<_>>().join(", ");
                format!("{name}[{args}]")
            }
        }
        TypeRef::Delegate => "Callable[..., Any]".to_string(),
        TypeRef::Unresolved { name } => format!("\"{name}\""),
    }
}

/// The element type of an array reference, used for `*args` parameters.
pub fn element_of(ty: &TypeRef) -> Option<&TypeRef> {
    match ty {
        TypeRef::Array { element } => Some(element.as_ref()),
        _ => None,
    }
}

pub fn strip_arity(name: &str) -> &str {
    match ARITY_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

fn arg(args: &[TypeRef], index: usize) -> String {
    args.get(index).map(map).unwrap_or_else(|| "Any".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(primitive: Primitive) -> TypeRef {
        TypeRef::primitive(primitive)
    }

    #[test]
    fn primitive_table() {
        let table = [
            (Primitive::Void, "None"),
            (Primitive::Bool, "bool"),
            (Primitive::Byte, "int"),
            (Primitive::Sbyte, "int"),
            (Primitive::Int16, "int"),
            (Primitive::Uint16, "int"),
            (Primitive::Int32, "int"),
            (Primitive::Uint32, "int"),
            (Primitive::Int64, "int"),
            (Primitive::Uint64, "int"),
            (Primitive::Single, "float"),
            (Primitive::Double, "float"),
            (Primitive::Decimal, "float"),
            (Primitive::String, "str"),
            (Primitive::Char, "str"),
            (Primitive::Object, "Any"),
            (Primitive::DateTime, "datetime"),
        ];
        for (primitive, expected) in table {
            assert_eq!(map(&p(primitive)), expected, "{primitive:?}");
        }
    }

    #[test]
    fn wrappers_and_containers() {
        assert_eq!(map(&TypeRef::nullable(p(Primitive::String))), "Optional[str]");
        assert_eq!(map(&TypeRef::array(p(Primitive::Int32))), "List[int]");
        assert_eq!(
            map(&TypeRef::container(Container::Dict, vec![p(Primitive::String), p(Primitive::Int32)])),
            "Dict[str, int]"
        );
        assert_eq!(map(&TypeRef::container(Container::Set, vec![p(Primitive::Double)])), "Set[float]");
        assert_eq!(map(&TypeRef::container(Container::Sequence, vec![p(Primitive::Char)])), "List[str]");
        assert_eq!(map(&TypeRef::container(Container::List, vec![])), "List[Any]");
    }

    #[test]
    fn nested_references() {
        let ty = TypeRef::container(
            Container::Dict,
            vec![
                p(Primitive::String),
                TypeRef::array(TypeRef::nullable(p(Primitive::Int64))),
            ],
        );
        assert_eq!(map(&ty), "Dict[str, List[Optional[int]]]");
    }

    #[test]
    fn user_types() {
        let ty = TypeRef::generic("Pair`2", vec![p(Primitive::Int32), TypeRef::unresolved("Node")]);
        assert_eq!(map(&ty), "Pair[int, \"Node\"]");
        assert_eq!(map(&TypeRef::named("Color")), "Color");
        assert_eq!(map(&TypeRef::unresolved("Transform")), "\"Transform\"");
        assert_eq!(map(&TypeRef::Delegate), "Callable[..., Any]");
    }

    #[test]
    fn arity_suffix() {
        assert_eq!(strip_arity("Dictionary`2"), "Dictionary");
        assert_eq!(strip_arity("Plain"), "Plain");
    }
}
