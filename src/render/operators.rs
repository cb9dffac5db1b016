use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Name the Python initializer slot goes by.
pub const INITIALIZER: &str = "__init__";

/// Metadata operator names → Python dunder methods.
///
/// Both conversion operators land on `__init__`, so an explicit conversion is
/// indistinguishable from a constructor overload in the emitted stub.
static OPERATORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("op_Addition", "__add__"),
        ("op_Subtraction", "__sub__"),
        ("op_Multiply", "__mul__"),
        ("op_Division", "__truediv__"),
        ("op_Modulus", "__mod__"),
        ("op_Equality", "__eq__"),
        ("op_Inequality", "__ne__"),
        ("op_LessThan", "__lt__"),
        ("op_GreaterThan", "__gt__"),
        ("op_LessThanOrEqual", "__le__"),
        ("op_GreaterThanOrEqual", "__ge__"),
        ("op_UnaryNegation", "__neg__"),
        ("op_UnaryPlus", "__pos__"),
        ("op_LogicalNot", "__invert__"),
        ("op_BitwiseAnd", "__and__"),
        ("op_BitwiseOr", "__or__"),
        ("op_ExclusiveOr", "__xor__"),
        ("op_LeftShift", "__lshift__"),
        ("op_RightShift", "__rshift__"),
        ("op_Implicit", INITIALIZER),
        ("op_Explicit", INITIALIZER),
    ])
});

pub fn target_name(symbol: &str) -> Option<&'static str> {
    OPERATORS.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_comparison() {
        assert_eq!(target_name("op_Addition"), Some("__add__"));
        assert_eq!(target_name("op_Division"), Some("__truediv__"));
        assert_eq!(target_name("op_GreaterThanOrEqual"), Some("__ge__"));
        assert_eq!(target_name("op_LogicalNot"), Some("__invert__"));
    }

    #[test]
    fn conversions_share_the_initializer() {
        assert_eq!(target_name("op_Implicit"), Some(INITIALIZER));
        assert_eq!(target_name("op_Explicit"), Some(INITIALIZER));
    }

    #[test]
    fn unknown_symbols() {
        assert_eq!(target_name("op_Increment"), None);
        assert_eq!(target_name("op_True"), None);
    }
}
