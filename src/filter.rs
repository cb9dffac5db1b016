//! Eligibility predicates for types and members.
//!
//! Each rule is one row of a static table so the rules can be listed, tested
//! and logged individually. A descriptor is accepted when no row matches.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Member, TypeDescriptor, Visibility};

type TypeRule = (&'static str, fn(&TypeDescriptor) -> bool);
type MemberRule = (&'static str, fn(&Member) -> bool);

/// Compiler-generated names: `<Foo>d__3`, `__StaticArrayInit...`.
static INTERNAL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<|__").unwrap());

/// Property accessors already rendered through their property.
static ACCESSOR_SHADOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(get|set)_").unwrap());

static TYPE_RULES: &[TypeRule] = &[
    ("special name", |t: &TypeDescriptor| t.special_name),
    ("not public", |t: &TypeDescriptor| t.visibility == Visibility::NonPublic),
    ("private nested type", |t: &TypeDescriptor| t.visibility == Visibility::NestedPrivate),
    ("open generic definition", |t: &TypeDescriptor| t.generic_definition),
    ("internal name", |t: &TypeDescriptor| INTERNAL_NAME.is_match(&t.name)),
    ("deprecated", |t: &TypeDescriptor| t.deprecated),
];

static MEMBER_RULES: &[MemberRule] = &[
    ("accessor shadow", |m: &Member| match m {
        Member::Method(x) => ACCESSOR_SHADOW.is_match(&x.name),
        _ => false,
    }),
    ("special-name method", |m: &Member| match m {
        Member::Method(x) => x.special_name && x.operator.is_none(),
        _ => false,
    }),
    ("open generic method", |m: &Member| match m {
        Member::Method(x) => x.generic_definition,
        _ => false,
    }),
    ("special-name field", |m: &Member| match m {
        Member::Field(x) => x.special_name,
        _ => false,
    }),
    ("constant field", |m: &Member| match m {
        Member::Field(x) => x.literal,
        _ => false,
    }),
    ("deprecated", |m: &Member| match m {
        Member::Constructor(x) => x.deprecated,
        Member::Property(x) => x.deprecated,
        Member::Field(x) => x.deprecated,
        Member::Method(x) => x.deprecated,
        Member::Nested(_) => false,
    }),
    ("rejected nested type", |m: &Member| match m {
        Member::Nested(x) => !accepts_type(x),
        _ => false,
    }),
];

/// The first rule rejecting `ty`, if any.
pub fn type_rejection(ty: &TypeDescriptor) -> Option<&'static str> {
    TYPE_RULES
        .iter()
        .find(|(_, rejects)| rejects(ty))
        .map(|(reason, _)| *reason)
}

/// The first rule rejecting `member`, if any.
pub fn member_rejection(member: &Member) -> Option<&'static str> {
    MEMBER_RULES
        .iter()
        .find(|(_, rejects)| rejects(member))
        .map(|(reason, _)| *reason)
}

pub fn accepts_type(ty: &TypeDescriptor) -> bool {
    type_rejection(ty).is_none()
}

pub fn accepts_member(member: &Member) -> bool {
    member_rejection(member).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constructor, Field, Method, Primitive, Property, TypeKind, TypeRef};

    fn class(name: &str) -> TypeDescriptor {
        TypeDescriptor::new("Game", name, TypeKind::Class)
    }

    #[test]
    fn plain_public_types_are_accepted() {
        assert!(accepts_type(&class("Sprite")));
        assert!(accepts_type(&TypeDescriptor::new("", "Color", TypeKind::Enum)));
    }

    #[test]
    fn type_rules() {
        let mut t = class("Hidden");
        t.visibility = Visibility::NonPublic;
        assert_eq!(type_rejection(&t), Some("not public"));

        let mut t = class("Inner");
        t.visibility = Visibility::NestedPrivate;
        assert_eq!(type_rejection(&t), Some("private nested type"));

        let mut t = class("List`1");
        t.generic_definition = true;
        assert_eq!(type_rejection(&t), Some("open generic definition"));

        assert_eq!(type_rejection(&class("<Run>d__4")), Some("internal name"));
        assert_eq!(type_rejection(&class("__StaticArrayInit")), Some("internal name"));

        let mut t = class("Old");
        t.deprecated = true;
        assert_eq!(type_rejection(&t), Some("deprecated"));

        let mut t = class("Spec");
        t.special_name = true;
        assert_eq!(type_rejection(&t), Some("special name"));
    }

    #[test]
    fn member_rules() {
        let int = TypeRef::primitive(Primitive::Int32);

        let getter = Method::new("get_Count", vec![], int.clone());
        assert_eq!(member_rejection(&getter.into()), Some("accessor shadow"));

        let mut generic = Method::new("Find", vec![], int.clone());
        generic.generic_definition = true;
        assert_eq!(member_rejection(&generic.into()), Some("open generic method"));

        let mut event_add = Method::new("add_Changed", vec![], TypeRef::void());
        event_add.special_name = true;
        assert_eq!(member_rejection(&event_add.into()), Some("special-name method"));

        let op = Method::operator("op_Addition", vec![], int.clone());
        assert!(accepts_member(&op.into()));

        let mut constant = Field::new("Max", int.clone());
        constant.literal = true;
        assert_eq!(member_rejection(&constant.into()), Some("constant field"));

        let mut backing = Field::new("<Count>k__BackingField", int.clone());
        backing.special_name = true;
        assert_eq!(member_rejection(&backing.into()), Some("special-name field"));

        let mut old = Property::new("Size", int.clone());
        old.deprecated = true;
        assert_eq!(member_rejection(&old.into()), Some("deprecated"));

        let mut old_ctor = Constructor::new(vec![]);
        old_ctor.deprecated = true;
        assert!(!accepts_member(&old_ctor.into()));

        let mut private_nested = class("Impl");
        private_nested.visibility = Visibility::NestedPrivate;
        assert_eq!(member_rejection(&private_nested.into()), Some("rejected nested type"));

        assert!(accepts_member(&Method::new("Update", vec![], TypeRef::void()).into()));
    }
}
