//! Read-only snapshot of a reflected type surface.
//!
//! Sources build these once per run (usually by deserializing a metadata
//! document) and the pipeline only ever borrows them.

use serde::{Deserialize, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub namespace: Option<String>,      // None or "" → the global namespace
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<String>,           // informational only
    #[serde(default)]
    pub generic_arity: u32,
    #[serde(default)]
    pub generic_definition: bool,       // open generic, e.g. List`1 itself
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub special_name: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub enum_members: Vec<EnumMember>,  // only meaningful for `TypeKind::Enum`
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub origin: String,                 // source id, filled by the source when empty
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    /// Anything the metadata producer could not classify (pointers, modules, ...).
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    NonPublic,
    NestedPrivate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Constructor(Constructor),
    Property(Property),
    Field(Field),
    Method(Method),
    Nested(Box<TypeDescriptor>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "yes")]
    pub readable: bool,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub has_public_setter: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub index_parameters: Vec<Parameter>,  // non-empty → indexer
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub special_name: bool,
    #[serde(default)]
    pub literal: bool,                     // compile-time constant
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub operator: Option<String>,          // e.g. "op_Addition"
    #[serde(default)]
    pub special_name: bool,
    #[serde(default)]
    pub generic_definition: bool,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,                       // for `InRef` this is the referenced element type
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Normal,
    InRef,
    OutRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Null,
    Bool(bool),
    /// Raw literal token of a primitive default, e.g. `0`, `1.5`, `-1`.
    Literal(String),
    /// Enum-typed or any other non-primitive default.
    NonPrimitive,
}

/// A reference to a type as it appears in a member signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive { primitive: Primitive },
    Nullable { inner: Box<TypeRef> },
    Array { element: Box<TypeRef> },
    Container { container: Container, args: Vec<TypeRef> },
    /// User type; zero `args` means a plain named type.
    Generic {
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    Delegate,
    Unresolved { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Void,
    Bool,
    Byte,
    Sbyte,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Single,
    Double,
    Decimal,
    String,
    Char,
    Object,
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    List,
    Dict,
    Set,
    Sequence,
}

fn yes() -> bool { true }

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: if namespace.is_empty() { None } else { Some(namespace) },
            name: name.into(),
            kind,
            base: None,
            generic_arity: 0,
            generic_definition: false,
            visibility: Visibility::Public,
            special_name: false,
            deprecated: false,
            enum_members: Vec::new(),
            members: Vec::new(),
            origin: String::new(),
        }
    }
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }
    pub fn with_enum_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.enum_members.push(EnumMember { name: name.into(), value });
        self
    }
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum)
    }
}

impl Constructor {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters, deprecated: false }
    }
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            readable: true,
            writable: false,
            has_public_setter: false,
            is_static: false,
            index_parameters: Vec::new(),
            deprecated: false,
        }
    }
    pub fn is_indexer(&self) -> bool {
        !self.index_parameters.is_empty()
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            special_name: false,
            literal: false,
            deprecated: false,
        }
    }
}

impl Method {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            is_static: false,
            operator: None,
            special_name: false,
            generic_definition: false,
            deprecated: false,
        }
    }
    /// Operator overloads carry the metadata's special name, e.g. `op_Addition`.
    pub fn operator(symbol: impl Into<String>, parameters: Vec<Parameter>, return_type: TypeRef) -> Self {
        let symbol = symbol.into();
        let base = Self::new(symbol.clone(), parameters, return_type);
        Self {
            special_name: true,
            is_static: true,
            operator: Some(symbol),
            ..base
        }
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
            direction: Direction::Normal,
            default: None,
        }
    }
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

impl TypeRef {
    pub fn primitive(primitive: Primitive) -> Self {
        TypeRef::Primitive { primitive }
    }
    pub fn void() -> Self {
        TypeRef::primitive(Primitive::Void)
    }
    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable { inner: Box::new(inner) }
    }
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array { element: Box::new(element) }
    }
    pub fn container(container: Container, args: Vec<TypeRef>) -> Self {
        TypeRef::Container { container, args }
    }
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic { name: name.into(), args }
    }
    /// A resolved user type with no type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::generic(name, Vec::new())
    }
    pub fn unresolved(name: impl Into<String>) -> Self {
        TypeRef::Unresolved { name: name.into() }
    }
}

impl Member {
    /// Display name for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Member::Constructor(_) => ".ctor",
            Member::Property(x) => &x.name,
            Member::Field(x) => &x.name,
            Member::Method(x) => &x.name,
            Member::Nested(x) => &x.name,
        }
    }
}

impl From<Constructor> for Member {
    fn from(x: Constructor) -> Self { Member::Constructor(x) }
}
impl From<Property> for Member {
    fn from(x: Property) -> Self { Member::Property(x) }
}
impl From<Field> for Member {
    fn from(x: Field) -> Self { Member::Field(x) }
}
impl From<Method> for Member {
    fn from(x: Method) -> Self { Member::Method(x) }
}
impl From<TypeDescriptor> for Member {
    fn from(x: TypeDescriptor) -> Self { Member::Nested(Box::new(x)) }
}
