//! Type definitions shared by the parser, the policy resolver and the emitter.

use std::fmt;

use heck::ToSnakeCase;
use quote::ToTokens;
use syn::{Attribute, Fields, ItemStruct, Type, TypePath};

use crate::diagnostics::SourceLocation;

/// Field name used when the attribute does not name a field.
pub const DEFAULT_FIELD_NAME: &str = "Value";

/// Types whose name ends with this suffix default to no comparison or math operators.
pub const ID_SUFFIX: &str = "Id";

/// The largest number of fields a single wrapper may combine.
pub const MAX_FIELDS: usize = 4;

/// Inherent member names emitted by the generator. Field accessors may not reuse them.
pub const RESERVED_MEMBER_NAMES: &[&str] = &[
    "new",
    "into_inner",
    "compare_to",
    "generate",
    "try_format",
    "validate",
];

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    I128,
    U128,
    Isize,
    Usize,
    F32,
    F64,
    Bool,
    Char,
}

impl Primitive {
    /// Look up a primitive by its Rust spelling.
    pub fn from_ident(ident: &str) -> Option<Self> {
        let primitive = match ident {
            "i8" => Self::I8,
            "u8" => Self::U8,
            "i16" => Self::I16,
            "u16" => Self::U16,
            "i32" => Self::I32,
            "u32" => Self::U32,
            "i64" => Self::I64,
            "u64" => Self::U64,
            "i128" => Self::I128,
            "u128" => Self::U128,
            "isize" => Self::Isize,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "char" => Self::Char,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::I128 => "i128",
            Self::U128 => "u128",
            Self::Isize => "isize",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
        }
    }

    pub fn is_integral(self) -> bool {
        !matches!(self, Self::F32 | Self::F64 | Self::Bool | Self::Char)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// 8-bit integers, whose arithmetic widens instead of re-wrapping.
    pub fn is_byte_width(self) -> bool {
        matches!(self, Self::I8 | Self::U8)
    }

    pub fn traits(self) -> TypeTraits {
        if self.is_float() {
            TypeTraits::FLOAT
        } else {
            TypeTraits::VALUE
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The standard traits a storage type is known to implement.
///
/// The emitter only generates `Eq`, `Hash`, `Ord` and friends when every
/// storage slot can back them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTraits {
    pub copy: bool,
    pub eq: bool,
    pub hash: bool,
    pub ord: bool,
    pub partial_ord: bool,
    pub display: bool,
}

impl TypeTraits {
    /// Integers, `bool`, `char`, `Uuid`, `Decimal`.
    pub const VALUE: Self = Self {
        copy: true,
        eq: true,
        hash: true,
        ord: true,
        partial_ord: true,
        display: true,
    };

    /// `f32` and `f64`: only partial equality and ordering.
    pub const FLOAT: Self = Self {
        copy: true,
        eq: false,
        hash: false,
        ord: false,
        partial_ord: true,
        display: true,
    };

    /// Owned, totally ordered values such as `String`.
    pub const OWNED: Self = Self {
        copy: false,
        ..Self::VALUE
    };

    /// What an unresolved named type is assumed to implement.
    pub const ASSUMED: Self = Self {
        copy: false,
        eq: true,
        hash: true,
        ord: false,
        partial_ord: false,
        display: true,
    };

    /// Traits shared by both operands, e.g. for a tuple of two slots.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            copy: self.copy && other.copy,
            eq: self.eq && other.eq,
            hash: self.hash && other.hash,
            ord: self.ord && other.ord,
            partial_ord: self.partial_ord && other.partial_ord,
            display: self.display && other.display,
        }
    }
}

/// What a declared field type resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(Primitive),
    String,
    /// The identifier-like default type, `uuid::Uuid`.
    Uuid,
    /// `rust_decimal::Decimal`.
    Decimal,
    /// Any other type, with the traits the host knows about.
    Named(TypeTraits),
}

impl TypeKind {
    pub fn traits(&self) -> TypeTraits {
        match self {
            Self::Primitive(p) => p.traits(),
            Self::String => TypeTraits::OWNED,
            Self::Uuid | Self::Decimal => TypeTraits::VALUE,
            Self::Named(traits) => *traits,
        }
    }
}

/// A field type as written at the attribute site, plus its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    ty: Type,
    kind: TypeKind,
}

impl TypeRef {
    pub fn new(ty: Type, kind: TypeKind) -> Self {
        Self { ty, kind }
    }

    /// The type used when the attribute has no field arguments.
    pub fn default_id() -> Self {
        Self::new(syn::parse_quote!(::uuid::Uuid), TypeKind::Uuid)
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn traits(&self) -> TypeTraits {
        self.kind.traits()
    }

    /// Render the type the way it should appear in generated source.
    pub fn rust_type(&self) -> String {
        type_to_string(&self.ty)
    }
}

/// Render a `syn::Type` as compact source text.
///
/// Plain paths are joined with `::`; anything else falls back to the token
/// stream rendering, which is valid but loosely spaced.
pub fn type_to_string(ty: &Type) -> String {
    if let Type::Path(TypePath { qself: None, path }) = ty
        && path.segments.iter().all(|s| s.arguments.is_none())
    {
        let joined = path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::");
        return if path.leading_colon.is_some() {
            format!("::{joined}")
        } else {
            joined
        };
    }
    ty.to_token_stream().to_string()
}

/// Coarse classification of a single field's type, driving operator policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseTypeCategory {
    NumericIntegral,
    NumericFloatingOrDecimal,
    /// `i8`/`u8`: a refinement of `NumericIntegral` whose arithmetic widens.
    ByteWidth,
    IdentifierLike,
    Other,
}

impl BaseTypeCategory {
    pub fn classify(ty: &TypeRef) -> Self {
        match ty.kind() {
            TypeKind::Primitive(p) if p.is_byte_width() => Self::ByteWidth,
            TypeKind::Primitive(p) if p.is_integral() => Self::NumericIntegral,
            TypeKind::Primitive(p) if p.is_float() => Self::NumericFloatingOrDecimal,
            TypeKind::Decimal => Self::NumericFloatingOrDecimal,
            TypeKind::Uuid => Self::IdentifierLike,
            _ => Self::Other,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::NumericIntegral | Self::NumericFloatingOrDecimal | Self::ByteWidth
        )
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Self::NumericIntegral | Self::ByteWidth)
    }
}

/// One named, typed constituent of a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: String,
    declared_type: TypeRef,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }

    /// The name as written in the attribute, e.g. `"HomeGoals"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    /// The snake_case identifier used for the accessor and constructor parameter.
    pub fn accessor_name(&self) -> String {
        self.name.to_snake_case()
    }
}

/// Unset, or an explicit yes/no.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriBool {
    #[default]
    Unset,
    True,
    False,
}

impl TriBool {
    /// Resolve to a boolean, using `default` when unset.
    pub fn resolve(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::True => true,
            Self::False => false,
        }
    }
}

impl From<bool> for TriBool {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GenerationOptions {
    pub generate_implicit_conversion_to_primitive: bool,
    pub generate_comparison_operators: TriBool,
    pub generate_math_operators: TriBool,
}

/// The syntactic shape of the annotated struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `struct X;`
    UnitStruct,
    /// `struct X { .. }`
    BracedStruct,
    /// `struct X(..);`
    TupleStruct,
}

/// A user-supplied `validate` associated function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationHook {
    /// `Some(E)` when the hook returns `Result<(), E>`; `None` when it returns
    /// nothing and rejects values by panicking.
    pub error_type: Option<String>,
}

/// Members the user already declared for a type, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberDescriptor {
    /// `impl Display for X`
    Display,
    /// `impl Debug for X` or `#[derive(Debug)]`
    Debug,
    /// `fn validate(..)` in an inherent impl.
    Validate(ValidationHook),
}

/// Read-only snapshot of an annotated declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTypeDescriptor {
    pub name: String,
    pub kind: DeclarationKind,
    /// Derives `Copy`.
    pub is_read_only: bool,
    pub has_user_defined_display: bool,
    pub has_user_defined_debug: bool,
    pub validation_hook: Option<ValidationHook>,
    /// Declares no fields, leaving storage to the generator.
    pub is_partial: bool,
    /// Declared inside a function or method body.
    pub is_nested: bool,
    pub is_generic: bool,
    pub location: SourceLocation,
}

impl TargetTypeDescriptor {
    /// A partial, non-nested unit struct with no user members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::UnitStruct,
            is_read_only: false,
            has_user_defined_display: false,
            has_user_defined_debug: false,
            validation_hook: None,
            is_partial: true,
            is_nested: false,
            is_generic: false,
            location: SourceLocation::default(),
        }
    }

    /// Describe a struct item as written in source.
    pub fn from_item_struct(item: &ItemStruct, is_nested: bool, location: SourceLocation) -> Self {
        let derives = derived_traits(&item.attrs);
        let kind = match &item.fields {
            Fields::Unit => DeclarationKind::UnitStruct,
            Fields::Named(_) => DeclarationKind::BracedStruct,
            Fields::Unnamed(_) => DeclarationKind::TupleStruct,
        };
        Self {
            name: item.ident.to_string(),
            kind,
            is_read_only: derives.iter().any(|d| d == "Copy"),
            has_user_defined_display: false,
            has_user_defined_debug: derives.iter().any(|d| d == "Debug"),
            validation_hook: None,
            is_partial: item.fields.is_empty(),
            is_nested,
            is_generic: !item.generics.params.is_empty(),
            location,
        }
    }

    pub fn read_only(mut self, is_read_only: bool) -> Self {
        self.is_read_only = is_read_only;
        self
    }

    /// Fold members the user already declared into the descriptor.
    pub fn with_members(mut self, members: &[MemberDescriptor]) -> Self {
        for member in members {
            match member {
                MemberDescriptor::Display => self.has_user_defined_display = true,
                MemberDescriptor::Debug => self.has_user_defined_debug = true,
                MemberDescriptor::Validate(hook) => self.validation_hook = Some(hook.clone()),
            }
        }
        self
    }
}

/// Last path segment of every trait in `#[derive(..)]` attributes.
pub(crate) fn derived_traits(attrs: &[Attribute]) -> Vec<String> {
    let mut derived = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("derive")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
        {
            derived.extend(
                nested
                    .iter()
                    .filter_map(|p| p.segments.last())
                    .map(|s| s.ident.to_string()),
            );
        }
    }
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_ref(src: &str, kind: TypeKind) -> TypeRef {
        TypeRef::new(syn::parse_str(src).unwrap(), kind)
    }

    #[test]
    fn test_classify_categories() {
        let cases = [
            (TypeKind::Primitive(Primitive::I32), BaseTypeCategory::NumericIntegral),
            (TypeKind::Primitive(Primitive::U8), BaseTypeCategory::ByteWidth),
            (TypeKind::Primitive(Primitive::I8), BaseTypeCategory::ByteWidth),
            (TypeKind::Primitive(Primitive::F64), BaseTypeCategory::NumericFloatingOrDecimal),
            (TypeKind::Decimal, BaseTypeCategory::NumericFloatingOrDecimal),
            (TypeKind::Uuid, BaseTypeCategory::IdentifierLike),
            (TypeKind::Primitive(Primitive::Bool), BaseTypeCategory::Other),
            (TypeKind::String, BaseTypeCategory::Other),
            (TypeKind::Named(TypeTraits::ASSUMED), BaseTypeCategory::Other),
        ];
        for (kind, expected) in cases {
            assert_eq!(BaseTypeCategory::classify(&type_ref("T", kind)), expected);
        }
    }

    #[test]
    fn test_float_traits_are_partial() {
        let traits = Primitive::F32.traits();
        assert!(traits.partial_ord);
        assert!(!traits.eq);
        assert!(!traits.hash);
        assert!(!traits.ord);
    }

    #[test]
    fn test_intersect_traits() {
        let mixed = TypeTraits::VALUE.intersect(TypeTraits::OWNED);
        assert!(!mixed.copy);
        assert!(mixed.ord);
        let with_float = TypeTraits::VALUE.intersect(TypeTraits::FLOAT);
        assert!(!with_float.eq);
        assert!(with_float.partial_ord);
    }

    #[test]
    fn test_type_to_string() {
        assert_eq!(TypeRef::default_id().rust_type(), "::uuid::Uuid");
        assert_eq!(type_ref("u8", TypeKind::Named(TypeTraits::VALUE)).rust_type(), "u8");
        assert_eq!(
            type_ref("rust_decimal::Decimal", TypeKind::Decimal).rust_type(),
            "rust_decimal::Decimal"
        );
        assert!(
            type_ref("Vec<u8>", TypeKind::Named(TypeTraits::OWNED))
                .rust_type()
                .contains("Vec")
        );
    }

    #[test]
    fn test_accessor_name_is_snake_case() {
        let field = FieldSpec::new("HomeGoals", type_ref("u8", TypeKind::Primitive(Primitive::U8)));
        assert_eq!(field.accessor_name(), "home_goals");
        let field = FieldSpec::new(DEFAULT_FIELD_NAME, TypeRef::default_id());
        assert_eq!(field.accessor_name(), "value");
    }

    #[test]
    fn test_tri_bool_resolve() {
        assert!(TriBool::Unset.resolve(true));
        assert!(!TriBool::Unset.resolve(false));
        assert!(TriBool::True.resolve(false));
        assert!(!TriBool::False.resolve(true));
    }

    #[test]
    fn test_descriptor_from_item_struct() {
        let item: ItemStruct = syn::parse_quote! {
            #[derive(Clone, Copy, Debug)]
            pub struct LeagueId;
        };
        let target = TargetTypeDescriptor::from_item_struct(&item, false, SourceLocation::default());
        assert_eq!(target.name, "LeagueId");
        assert_eq!(target.kind, DeclarationKind::UnitStruct);
        assert!(target.is_partial);
        assert!(target.is_read_only);
        assert!(target.has_user_defined_debug);
        assert!(!target.is_generic);

        let item: ItemStruct = syn::parse_quote! {
            struct Holder<T> { inner: T }
        };
        let target = TargetTypeDescriptor::from_item_struct(&item, true, SourceLocation::default());
        assert_eq!(target.kind, DeclarationKind::BracedStruct);
        assert!(!target.is_partial);
        assert!(target.is_generic);
        assert!(target.is_nested);
    }

    #[test]
    fn test_with_members() {
        let target = TargetTypeDescriptor::new("Percent").with_members(&[
            MemberDescriptor::Display,
            MemberDescriptor::Validate(ValidationHook {
                error_type: Some("RangeError".to_string()),
            }),
        ]);
        assert!(target.has_user_defined_display);
        assert!(!target.has_user_defined_debug);
        assert_eq!(
            target.validation_hook.unwrap().error_type.as_deref(),
            Some("RangeError")
        );
    }
}
