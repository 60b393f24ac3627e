//! Type registry for mapping Rust type paths to what the generator knows about them.
//!
//! Primitives are recognized directly. Everything else is looked up here by its
//! fully-qualified path, and an unknown path resolves to
//! [`TypeTraits::ASSUMED`](crate::TypeTraits::ASSUMED).

use std::collections::BTreeMap;

use crate::types::{TypeKind, TypeTraits};

/// A registry of fully-qualified Rust type path -> [`TypeKind`] associations.
///
/// # Built-in mappings
///
/// The following types are registered by default (via [`TypeRegistry::with_builtins`]):
///
/// | Rust type | Kind |
/// |-----------|------|
/// | `uuid::Uuid` | identifier-like |
/// | `rust_decimal::Decimal` | decimal |
/// | `std::string::String` / `alloc::string::String` | string |
/// | `std::time::Duration` / `core::time::Duration` | ordered, no `Display` |
///
/// # Custom mappings
///
/// ```
/// use wrapper_value_object_codegen::{CodeGenerator, TypeKind, TypeTraits};
///
/// let mut generator = CodeGenerator::new();
/// generator.register_type(
///     "chrono::NaiveDate",
///     TypeKind::Named(TypeTraits { copy: true, ..TypeTraits::VALUE }),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    mappings: BTreeMap<String, TypeKind>,
}

impl TypeRegistry {
    /// Create an empty registry with no mappings.
    pub fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in mappings.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    pub fn register_builtins(&mut self) {
        self.register("uuid::Uuid", TypeKind::Uuid);
        self.register("rust_decimal::Decimal", TypeKind::Decimal);

        self.register("std::string::String", TypeKind::String);
        self.register("alloc::string::String", TypeKind::String);

        let duration = TypeKind::Named(TypeTraits {
            display: false,
            ..TypeTraits::VALUE
        });
        self.register("std::time::Duration", duration.clone());
        self.register("core::time::Duration", duration);
    }

    /// Register a mapping, replacing any previous one for the same path.
    pub fn register(&mut self, path: impl Into<String>, kind: TypeKind) {
        let path = path.into();
        let path = path.trim_start_matches("::").to_string();
        self.mappings.insert(path, kind);
    }

    pub fn get(&self, path: &str) -> Option<&TypeKind> {
        self.mappings.get(path.trim_start_matches("::"))
    }

    /// Look up by unqualified name, e.g. `Uuid`.
    ///
    /// The first match in path order wins.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeKind> {
        self.mappings
            .iter()
            .find(|(path, _)| path.rsplit("::").next() == Some(name))
            .map(|(_, kind)| kind)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn unregister(&mut self, path: &str) -> Option<TypeKind> {
        self.mappings.remove(path.trim_start_matches("::"))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
