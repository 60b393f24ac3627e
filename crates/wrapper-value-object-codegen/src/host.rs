//! The capabilities the core needs from whatever hosts it.

use syn::Type;

use crate::registry::TypeRegistry;
use crate::types::{MemberDescriptor, Primitive, TypeKind, TypeRef, TypeTraits};

/// Type resolution and member introspection supplied by a host.
pub trait DeclarationHost {
    /// Resolve a field type written in the attribute.
    fn resolve_type(&self, ty: &Type) -> TypeRef;

    /// Members the user already declared for `type_name`.
    fn declared_members(&self, type_name: &str) -> Vec<MemberDescriptor>;
}

/// Resolves types by spelling alone, using a [`TypeRegistry`].
///
/// This is what the attribute macro can do: it sees one item and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct RegistryHost<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> RegistryHost<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }
}

impl DeclarationHost for RegistryHost<'_> {
    fn resolve_type(&self, ty: &Type) -> TypeRef {
        let kind = path_of(ty)
            .and_then(|path| resolve_path(self.registry, &path))
            .unwrap_or(TypeKind::Named(TypeTraits::ASSUMED));
        TypeRef::new(ty.clone(), kind)
    }

    fn declared_members(&self, _type_name: &str) -> Vec<MemberDescriptor> {
        Vec::new()
    }
}

/// The `::`-joined path of a plain path type, without a leading `::`.
pub(crate) fn path_of(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segments = &type_path.path.segments;
            if segments.iter().any(|s| !s.arguments.is_none()) {
                return None;
            }
            Some(
                segments
                    .iter()
                    .map(|s| s.ident.to_string())
                    .collect::<Vec<_>>()
                    .join("::"),
            )
        }
        Type::Paren(inner) => path_of(&inner.elem),
        Type::Group(inner) => path_of(&inner.elem),
        _ => None,
    }
}

/// Primitives first, then registry entries, then the unqualified last segment.
pub(crate) fn resolve_path(registry: &TypeRegistry, path: &str) -> Option<TypeKind> {
    if let Some(primitive) = Primitive::from_ident(path) {
        return Some(TypeKind::Primitive(primitive));
    }
    if let Some(kind) = registry.get(path) {
        return Some(kind.clone());
    }
    let last = path.rsplit("::").next()?;
    registry.get_by_name(last).cloned()
}
