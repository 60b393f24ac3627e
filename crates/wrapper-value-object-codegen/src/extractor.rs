//! Source file parser that finds structs annotated with `#[wrapper_value_object]`.
//!
//! Besides the declarations themselves, the extractor records what the user
//! already wrote for each type: `Display`/`Debug` impls and an inherent
//! `validate` associated function. Members are keyed by the module they are
//! written in, so an impl for an unrelated type of the same name elsewhere
//! does not affect a wrapper. The generator consults these when deciding
//! which members to emit.
//!
//! ## Use-item analysis
//!
//! Every module scope (the file and each inline `mod`) gets its own import map:
//!
//! - `use rust_decimal::Decimal` maps `"Decimal"` to `"rust_decimal::Decimal"`
//! - `use uuid::Uuid as Guid` maps `"Guid"` to `"uuid::Uuid"`
//! - `use wrapper_value_object_derive::wrapper_value_object as value_object` makes
//!   `#[value_object]` a recognized marker

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use syn::spanned::Spanned;
use syn::{
    Attribute, FnArg, GenericArgument, ImplItem, Item, ItemImpl, ItemStruct, Meta, PathArguments,
    ReturnType, Stmt, Type, TypePath, UseTree,
};

use crate::diagnostics::SourceLocation;
use crate::error::{MalformedSpecError, MalformedSpecKind};
use crate::parser::{self, AttributeArg};
use crate::types::{MemberDescriptor, TargetTypeDescriptor, ValidationHook, type_to_string};

/// Name of the attribute macro.
pub const MARKER: &str = "wrapper_value_object";

/// Per-module context built from `use` items.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceContext {
    /// Inline `mod` names from the file root down to this scope.
    pub module: Vec<String>,
    /// Maps local name -> fully-qualified path. Glob imports are not tracked.
    pub imports: HashMap<String, String>,
}

impl SourceContext {
    fn from_items(items: &[Item], module: Vec<String>) -> Self {
        let mut imports = HashMap::new();
        for item in items {
            match item {
                Item::Use(item_use) => collect_imports(&item_use.tree, &[], &mut imports),
                // `type Amount = rust_decimal::Decimal;` maps "Amount" to the full path
                Item::Type(item_type) => {
                    if let Type::Path(TypePath { path, .. }) = &*item_type.ty
                        && path.segments.len() > 1
                    {
                        let full_path = path
                            .segments
                            .iter()
                            .map(|s| s.ident.to_string())
                            .collect::<Vec<_>>()
                            .join("::");
                        imports.insert(item_type.ident.to_string(), full_path);
                    }
                }
                _ => {}
            }
        }
        Self { module, imports }
    }

    /// Expand the first segment of `path` through the import map.
    pub fn resolve_path(&self, path: &str) -> String {
        let (first, rest) = match path.split_once("::") {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        match (self.imports.get(first), rest) {
            (Some(full), Some(rest)) => format!("{full}::{rest}"),
            (Some(full), None) => full.clone(),
            (None, _) => path.to_string(),
        }
    }
}

/// Recursively flatten a `UseTree` into import entries.
fn collect_imports(tree: &UseTree, prefix: &[String], imports: &mut HashMap<String, String>) {
    match tree {
        UseTree::Path(p) => {
            let mut new_prefix = prefix.to_vec();
            new_prefix.push(p.ident.to_string());
            collect_imports(&p.tree, &new_prefix, imports);
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            let full_path = make_full_path(prefix, &name);
            imports.insert(name, full_path);
        }
        UseTree::Rename(r) => {
            let full_path = make_full_path(prefix, &r.ident.to_string());
            imports.insert(r.rename.to_string(), full_path);
        }
        UseTree::Glob(_) => {}
        UseTree::Group(g) => {
            for item in &g.items {
                collect_imports(item, prefix, imports);
            }
        }
    }
}

fn make_full_path(prefix: &[String], name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", prefix.join("::"), name)
    }
}

/// An annotated struct as found in source, before type resolution.
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub target: TargetTypeDescriptor,
    pub args: Result<Vec<AttributeArg>, MalformedSpecError>,
    pub context: Rc<SourceContext>,
}

/// A member the user wrote for `type_name` in the inline module `module`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserMember {
    pub module: Vec<String>,
    pub type_name: String,
    pub member: MemberDescriptor,
}

/// Everything extracted from one source file.
#[derive(Debug, Default)]
pub(crate) struct ExtractedSource {
    pub declarations: Vec<Declaration>,
    pub members: Vec<UserMember>,
}

/// Walk a parsed file. `path` is only used for diagnostic locations.
pub(crate) fn extract_file(file: &syn::File, path: Option<&Path>) -> ExtractedSource {
    let mut walker = Walker {
        path: path.map(Path::to_path_buf),
        out: ExtractedSource::default(),
    };
    let context = Rc::new(SourceContext::from_items(&file.items, Vec::new()));
    walker.items(&file.items, &context, false);
    walker.out
}

struct Walker {
    path: Option<PathBuf>,
    out: ExtractedSource,
}

impl Walker {
    fn items(&mut self, items: &[Item], context: &Rc<SourceContext>, nested: bool) {
        for item in items {
            self.item(item, context, nested);
        }
    }

    fn item(&mut self, item: &Item, context: &Rc<SourceContext>, nested: bool) {
        match item {
            Item::Struct(item_struct) => self.structure(item_struct, context, nested),
            Item::Impl(item_impl) => {
                self.implementation(item_impl, context);
                for impl_item in &item_impl.items {
                    if let ImplItem::Fn(method) = impl_item {
                        self.body(&method.block.stmts, context);
                    }
                }
            }
            Item::Fn(item_fn) => self.body(&item_fn.block.stmts, context),
            Item::Mod(item_mod) => {
                if let Some((_, items)) = &item_mod.content {
                    let mut module = context.module.clone();
                    module.push(item_mod.ident.to_string());
                    let inner = Rc::new(SourceContext::from_items(items, module));
                    self.items(items, &inner, nested);
                }
            }
            _ => {}
        }
    }

    /// Items declared in a function body are nested.
    fn body(&mut self, stmts: &[Stmt], context: &Rc<SourceContext>) {
        for stmt in stmts {
            if let Stmt::Item(item) = stmt {
                self.item(item, context, true);
            }
        }
    }

    fn structure(&mut self, item: &ItemStruct, context: &Rc<SourceContext>, nested: bool) {
        let Some(attr) = item.attrs.iter().find(|attr| is_marker(attr, context)) else {
            return;
        };
        let location = SourceLocation::from_span(self.path.as_deref(), item.ident.span());
        let target = TargetTypeDescriptor::from_item_struct(item, nested, location);
        tracing::debug!(type_name = %target.name, nested, "found wrapper value object declaration");

        let args = match &attr.meta {
            Meta::Path(_) => Ok(Vec::new()),
            Meta::List(list) => {
                parser::parse_args(list.tokens.clone()).map_err(MalformedSpecError::from)
            }
            Meta::NameValue(nv) => Err(MalformedSpecError::new(
                MalformedSpecKind::Syntax {
                    message: format!("expected `#[{MARKER}(..)]`"),
                },
                nv.value.span(),
            )),
        };

        self.out.declarations.push(Declaration {
            target,
            args,
            context: Rc::clone(context),
        });
    }

    fn implementation(&mut self, item: &ItemImpl, context: &SourceContext) {
        let Some(type_name) = self_type_name(&item.self_ty) else {
            return;
        };
        let mut record = |member| {
            self.out.members.push(UserMember {
                module: context.module.clone(),
                type_name: type_name.clone(),
                member,
            });
        };
        match &item.trait_ {
            Some((_, path, _)) => {
                match path.segments.last().map(|s| s.ident.to_string()).as_deref() {
                    Some("Display") => record(MemberDescriptor::Display),
                    Some("Debug") => record(MemberDescriptor::Debug),
                    _ => {}
                }
            }
            None => {
                for impl_item in &item.items {
                    if let ImplItem::Fn(method) = impl_item
                        && method.sig.ident == "validate"
                        && !matches!(method.sig.inputs.first(), Some(FnArg::Receiver(_)))
                        && let Some(hook) = validation_hook(&method.sig.output)
                    {
                        record(MemberDescriptor::Validate(hook));
                    }
                }
            }
        }
    }
}

/// Recognize the marker through imports, as a qualified path, or by its own name.
fn is_marker(attr: &Attribute, context: &SourceContext) -> bool {
    let path = attr.path();
    let suffix = format!("::{MARKER}");
    if path.segments.len() == 1 {
        let ident = path.segments[0].ident.to_string();
        match context.imports.get(&ident) {
            Some(full) => full == MARKER || full.ends_with(&suffix),
            None => ident == MARKER,
        }
    } else {
        path.segments.last().is_some_and(|s| s.ident == MARKER)
    }
}

/// Only a bare name refers to a type of the impl's own module.
fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(TypePath { qself: None, path }) if path.segments.len() == 1 => {
            Some(path.segments[0].ident.to_string())
        }
        _ => None,
    }
}

/// `()` means a panicking hook, `Result<(), E>` a fallible one; anything else is not a hook.
fn validation_hook(output: &ReturnType) -> Option<ValidationHook> {
    let ty = match output {
        ReturnType::Default => return Some(ValidationHook { error_type: None }),
        ReturnType::Type(_, ty) => ty,
    };
    match &**ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => Some(ValidationHook { error_type: None }),
        Type::Path(TypePath { qself: None, path }) => {
            let segment = path.segments.last()?;
            if segment.ident != "Result" {
                return None;
            }
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return None;
            };
            let mut types = args.args.iter().filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            });
            let ok = types.next()?;
            let err = types.next()?;
            matches!(ok, Type::Tuple(t) if t.elems.is_empty()).then(|| ValidationHook {
                error_type: Some(type_to_string(err)),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclarationKind;

    fn extract(source: &str) -> ExtractedSource {
        extract_file(&syn::parse_file(source).unwrap(), None)
    }

    fn names(extracted: &ExtractedSource) -> Vec<String> {
        extracted
            .declarations
            .iter()
            .map(|d| d.target.name.clone())
            .collect()
    }

    #[test]
    fn test_finds_annotated_structs() {
        let extracted = extract(
            r#"
            use wrapper_value_object_derive::wrapper_value_object;

            #[wrapper_value_object(i32)]
            #[derive(Clone, Copy)]
            pub struct LeagueId;

            #[derive(Clone, Copy)]
            pub struct Plain;

            #[wrapper_value_object]
            struct ProductId;
        "#,
        );
        assert_eq!(names(&extracted), ["LeagueId", "ProductId"]);
        let league = &extracted.declarations[0];
        assert!(league.target.is_read_only);
        assert!(league.target.is_partial);
        assert_eq!(league.target.kind, DeclarationKind::UnitStruct);
        assert_eq!(league.args.as_ref().unwrap().len(), 1);
        assert!(extracted.declarations[1].args.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_qualified_and_aliased_marker() {
        let extracted = extract(
            r#"
            use wrapper_value_object_derive::wrapper_value_object as value_object;

            #[wrapper_value_object_derive::wrapper_value_object(u8)]
            struct Qualified;

            #[value_object(u8)]
            struct Aliased;
        "#,
        );
        assert_eq!(names(&extracted), ["Qualified", "Aliased"]);
    }

    #[test]
    fn test_marker_shadowed_by_other_import() {
        let extracted = extract(
            r#"
            use other_crate::something as wrapper_value_object;

            #[wrapper_value_object(u8)]
            struct NotOurs;
        "#,
        );
        assert!(extracted.declarations.is_empty());
    }

    #[test]
    fn test_inline_modules_have_own_imports() {
        let extracted = extract(
            r#"
            mod money {
                use rust_decimal::Decimal;

                #[wrapper_value_object(Decimal)]
                pub struct Money;
            }
        "#,
        );
        let money = &extracted.declarations[0];
        assert_eq!(money.target.name, "Money");
        assert!(!money.target.is_nested);
        assert_eq!(money.context.module, ["money"]);
        assert_eq!(money.context.resolve_path("Decimal"), "rust_decimal::Decimal");
    }

    #[test]
    fn test_declarations_in_functions_are_nested() {
        let extracted = extract(
            r#"
            fn build() {
                #[wrapper_value_object(i32)]
                struct Local;
            }

            impl Holder {
                fn method(&self) {
                    #[wrapper_value_object(i32)]
                    struct InMethod;
                }
            }
        "#,
        );
        assert_eq!(names(&extracted), ["Local", "InMethod"]);
        assert!(extracted.declarations.iter().all(|d| d.target.is_nested));
    }

    #[test]
    fn test_collects_user_members() {
        let extracted = extract(
            r#"
            impl std::fmt::Display for Label {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
            }

            impl fmt::Debug for Label {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Ok(()) }
            }

            impl PositiveAmount {
                fn validate(value: &i64) -> Result<(), AmountError> { Ok(()) }
            }

            impl Percent {
                fn validate(value: &u8) {
                    assert!(*value <= 100);
                }
            }

            impl NotAHook {
                fn validate(&self) -> bool { true }
            }
        "#,
        );
        let members: Vec<_> = extracted
            .members
            .into_iter()
            .map(|m| (m.type_name, m.member))
            .collect();
        assert_eq!(
            members,
            vec![
                ("Label".to_string(), MemberDescriptor::Display),
                ("Label".to_string(), MemberDescriptor::Debug),
                (
                    "PositiveAmount".to_string(),
                    MemberDescriptor::Validate(ValidationHook {
                        error_type: Some("AmountError".to_string())
                    })
                ),
                (
                    "Percent".to_string(),
                    MemberDescriptor::Validate(ValidationHook { error_type: None })
                ),
            ]
        );
    }

    #[test]
    fn test_user_members_record_their_module() {
        let extracted = extract(
            r#"
            impl Display for Score {
                fn fmt(&self, f: &mut Formatter<'_>) -> Result { Ok(()) }
            }

            mod stats {
                mod inner {
                    impl Score {
                        fn validate(value: &i32) {}
                    }
                }
            }

            impl Display for super::Score {
                fn fmt(&self, f: &mut Formatter<'_>) -> Result { Ok(()) }
            }
        "#,
        );
        assert_eq!(extracted.members.len(), 2);
        assert!(extracted.members[0].module.is_empty());
        assert_eq!(extracted.members[1].module, ["stats", "inner"]);
        assert_eq!(extracted.members[1].type_name, "Score");
    }

    #[test]
    fn test_syntax_errors_are_kept_per_declaration() {
        let extracted = extract(
            r#"
            #[wrapper_value_object(i32 i32)]
            struct Broken;

            #[wrapper_value_object(i32)]
            struct Fine;
        "#,
        );
        assert!(extracted.declarations[0].args.is_err());
        assert!(extracted.declarations[1].args.is_ok());
    }

    #[test]
    fn test_resolve_path_through_imports() {
        let context = SourceContext::from_items(
            &syn::parse_file("use uuid::Uuid as Guid; use std::time; type Amount = rust_decimal::Decimal;")
                .unwrap()
                .items,
            Vec::new(),
        );
        assert_eq!(context.resolve_path("Guid"), "uuid::Uuid");
        assert_eq!(context.resolve_path("time::Duration"), "std::time::Duration");
        assert_eq!(context.resolve_path("Amount"), "rust_decimal::Decimal");
        assert_eq!(context.resolve_path("Local"), "Local");
    }
}
