//! Batch code generator for `#[wrapper_value_object]` declarations.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use syn::Type;
use walkdir::WalkDir;

use crate::diagnostics::{self, Diagnostic, DiagnosticCode, DiagnosticSink, SourceLocation};
use crate::error::CodegenError;
use crate::extractor::{self, Declaration, SourceContext};
use crate::host::{self, DeclarationHost};
use crate::members::{self, MemberIr};
use crate::parser::{self, AttributeArg};
use crate::policy;
use crate::registry::TypeRegistry;
use crate::render::{self, SHARED_ARTIFACT_NAME};
use crate::types::{
    FieldSpec, GenerationOptions, MemberDescriptor, Primitive, TargetTypeDescriptor, TypeKind,
    TypeRef, TypeTraits,
};

/// File name of the artifact generated for `type_name`.
pub fn artifact_file_name(type_name: &str) -> String {
    format!("{type_name}_implementation.rs")
}

/// Run one generation pass: resolve the policy and build the member set.
///
/// The pass is pure, so a host may memoize it by its inputs.
pub fn run_pass(
    fields: &[FieldSpec],
    options: &GenerationOptions,
    target: &TargetTypeDescriptor,
) -> MemberIr {
    let policy = policy::resolve(fields, options, target);
    members::emit(fields, target, &policy)
}

/// A named generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

/// Members the user wrote: source index, inline module path, type name.
type MemberKey = (usize, Vec<String>, String);

#[derive(Debug)]
enum Pending {
    /// `source` is the index of the file or string the declaration came from.
    Source { source: usize, declaration: Declaration },
    Resolved {
        target: TargetTypeDescriptor,
        fields: Vec<FieldSpec>,
        options: GenerationOptions,
    },
}

impl Pending {
    fn target(&self) -> &TargetTypeDescriptor {
        match self {
            Self::Source { declaration, .. } => &declaration.target,
            Self::Resolved { target, .. } => target,
        }
    }
}

/// Code generator that collects annotated declarations and outputs one Rust
/// source artifact per wrapper type.
///
/// # Type registry
///
/// Field types are resolved through the per-module import map, the other
/// wrappers of the batch and a [`TypeRegistry`]. Customize the registry with
/// [`register_type`](CodeGenerator::register_type) and
/// [`unregister_type`](CodeGenerator::unregister_type).
///
/// # Example
///
/// ```
/// use wrapper_value_object_codegen::{CodeGenerator, Diagnostic};
///
/// let mut generator = CodeGenerator::new();
/// generator
///     .add_source_str(
///         r#"
///         #[wrapper_value_object(i32)]
///         #[derive(Clone, Copy)]
///         pub struct Score;
///         "#,
///     )
///     .unwrap();
///
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let artifacts = generator.generate(&mut diagnostics);
/// assert!(diagnostics.is_empty());
/// assert_eq!(artifacts[0].file_name, "Score_implementation.rs");
/// ```
#[derive(Debug)]
pub struct CodeGenerator {
    /// Declarations in the order they were added.
    pending: Vec<Pending>,

    /// Members the user wrote, keyed by the module they appear in.
    members: HashMap<MemberKey, Vec<MemberDescriptor>>,

    /// Number of sources added so far.
    sources: usize,

    /// Custom header comment
    header: Option<String>,

    registry: TypeRegistry,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            members: HashMap::new(),
            sources: 0,
            header: None,
            registry: TypeRegistry::with_builtins(),
        }
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default header comment. Each line is emitted as a `//` comment.
    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.header = Some(header.into());
        self
    }

    /// Teach the generator about an external type, keyed by its fully-qualified path.
    pub fn register_type(&mut self, path: impl Into<String>, kind: TypeKind) -> &mut Self {
        self.registry.register(path, kind);
        self
    }

    pub fn unregister_type(&mut self, path: &str) -> &mut Self {
        self.registry.unregister(path);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Parse a single Rust source file and collect annotated declarations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> Result<(), wrapper_value_object_codegen::CodegenError> {
    /// use wrapper_value_object_codegen::{CargoWarnings, CodeGenerator};
    ///
    /// let mut generator = CodeGenerator::new();
    /// generator.add_source_file("src/lib.rs")?;
    /// generator.write_to_dir(std::env::var("OUT_DIR").unwrap(), &mut CargoWarnings)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, CodegenError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| CodegenError::io(path, err))?;
        self.add_parsed_source(&source, Some(path))?;
        Ok(self)
    }

    /// Parse Rust source from a string and collect annotated declarations.
    pub fn add_source_str(&mut self, source: &str) -> Result<&mut Self, CodegenError> {
        self.add_parsed_source(source, None)?;
        Ok(self)
    }

    /// Recursively scan a directory for `.rs` files, in file name order.
    pub fn add_source_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, CodegenError> {
        let root = path.as_ref();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                CodegenError::io(path, io::Error::from(err))
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "rs") {
                self.add_source_file(path)?;
            }
        }
        Ok(self)
    }

    /// Add a declaration whose fields are already resolved.
    pub fn add_declaration(
        &mut self,
        target: TargetTypeDescriptor,
        fields: Vec<FieldSpec>,
        options: GenerationOptions,
    ) -> &mut Self {
        self.pending.push(Pending::Resolved {
            target,
            fields,
            options,
        });
        self
    }

    fn add_parsed_source(&mut self, source: &str, path: Option<&Path>) -> Result<(), CodegenError> {
        let file = syn::parse_file(source).map_err(|source| CodegenError::Parse {
            path: path.map_or_else(|| PathBuf::from("<string>"), Path::to_path_buf),
            source,
        })?;
        let extracted = extractor::extract_file(&file, path);
        let source = self.sources;
        self.sources += 1;
        for user in extracted.members {
            self.members
                .entry((source, user.module, user.type_name))
                .or_default()
                .push(user.member);
        }
        self.pending.extend(
            extracted
                .declarations
                .into_iter()
                .map(|declaration| Pending::Source { source, declaration }),
        );
        Ok(())
    }

    /// Generate one artifact per accepted declaration, followed by the shared artifact.
    ///
    /// Rejected declarations are reported to `sink` and produce no artifact.
    pub fn generate(&self, sink: &mut dyn DiagnosticSink) -> Vec<Artifact> {
        // Without a cancellation flag the run cannot fail.
        self.run(sink, None)
            .map(|batch| batch.artifacts)
            .unwrap_or_default()
    }

    /// Like [`generate`](Self::generate), but stops with [`CodegenError::Cancelled`]
    /// as soon as `cancel` is set. No partial output is returned.
    pub fn generate_cancellable(
        &self,
        sink: &mut dyn DiagnosticSink,
        cancel: &AtomicBool,
    ) -> Result<Vec<Artifact>, CodegenError> {
        self.run(sink, Some(cancel)).map(|batch| batch.artifacts)
    }

    /// Generate and write every artifact into `dir`, returning the written paths.
    ///
    /// A rejected declaration gets an artifact holding a `compile_error!` with its
    /// diagnostic, so an `include!` left over from an earlier run fails loudly
    /// instead of picking up stale members. Files whose contents are unchanged
    /// are left untouched.
    pub fn write_to_dir(
        &self,
        dir: impl AsRef<Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<PathBuf>, CodegenError> {
        let dir = dir.as_ref();
        let Batch {
            mut artifacts,
            rejected,
        } = self.run(sink, None)?;
        let mut owned: HashSet<String> = artifacts
            .iter()
            .map(|artifact| artifact.file_name.clone())
            .collect();
        for (type_name, diagnostic) in &rejected {
            let file_name = artifact_file_name(type_name);
            if owned.insert(file_name.clone()) {
                artifacts.push(Artifact {
                    file_name,
                    contents: self.with_header(&render::rejection_artifact(diagnostic)),
                });
            }
        }
        fs::create_dir_all(dir).map_err(|err| CodegenError::io(dir, err))?;

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = dir.join(&artifact.file_name);
            let unchanged = fs::read_to_string(&path).is_ok_and(|old| old == artifact.contents);
            if !unchanged {
                fs::write(&path, &artifact.contents).map_err(|err| CodegenError::io(&path, err))?;
            }
            written.push(path);
        }
        Ok(written)
    }

    fn run(
        &self,
        sink: &mut dyn DiagnosticSink,
        cancel: Option<&AtomicBool>,
    ) -> Result<Batch, CodegenError> {
        let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

        let mut rejected = Vec::new();
        let mut accepted: Vec<(&Pending, TargetTypeDescriptor)> = Vec::new();
        let mut seen = HashSet::new();
        for pending in &self.pending {
            let target = pending.target().clone();
            if let Err(diagnostic) = diagnostics::check_declaration(&target) {
                reject(sink, &mut rejected, &target.name, diagnostic);
                continue;
            }
            if !seen.insert(target.name.clone()) {
                reject(
                    sink,
                    &mut rejected,
                    &target.name,
                    Diagnostic::error(
                        DiagnosticCode::DuplicateTypeName,
                        format!(
                            "another wrapper value object named `{}` already owns `{}`",
                            target.name,
                            artifact_file_name(&target.name)
                        ),
                        target.location.clone(),
                    ),
                );
                continue;
            }
            accepted.push((pending, target));
        }

        let batch_names: HashSet<String> =
            accepted.iter().map(|(_, target)| target.name.clone()).collect();
        let order = dependency_order(&accepted, &batch_names);

        let empty_context = SourceContext::default();
        let mut wrappers: HashMap<String, TypeTraits> = HashMap::new();
        let mut artifacts = Vec::with_capacity(accepted.len() + 1);
        for index in order {
            if is_cancelled() {
                return Err(CodegenError::Cancelled);
            }
            let (pending, target) = &accepted[index];
            let host = BatchHost {
                registry: &self.registry,
                context: match pending {
                    Pending::Source { declaration, .. } => declaration.context.as_ref(),
                    Pending::Resolved { .. } => &empty_context,
                },
                source: match pending {
                    Pending::Source { source, .. } => Some(*source),
                    Pending::Resolved { .. } => None,
                },
                wrappers: &wrappers,
                batch_names: &batch_names,
                members: &self.members,
            };
            let target = &target.clone().with_members(&host.declared_members(&target.name));
            let (fields, options) = match pending {
                Pending::Source { declaration, .. } => {
                    let parsed = declaration
                        .args
                        .clone()
                        .and_then(|args| parser::parse(&args, &host));
                    match parsed {
                        Ok(parsed) => parsed,
                        Err(err) => {
                            let location =
                                SourceLocation::from_span(target.location.file.as_deref(), err.span());
                            reject(
                                sink,
                                &mut rejected,
                                &target.name,
                                Diagnostic::error(
                                    DiagnosticCode::MalformedSpecification,
                                    format!("`{}`: {err}", target.name),
                                    location,
                                ),
                            );
                            continue;
                        }
                    }
                }
                Pending::Resolved {
                    fields, options, ..
                } => (fields.clone(), *options),
            };

            let ir = run_pass(&fields, &options, target);
            wrappers.insert(target.name.clone(), ir.wrapper_traits(target));
            let contents = self.with_header(&render::serialize(&ir));

            if is_cancelled() {
                return Err(CodegenError::Cancelled);
            }
            tracing::debug!(
                type_name = %target.name,
                members = ir.members.len(),
                "generated wrapper value object"
            );
            artifacts.push(Artifact {
                file_name: artifact_file_name(&target.name),
                contents,
            });
        }

        artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        artifacts.push(Artifact {
            file_name: SHARED_ARTIFACT_NAME.to_string(),
            contents: self.with_header(&render::shared_artifact()),
        });
        Ok(Batch {
            artifacts,
            rejected,
        })
    }

    fn with_header(&self, body: &str) -> String {
        let mut output = String::new();
        if let Some(header) = &self.header {
            for line in header.lines() {
                output.push_str("// ");
                output.push_str(line);
                output.push('\n');
            }
        } else {
            output.push_str("// Auto-generated by wrapper-value-object-codegen\n");
            output.push_str("// DO NOT EDIT MANUALLY\n");
        }
        output.push('\n');
        output.push_str(body);
        output
    }
}

/// Output of one run.
#[derive(Debug)]
struct Batch {
    artifacts: Vec<Artifact>,
    /// Rejected type names with the diagnostic that rejected them.
    rejected: Vec<(String, Diagnostic)>,
}

fn reject(
    sink: &mut dyn DiagnosticSink,
    rejected: &mut Vec<(String, Diagnostic)>,
    type_name: &str,
    diagnostic: Diagnostic,
) {
    tracing::warn!(code = %diagnostic.code, "{}", diagnostic.message);
    rejected.push((type_name.to_string(), diagnostic.clone()));
    sink.report(diagnostic);
}

/// Order declarations so every wrapper comes after the wrappers its fields use.
///
/// Kahn's algorithm, always taking the earliest ready declaration. Members of a
/// cycle keep their original order and see each other as unresolved.
fn dependency_order(
    accepted: &[(&Pending, TargetTypeDescriptor)],
    batch_names: &HashSet<String>,
) -> Vec<usize> {
    let index_of: HashMap<&str, usize> = accepted
        .iter()
        .enumerate()
        .map(|(index, (_, target))| (target.name.as_str(), index))
        .collect();

    let mut unmet = vec![0usize; accepted.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); accepted.len()];
    for (index, (pending, target)) in accepted.iter().enumerate() {
        let Pending::Source { declaration, .. } = pending else {
            continue;
        };
        let Ok(args) = &declaration.args else {
            continue;
        };
        let deps: BTreeSet<usize> = args
            .iter()
            .filter_map(|arg| match arg {
                AttributeArg::Type(ty) => {
                    batch_wrapper(ty, &declaration.context, batch_names)
                }
                _ => None,
            })
            .filter(|name| *name != target.name)
            .filter_map(|name| index_of.get(name.as_str()).copied())
            .collect();
        unmet[index] = deps.len();
        for dep in deps {
            dependents[dep].push(index);
        }
    }

    let mut ready: BTreeSet<usize> = (0..accepted.len()).filter(|i| unmet[*i] == 0).collect();
    let mut order = Vec::with_capacity(accepted.len());
    let mut done = vec![false; accepted.len()];
    while let Some(index) = ready.pop_first() {
        done[index] = true;
        order.push(index);
        for &dependent in &dependents[index] {
            unmet[dependent] -= 1;
            if unmet[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }
    order.extend((0..accepted.len()).filter(|i| !done[*i]));
    order
}

/// Name of the batch wrapper `ty` refers to, if any.
fn batch_wrapper(ty: &Type, context: &SourceContext, batch_names: &HashSet<String>) -> Option<String> {
    let path = host::path_of(ty)?;
    let full = context.resolve_path(&path);
    let is_local = !full.contains("::")
        || ["crate::", "self::", "super::"]
            .iter()
            .any(|prefix| full.starts_with(prefix));
    let last = full.rsplit("::").next()?;
    (is_local && batch_names.contains(last)).then(|| last.to_string())
}

/// Resolves through imports, the batch's wrappers and the registry.
struct BatchHost<'a> {
    registry: &'a TypeRegistry,
    context: &'a SourceContext,
    wrappers: &'a HashMap<String, TypeTraits>,
    batch_names: &'a HashSet<String>,
    members: &'a HashMap<MemberKey, Vec<MemberDescriptor>>,
    /// `None` for programmatic declarations, which carry their own members.
    source: Option<usize>,
}

impl DeclarationHost for BatchHost<'_> {
    fn resolve_type(&self, ty: &Type) -> TypeRef {
        let kind = host::path_of(ty)
            .map(|path| self.resolve_path(ty, &path))
            .unwrap_or(TypeKind::Named(TypeTraits::ASSUMED));
        TypeRef::new(ty.clone(), kind)
    }

    fn declared_members(&self, type_name: &str) -> Vec<MemberDescriptor> {
        let Some(source) = self.source else {
            return Vec::new();
        };
        let key = (source, self.context.module.clone(), type_name.to_string());
        self.members.get(&key).cloned().unwrap_or_default()
    }
}

impl BatchHost<'_> {
    fn resolve_path(&self, ty: &Type, path: &str) -> TypeKind {
        if let Some(primitive) = Primitive::from_ident(path) {
            return TypeKind::Primitive(primitive);
        }
        if let Some(name) = batch_wrapper(ty, self.context, self.batch_names) {
            let traits = self.wrappers.get(&name).copied().unwrap_or(TypeTraits::ASSUMED);
            return TypeKind::Named(traits);
        }
        let full = self.context.resolve_path(path);
        host::resolve_path(self.registry, &full).unwrap_or(TypeKind::Named(TypeTraits::ASSUMED))
    }
}
