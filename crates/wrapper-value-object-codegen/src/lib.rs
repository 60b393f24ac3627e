//! # wrapper-value-object-codegen
//!
//! Code generator for strongly-typed wrapper value objects. A unit struct
//! annotated with `#[wrapper_value_object(..)]` gets a storage field plus a
//! complete, internally consistent set of members: constructors, accessors,
//! equality, ordering, arithmetic, conversions and formatting.
//!
//! ## Features
//!
//! - Single-field wrappers over primitives, `String`, `uuid::Uuid` and `rust_decimal::Decimal`
//! - Compound wrappers combining up to four named fields, including other wrappers
//! - Operator policy with explicit overrides and an `Id`-suffix naming heuristic
//! - Optional user-supplied `validate` hook run by every constructor
//! - Structural diagnostics reported as `cargo:warning=` lines from `build.rs`
//!
//! ## Usage
//!
//! ### 1. Annotate your types
//!
//! ```rust,ignore
//! use wrapper_value_object_derive::wrapper_value_object;
//!
//! #[wrapper_value_object("HomeGoals", u8, "AwayGoals", u8)]
//! #[derive(Clone, Copy)]
//! pub struct MatchResult;
//! ```
//!
//! ### 2. Generate implementations in build.rs
//!
//! ```no_run
//! use wrapper_value_object_codegen::{CargoWarnings, CodeGenerator};
//!
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
//!     CodeGenerator::new()
//!         .add_source_dir("src")
//!         .expect("source files are readable and parse")
//!         .write_to_dir(out_dir, &mut CargoWarnings)
//!         .expect("OUT_DIR is writable");
//!
//!     println!("cargo:rerun-if-changed=src");
//! }
//! ```
//!
//! The attribute macro includes `<TypeName>_implementation.rs` from `OUT_DIR`
//! next to each struct.

mod diagnostics;
mod error;
mod extractor;
mod generator;
mod host;
mod members;
mod parser;
mod policy;
mod registry;
mod render;
mod types;

pub use diagnostics::{
    CargoWarnings, Diagnostic, DiagnosticCode, DiagnosticSink, SourceLocation, check_declaration,
};
pub use error::{CodegenError, MalformedSpecError, MalformedSpecKind};
pub use extractor::MARKER;
pub use generator::{Artifact, CodeGenerator, artifact_file_name, run_pass};
pub use host::{DeclarationHost, RegistryHost};
pub use members::{
    ArithmeticOutput, BinaryOp, ConstructorCheck, FormatTrait, Member, MemberIr, MemberKind,
    Storage, StorageSlot, emit,
};
pub use parser::{AttributeArg, parse, parse_args, parse_tokens};
pub use policy::{EffectivePolicy, resolve};
pub use registry::TypeRegistry;
pub use render::{SHARED_ARTIFACT_NAME, serialize, shared_artifact};
pub use types::{
    BaseTypeCategory, DEFAULT_FIELD_NAME, DeclarationKind, FieldSpec, GenerationOptions, ID_SUFFIX,
    MAX_FIELDS, MemberDescriptor, Primitive, RESERVED_MEMBER_NAMES, TargetTypeDescriptor, TriBool,
    TypeKind, TypeRef, TypeTraits, ValidationHook, type_to_string,
};
