//! Structural checks that run before a declaration is parsed, and the types
//! used to report their outcome to a host.

use std::fmt;
use std::path::{Path, PathBuf};

use proc_macro2::Span;

use crate::types::TargetTypeDescriptor;

/// Stable diagnostic codes. Every diagnostic rejects its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    NestedTypeNotSupported,
    NotPartial,
    MalformedSpecification,
    GenericTypeNotSupported,
    DuplicateTypeName,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NestedTypeNotSupported => "WVO001",
            Self::NotPartial => "WVO002",
            Self::MalformedSpecification => "WVO003",
            Self::GenericTypeNotSupported => "WVO004",
            Self::DuplicateTypeName => "WVO005",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declaration lives. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn from_span(file: Option<&Path>, span: Span) -> Self {
        let start = span.start();
        Self {
            file: file.map(Path::to_path_buf),
            line: start.line,
            column: start.column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column + 1),
            None => write!(f, "<source>:{}:{}", self.line, self.column + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            code,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {} at {}", self.code, self.message, self.location)
    }
}

/// Receives diagnostics produced during a batch.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to Cargo as `cargo:warning=` lines from a build script.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoWarnings;

impl DiagnosticSink for CargoWarnings {
    fn report(&mut self, diagnostic: Diagnostic) {
        println!("cargo:warning={diagnostic}");
    }
}

/// Reject declarations the generator cannot extend.
///
/// Only the first violation is reported.
pub fn check_declaration(target: &TargetTypeDescriptor) -> Result<(), Diagnostic> {
    let violation = if target.is_nested {
        Some((
            DiagnosticCode::NestedTypeNotSupported,
            format!(
                "`{}` is declared inside a function body; wrapper value objects must be module-level items",
                target.name
            ),
        ))
    } else if !target.is_partial {
        Some((
            DiagnosticCode::NotPartial,
            format!(
                "`{}` already declares fields; declare it as `struct {};` so the storage can be generated",
                target.name, target.name
            ),
        ))
    } else if target.is_generic {
        Some((
            DiagnosticCode::GenericTypeNotSupported,
            format!("`{}` has generic parameters, which wrapper value objects do not support", target.name),
        ))
    } else {
        None
    };

    match violation {
        Some((code, message)) => Err(Diagnostic::error(code, message, target.location.clone())),
        None => Ok(()),
    }
}
