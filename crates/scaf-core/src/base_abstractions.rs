//! Vocabulary types shared by every analysis phase: spans, diagnostics, file identity.

use std::ops::Range;
use std::sync::Arc;

/// A byte range into a source buffer. `start`/`end` are byte offsets, not character counts.
pub type Span = Range<usize>;

/// Identifies a file by its workspace-relative or absolute path string.
///
/// Interning isn't needed here the way it would be for a salsa-tracked id: paths are compared
/// and hashed directly, and cloning an `Arc<str>` is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub Arc<str>);

impl FileId {
	pub fn new(path: impl Into<Arc<str>>) -> Self { FileId(path.into()) }

	pub fn path(&self) -> &str { &self.0 }
}

impl std::fmt::Display for FileId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Severity {
	Error,
	Warning,
	Info,
	Hint,
}

/// A diagnostic code, grouped by the component that raised it (see spec.md §7).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum DiagnosticKind {
	ParseError,
	UnknownParameter,
	UnknownProjection,
	DuplicateFunction,
	DuplicateImport,
	ImportError,
	SyntaxError,
	UnknownLabel,
	UnknownRelType,
	TypeMismatch,
}

impl DiagnosticKind {
	pub fn code(self) -> &'static str {
		match self {
			DiagnosticKind::ParseError => "parse-error",
			DiagnosticKind::UnknownParameter => "unknown-parameter",
			DiagnosticKind::UnknownProjection => "unknown-projection",
			DiagnosticKind::DuplicateFunction => "duplicate-function",
			DiagnosticKind::DuplicateImport => "duplicate-import",
			DiagnosticKind::ImportError => "import-error",
			DiagnosticKind::SyntaxError => "syntax-error",
			DiagnosticKind::UnknownLabel => "unknown-label",
			DiagnosticKind::UnknownRelType => "unknown-reltype",
			DiagnosticKind::TypeMismatch => "type-mismatch",
		}
	}
}

#[derive(Clone, PartialEq, Debug)]
pub struct Diagnostic {
	pub kind: DiagnosticKind,
	pub span: Span,
	pub severity: Severity,
	pub message: String,
}

impl Diagnostic {
	pub fn new(kind: DiagnosticKind, span: Span, severity: Severity, message: impl Into<String>) -> Self {
		Self { kind, span, severity, message: message.into() }
	}

	pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
		Self::new(kind, span, Severity::Error, message)
	}

	pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
		Self::new(kind, span, Severity::Warning, message)
	}
}
