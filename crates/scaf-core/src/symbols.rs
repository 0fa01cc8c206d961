//! Symbol & Import Resolver (spec.md §4.D): builds the per-file symbol table and defines the
//! pluggable file-loader seam used for on-demand import resolution.

use std::collections::HashMap;

use thiserror::Error;

use crate::base_abstractions::{Diagnostic, DiagnosticKind, Span};
use crate::parser::ast;

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySymbol {
	pub name: String,
	pub params: Vec<String>,
	pub body: String,
	/// Index into `File::functions` of the declaring node.
	pub declaring_node_ref: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportInfo {
	pub alias: String,
	pub path: String,
	/// Index into `File::imports` of the declaring node.
	pub declaring_node_ref: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
	pub queries: HashMap<String, QuerySymbol>,
	pub imports: HashMap<String, ImportInfo>,
}

/// Walks a parsed file in O(nodes), producing its symbol table plus duplicate-declaration
/// diagnostics (duplicates are diagnostics, not parse errors — spec.md §3).
pub fn build_symbol_table(file: &ast::File) -> (SymbolTable, Vec<Diagnostic>) {
	let mut table = SymbolTable::default();
	let mut diagnostics = Vec::new();

	for (index, function) in file.functions.iter().enumerate() {
		let symbol = QuerySymbol {
			name: function.name.clone(),
			params: function.params.iter().map(|p| p.name.clone()).collect(),
			body: function.body_raw_string.clone(),
			declaring_node_ref: index,
		};
		if table.queries.insert(function.name.clone(), symbol).is_some() {
			diagnostics.push(duplicate(
				DiagnosticKind::DuplicateFunction,
				function.name_span.clone(),
				&function.name,
				"function",
			));
		}
	}

	for (index, import) in file.imports.iter().enumerate() {
		let info = ImportInfo { alias: import.alias.clone(), path: import.path.clone(), declaring_node_ref: index };
		if table.imports.insert(import.alias.clone(), info).is_some() {
			diagnostics.push(duplicate(DiagnosticKind::DuplicateImport, import.span.clone(), &import.alias, "import"));
		}
	}

	(table, diagnostics)
}

fn duplicate(kind: DiagnosticKind, span: Span, name: &str, what: &str) -> Diagnostic {
	Diagnostic::error(kind, span, format!("duplicate {what} '{name}'"))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
	#[error("could not resolve import path '{0}'")]
	NotFound(String),
	#[error("failed to read '{0}': {1}")]
	Io(String, String),
}

/// Resolves and loads scaf source files for the import resolver. Implemented by the host over
/// the real filesystem in tests and over an LSP-aware document store in production.
pub trait FileLoader: Send + Sync {
	/// Resolves `import_path` against `from_file` (if relative) or the workspace root, adding
	/// the DSL file extension if missing (spec.md §4.D).
	fn resolve_path(&self, from_file: &str, import_path: &str) -> String;

	fn load(&self, absolute_path: &str) -> Result<String, ImportError>;
}
