use std::sync::Arc;

use scaf_abstractions::lsp_types::TextDocumentIdentifier;
use scaf_core::{lsp_file::LspFile, schema::TypeSchema, AnalyzedFile};

/// A single analyzed document: its identity, its byte/LSP-position mapper, and the result of
/// running it through `scaf_core::analyze`.
#[derive(Clone)]
pub(crate) struct ParsedUnit {
	pub document_identifier: TextDocumentIdentifier,
	pub lsp_file: Arc<LspFile>,
	pub analyzed: Arc<AnalyzedFile>,
}

/// Produces a [`ParsedUnit`] from a document's current text contents.
///
/// Implemented as a trait, rather than calling `scaf_core::analyze` directly, so that the
/// [`WorkspaceManager`](super::workspace::WorkspaceManager)'s background indexing loop stays
/// decoupled from scaf-core.
pub trait Analyzer {
	fn parse_text_document_contents(&self, document_identifier: TextDocumentIdentifier, contents: String) -> ParsedUnit;
}

pub type AnyAnalyzer = dyn Analyzer + Send + Sync;

/// The [`Analyzer`] used outside of tests, backed by `scaf_core::analyze_with_schema`.
pub(crate) struct DefaultAnalyzer {
	schema: Option<Arc<TypeSchema>>,
}

impl DefaultAnalyzer {
	pub fn new(schema: Option<Arc<TypeSchema>>) -> Self { Self { schema } }
}

impl Analyzer for DefaultAnalyzer {
	fn parse_text_document_contents(&self, document_identifier: TextDocumentIdentifier, contents: String) -> ParsedUnit {
		let analyzed = scaf_core::analyze_with_schema(&contents, self.schema.as_deref());
		let lsp_file = LspFile::new(&contents);

		ParsedUnit { document_identifier, lsp_file: Arc::new(lsp_file), analyzed: Arc::new(analyzed) }
	}
}
