use std::sync::Arc;

use scaf_abstractions::{lsp_types::TextDocumentIdentifier, tracing::warn};
use scaf_core::{lsp_file::LspFile, schema::TypeSchema, AnalyzedFile};

use super::analyzer::{Analyzer, AnyAnalyzer, DefaultAnalyzer, ParsedUnit};

/// Builds an [`AnyAnalyzer`] for a dialect, given the schema loaded from the workspace (if any).
pub(crate) type AnalyzerFactory = Arc<dyn Fn(Option<Arc<TypeSchema>>) -> Arc<AnyAnalyzer> + Send + Sync>;

/// One query dialect: its name, how to build its [`Analyzer`], and whether it exposes an LSP
/// surface (hover/completion/diagnostics) for query bodies beyond plain DSL navigation.
struct Dialect {
	name: &'static str,
	factory: AnalyzerFactory,
	has_lsp_support: bool,
}

/// The resolved dialect for a running server: an analyzer factory plus whether query-body LSP
/// features (hover, completion, diagnostics inside a query) are available for it.
#[derive(Clone)]
pub(crate) struct ResolvedDialect {
	pub factory: AnalyzerFactory,
	pub has_lsp_support: bool,
}

/// The process-wide query dialect registry (spec.md §4.J). Dialects are registered explicitly up
/// front; there is no plugin discovery or init-time self-registration.
pub(crate) struct DialectRegistry {
	dialects: Vec<Dialect>,
}

impl DialectRegistry {
	/// Builds the registry with every dialect scaf ships.
	pub fn with_builtin_dialects() -> Self {
		Self {
			dialects: vec![Dialect {
				name: "cypher",
				factory: Arc::new(|schema| Arc::new(DefaultAnalyzer::new(schema)) as Arc<AnyAnalyzer>),
				has_lsp_support: true,
			}],
		}
	}

	/// Resolves `name` to a [`ResolvedDialect`]. An unknown name is logged and the server falls
	/// back to [`NullAnalyzer`]: the surrounding DSL still parses and navigates normally, but query
	/// bodies are never analyzed and have no LSP features.
	pub fn resolve(&self, name: &str) -> ResolvedDialect {
		match self.dialects.iter().find(|d| d.name == name) {
			Some(dialect) => ResolvedDialect { factory: dialect.factory.clone(), has_lsp_support: dialect.has_lsp_support },
			None => {
				warn!("Unknown query dialect '{name}'; continuing with no query features.");
				ResolvedDialect { factory: Arc::new(|_| Arc::new(NullAnalyzer) as Arc<AnyAnalyzer>), has_lsp_support: false }
			}
		}
	}
}

/// The [`Analyzer`] used for an unrecognized dialect: parses the DSL shell (functions, scopes,
/// tests) so the document still navigates, but never runs query-body analysis, so diagnostics and
/// hover/completion/goto-definition inside a query body are unavailable.
struct NullAnalyzer;

impl Analyzer for NullAnalyzer {
	fn parse_text_document_contents(&self, document_identifier: TextDocumentIdentifier, contents: String) -> ParsedUnit {
		let (tokens, trivia) = scaf_core::lexer::dsl::tokenize(&contents);
		let (mut ast, parse_diagnostics) = scaf_core::parser::parse(&tokens);
		scaf_core::trivia::attach_leading_comments(&mut ast, &tokens, &trivia);

		let (symbols, symbol_diagnostics) = scaf_core::symbols::build_symbol_table(&ast);
		let has_parse_errors = !parse_diagnostics.is_empty();

		let mut diagnostics = parse_diagnostics;
		diagnostics.extend(symbol_diagnostics);

		let analyzed: AnalyzedFile = AnalyzedFile { tokens, trivia, ast, symbols, diagnostics, has_parse_errors };
		let lsp_file = LspFile::new(&contents);

		ParsedUnit { document_identifier, lsp_file: Arc::new(lsp_file), analyzed: Arc::new(analyzed) }
	}
}
