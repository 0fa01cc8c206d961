pub mod base_abstractions;
pub mod cypher;
pub mod dispatch;
pub mod lexer;
pub mod lsp_file;
pub mod parser;
pub mod schema;
pub mod semantic;
pub mod symbols;
pub mod trivia;

use base_abstractions::Diagnostic;
use schema::TypeSchema;

/// Everything the rest of the system needs about one DSL file: the token/trivia stream needed for
/// position-dispatch, the suite AST (always present, even on a malformed file), the symbol table,
/// and every diagnostic collected across parsing and semantic analysis (spec.md §3).
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
	pub tokens: Vec<lexer::dsl::Token>,
	pub trivia: Vec<lexer::Trivia>,
	pub ast: parser::ast::File,
	pub symbols: symbols::SymbolTable,
	pub diagnostics: Vec<Diagnostic>,
	pub has_parse_errors: bool,
}

pub fn analyze(source: &str) -> AnalyzedFile { analyze_with_schema(source, None) }

pub fn analyze_with_schema(source: &str, schema: Option<&TypeSchema>) -> AnalyzedFile {
	let (tokens, trivia) = lexer::dsl::tokenize(source);
	let (mut ast, parse_diagnostics) = parser::parse(&tokens);
	trivia::attach_leading_comments(&mut ast, &tokens, &trivia);

	let (symbols, symbol_diagnostics) = symbols::build_symbol_table(&ast);
	let semantic_diagnostics = semantic::check_file(&ast, &symbols, schema);

	let has_parse_errors = !parse_diagnostics.is_empty();

	let mut diagnostics = parse_diagnostics;
	diagnostics.extend(symbol_diagnostics);
	diagnostics.extend(semantic_diagnostics);

	AnalyzedFile { tokens, trivia, ast, symbols, diagnostics, has_parse_errors }
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn analyzes_a_minimal_suite() {
		let source = r#"
			fn GetUser() `RETURN 1 AS total`
			GetUser {
				test "sanity" {
					total: 1
				}
			}
		"#;
		let analyzed = analyze(source);
		assert!(!analyzed.has_parse_errors);
		assert!(analyzed.diagnostics.is_empty());
		assert!(analyzed.symbols.queries.contains_key("GetUser"));
	}

	#[test]
	fn still_returns_a_usable_tree_on_malformed_input() {
		let source = r#"fn GetUser( `RETURN 1` fn Other() `RETURN 2`"#;
		let analyzed = analyze(source);
		assert!(analyzed.has_parse_errors);
		assert!(analyzed.symbols.queries.contains_key("Other"));
	}
}
