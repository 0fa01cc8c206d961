//! DSL-level semantic diagnostics (spec.md §4.E): validates every `key: value` statement inside a
//! test against the query its enclosing function scope binds to.

use crate::base_abstractions::{Diagnostic, DiagnosticKind};
use crate::cypher::{self, QueryMetadata};
use crate::parser::ast;
use crate::schema::TypeSchema;
use crate::symbols::{QuerySymbol, SymbolTable};

pub fn check_file(file: &ast::File, symbols: &SymbolTable, schema: Option<&TypeSchema>) -> Vec<Diagnostic> {
	let mut diagnostics = Vec::new();

	for scope in &file.scopes {
		let Some(symbol) = symbols.queries.get(&scope.function_name) else { continue };
		let meta = match schema {
			Some(schema) => cypher::analyze_with_schema(&symbol.body, schema),
			None => cypher::analyze(&symbol.body),
		};
		check_items(&scope.items, symbol, &meta, &mut diagnostics);
	}

	diagnostics
}

fn check_items(items: &[ast::TestOrGroup], symbol: &QuerySymbol, meta: &QueryMetadata, out: &mut Vec<Diagnostic>) {
	for item in items {
		match item {
			ast::TestOrGroup::Test(test) => {
				for statement in &test.statements {
					check_statement(statement, symbol, meta, out);
				}
			}
			ast::TestOrGroup::Group(group) => check_items(&group.items, symbol, meta, out),
		}
	}
}

fn check_statement(statement: &ast::Statement, symbol: &QuerySymbol, meta: &QueryMetadata, out: &mut Vec<Diagnostic>) {
	if statement.key.is_parameter {
		let name = statement.key.segments.first().map(String::as_str).unwrap_or("");
		if !symbol.params.iter().any(|p| p == name) {
			out.push(Diagnostic::error(
				DiagnosticKind::UnknownParameter,
				statement.key.span.clone(),
				format!("query '{}' has no parameter '${name}'", symbol.name),
			));
		}
		return;
	}

	let path = statement.key.text();
	let Some(projection) = meta.returns.iter().find(|r| r.effective_name() == path) else {
		out.push(Diagnostic::error(
			DiagnosticKind::UnknownProjection,
			statement.key.span.clone(),
			format!("query '{}' does not return '{path}'", symbol.name),
		));
		return;
	};

	if let ast::Value::Literal(literal) | ast::Value::LiteralWhere(literal, _) = &statement.value {
		let literal_ty = dsl_literal_type(literal);
		if !projection.ty.compatible_with_literal(&literal_ty) {
			out.push(Diagnostic::error(
				DiagnosticKind::TypeMismatch,
				statement.span.clone(),
				format!("'{path}' is {} but the expected value is {}", literal_ty.display(), projection.ty.display()),
			));
		}
	}
}

fn dsl_literal_type(literal: &ast::Literal) -> crate::schema::Type {
	use crate::schema::Type;
	match literal {
		ast::Literal::String(_) => Type::string(),
		ast::Literal::Int(_) => Type::int(),
		ast::Literal::Float(_) => Type::float(),
		ast::Literal::Bool(_) => Type::bool(),
		ast::Literal::Null => Type::any(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::dsl::tokenize;
	use crate::parser::parse;
	use crate::symbols::build_symbol_table;
	use pretty_assertions::assert_eq;

	fn analyze_source(source: &str) -> Vec<Diagnostic> {
		let (tokens, _) = tokenize(source);
		let (file, _) = parse(&tokens);
		let (symbols, _) = build_symbol_table(&file);
		check_file(&file, &symbols, None)
	}

	#[test]
	fn flags_unknown_parameter_reference() {
		let source = r#"
			fn GetUser($id) `MATCH (u:User) WHERE u.id = $id RETURN u.name AS name`
			GetUser {
				test "finds a user" {
					$missing: 1
				}
			}
		"#;
		let diags = analyze_source(source);
		assert!(diags.iter().any(|d| d.kind == DiagnosticKind::UnknownParameter));
	}

	#[test]
	fn flags_unknown_projection_reference() {
		let source = r#"
			fn GetUser() `RETURN 1 AS total`
			GetUser {
				test "checks a field that does not exist" {
					nope: 1
				}
			}
		"#;
		let diags = analyze_source(source);
		assert!(diags.iter().any(|d| d.kind == DiagnosticKind::UnknownProjection));
	}

	#[test]
	fn accepts_a_known_projection_with_a_compatible_literal() {
		let source = r#"
			fn GetUser() `RETURN 1 AS total`
			GetUser {
				test "ok" {
					total: 1
				}
			}
		"#;
		let diags = analyze_source(source);
		assert!(diags.is_empty());
	}
}
