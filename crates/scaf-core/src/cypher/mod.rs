//! The Cypher Analyzer (spec.md §4.C): parses a query body, infers expression types, and exposes
//! a read-only LSP surface keyed on a byte offset inside the body.

pub mod ast;
pub mod functions;
pub mod infer;
pub mod lsp;
pub mod parser;

use std::collections::HashMap;

use crate::base_abstractions::{Diagnostic, DiagnosticKind, Span};
use crate::schema::{Type, TypeSchema};

#[derive(Debug, Clone, PartialEq)]
pub struct ParamUsage {
	pub name: String,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnProjection {
	/// The source text of the returned expression, e.g. `"u.name"` or `"count(u)"`.
	pub expression: String,
	/// The `AS alias` name, if one was given.
	pub alias: Option<String>,
	pub ty: Type,
	/// Whether the value is guaranteed non-null: `false` only when it resolves to a schema field
	/// explicitly marked optional; everything else defaults to `true`.
	pub required: bool,
	/// Whether the root of the expression is a known aggregate function (`collect`, `count`, ...).
	pub is_aggregate: bool,
	pub span: Span,
}

impl ReturnProjection {
	/// The name other DSL statements and hover lookups reference this column by: the alias if
	/// present, else the expression text itself.
	pub fn effective_name(&self) -> &str { self.alias.as_deref().unwrap_or(&self.expression) }
}

const AGGREGATE_FUNCTIONS: &[&str] = &["collect", "head", "tail", "last", "size", "count", "min", "max", "sum", "avg"];

/// Everything the rest of the system needs to know about one query body: what it depends on
/// (`parameters`), what it produces (`returns`), what it binds (`bindings`), and whether it's
/// well-formed (`diagnostics`).
#[derive(Debug, Clone)]
pub struct QueryMetadata {
	pub query: ast::Query,
	pub parameters: Vec<ParamUsage>,
	pub returns: Vec<ReturnProjection>,
	pub bindings: infer::Bindings,
	pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze(body: &str) -> QueryMetadata { analyze_inner(body, None) }

pub fn analyze_with_schema(body: &str, schema: &TypeSchema) -> QueryMetadata { analyze_inner(body, Some(schema)) }

fn analyze_inner(body: &str, schema: Option<&TypeSchema>) -> QueryMetadata {
	let (tokens, _trivia) = crate::lexer::cypher::tokenize(body);
	let (query, mut diagnostics) = parser::parse(&tokens);

	let bindings = infer::collect_bindings(&query, schema);
	let param_types: HashMap<String, Type> = HashMap::new();
	let ctx = infer::InferCtx { schema, bindings: &bindings, param_types: &param_types };

	let parameters = collect_parameters(&query);
	let returns = collect_returns(&query, body, &ctx);

	diagnostics.extend(check_property_literals(&query, schema));

	QueryMetadata { query, parameters, returns, bindings, diagnostics }
}

fn collect_parameters(query: &ast::Query) -> Vec<ParamUsage> {
	let mut params = Vec::new();
	for clause in &query.clauses {
		match clause {
			ast::Clause::Where { expr, .. } => walk_params(expr, &mut params),
			ast::Clause::Match { patterns, .. } => {
				for pattern in patterns {
					for node in &pattern.nodes {
						for (_, expr) in &node.properties {
							walk_params(expr, &mut params);
						}
					}
				}
			}
			ast::Clause::Return { items, .. } => {
				for item in items {
					walk_params(&item.expr, &mut params);
				}
			}
			ast::Clause::Unparsed { .. } => {}
		}
	}
	params
}

fn walk_params(expr: &ast::Expr, out: &mut Vec<ParamUsage>) {
	use ast::Expr::*;
	match expr {
		Parameter { name, span } => out.push(ParamUsage { name: name.clone(), span: span.clone() }),
		Not { operand, .. } | Neg { operand, .. } | IsNull { operand, .. } | LabelPredicate { operand, .. } => walk_params(operand, out),
		Binary { lhs, rhs, .. } | In { lhs, rhs, .. } | StringPredicate { lhs, rhs, .. } => {
			walk_params(lhs, out);
			walk_params(rhs, out);
		}
		Property { base, .. } => walk_params(base, out),
		Index { base, index, .. } => {
			walk_params(base, out);
			walk_params(index, out);
		}
		Slice { base, .. } => walk_params(base, out),
		Case { branches, else_branch, .. } => {
			for (cond, result) in branches {
				walk_params(cond, out);
				walk_params(result, out);
			}
			if let Some(e) = else_branch {
				walk_params(e, out);
			}
		}
		Call { args, .. } => {
			for a in args {
				walk_params(a, out);
			}
		}
		ListComprehension { source, predicate, map, .. } => {
			walk_params(source, out);
			if let Some(p) = predicate {
				walk_params(p, out);
			}
			if let Some(m) = map {
				walk_params(m, out);
			}
		}
		PatternComprehension { map, .. } => walk_params(map, out),
		Filter { source, predicate, .. } => {
			walk_params(source, out);
			walk_params(predicate, out);
		}
		Literal { .. } | Variable { .. } | Exists { .. } => {}
	}
}

fn collect_returns(query: &ast::Query, body: &str, ctx: &infer::InferCtx) -> Vec<ReturnProjection> {
	let mut out = Vec::new();
	for clause in &query.clauses {
		if let ast::Clause::Return { items, .. } = clause {
			for item in items {
				let ty = infer::infer_expr(&item.expr, ctx);
				let expression = body.get(item.expr.span()).unwrap_or_default().to_string();
				let required = is_required_expr(&item.expr, ctx);
				let is_aggregate = is_aggregate_expr(&item.expr);
				out.push(ReturnProjection {
					expression,
					alias: item.alias.clone(),
					ty,
					required,
					is_aggregate,
					span: item.span.clone(),
				});
			}
		}
	}
	out
}

/// A projection is non-required only when it resolves to a schema field explicitly marked
/// optional; everything else (literals, aggregates, variables, unresolved properties) defaults to
/// required since the analyzer has no basis to claim it might be absent.
fn is_required_expr(expr: &ast::Expr, ctx: &infer::InferCtx) -> bool {
	let ast::Expr::Property { base, name, .. } = expr else { return true };
	let Some(schema) = ctx.schema else { return true };
	let crate::schema::Type::Named(model_name) = infer::infer_expr(base, ctx) else { return true };
	let Some(model) = schema.model(&model_name) else { return true };
	let Some(field) = model.field(name) else { return true };
	field.required
}

fn is_aggregate_expr(expr: &ast::Expr) -> bool {
	matches!(expr, ast::Expr::Call { name, .. } if AGGREGATE_FUNCTIONS.contains(&name.as_str()))
}

/// spec.md §4.C "Semantic diagnostics inside a query": checks inline property-map literals in
/// `MATCH` node patterns against the schema, plus unknown-label / unknown-rel-type warnings.
fn check_property_literals(query: &ast::Query, schema: Option<&TypeSchema>) -> Vec<Diagnostic> {
	let Some(schema) = schema else { return Vec::new() };
	let mut diagnostics = Vec::new();

	for clause in &query.clauses {
		let ast::Clause::Match { patterns, .. } = clause else { continue };
		for pattern in patterns {
			for node in &pattern.nodes {
				let Some(label) = node.labels.first() else { continue };
				let Some(model) = schema.model(label) else {
					diagnostics.push(Diagnostic::warning(
						DiagnosticKind::UnknownLabel,
						node.span.clone(),
						format!("unknown label '{label}'"),
					));
					continue;
				};
				for (prop_name, value) in &node.properties {
					let Some(field) = model.field(prop_name) else { continue };
					if let ast::Expr::Literal { value: literal, span } = value {
						let literal_ty = literal_type(literal);
						if !field.ty.compatible_with_literal(&literal_ty) {
							diagnostics.push(Diagnostic::error(
								DiagnosticKind::TypeMismatch,
								span.clone(),
								format!("property '{prop_name}' expects {}, got {}", field.ty.display(), literal_ty.display()),
							));
						}
					}
				}
			}
			for rel in &pattern.relationships {
				if !rel.rel_types.is_empty() && !schema.all_relationship_names().iter().any(|n| rel.rel_types.contains(&n.to_string())) {
					diagnostics.push(Diagnostic::warning(
						DiagnosticKind::UnknownRelType,
						rel.span.clone(),
						format!("unknown relationship type '{}'", rel.rel_types.join("|")),
					));
				}
			}
		}
	}

	diagnostics
}

fn literal_type(literal: &ast::Literal) -> Type {
	match literal {
		ast::Literal::Int(_) => Type::int(),
		ast::Literal::Float(_) => Type::float(),
		ast::Literal::String(_) => Type::string(),
		ast::Literal::Bool(_) => Type::bool(),
		ast::Literal::Null => Type::any(),
		ast::Literal::List(_) => Type::slice(Type::any()),
		ast::Literal::Map(_) => Type::Map(Box::new(Type::string()), Box::new(Type::any())),
	}
}
