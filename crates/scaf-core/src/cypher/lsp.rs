//! The Cypher Analyzer's read-only LSP surface (spec.md §4.C), keyed on a byte offset inside the
//! query body. All functions are pure: they take a snapshot (`QueryMetadata` plus the raw body
//! text) and return a value, never touching the document store directly.

use super::{ast, QueryMetadata};
use crate::base_abstractions::{Diagnostic, Span};
use crate::lexer::cypher::{tokenize, TokenKind};
use crate::schema::TypeSchema;

pub struct QueryLSPContext<'a> {
	pub enclosing_function_name: Option<String>,
	pub declared_params: Vec<String>,
	pub file_path: String,
	pub schema: Option<&'a TypeSchema>,
	pub trigger_character: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
	Keyword,
	Function,
	Label,
	RelationshipType,
	Property,
	Parameter,
	Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
	pub label: String,
	pub detail: Option<String>,
	pub insert_text: String,
	pub is_snippet: bool,
	pub kind: CompletionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
	pub contents: String,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureHelp {
	pub label: String,
	pub active_parameter: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlayHint {
	pub position: usize,
	pub label: String,
}

const CLAUSE_KEYWORDS: &[&str] = &["MATCH", "OPTIONAL MATCH", "WHERE", "RETURN", "WITH", "ORDER BY", "LIMIT", "SKIP", "UNWIND"];

const KNOWN_FUNCTIONS: &[&str] =
	&["collect", "head", "tail", "last", "size", "count", "min", "max", "sum", "avg", "coalesce", "toString", "toInteger", "toFloat", "exists", "id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextKind {
	Label,
	RelationshipType,
	Property,
	Parameter,
	FunctionOrVariable,
}

/// Classifies the request by looking at what immediately precedes the cursor, per spec.md §4.C
/// "Completion context". Best-effort text scanning rather than a full incremental reparse.
fn classify(body: &str, offset: usize) -> ContextKind {
	let before = &body[..offset.min(body.len())];
	let trimmed = before.trim_end_matches(|c: char| c.is_alphanumeric() || c == '_');

	if trimmed.ends_with('$') {
		return ContextKind::Parameter;
	}
	if trimmed.ends_with('.') {
		return ContextKind::Property;
	}
	if trimmed.ends_with(':') {
		// Disambiguate node-label `:` from relationship-type `:` by which bracket we're nested in.
		let mut paren_depth = 0i32;
		let mut bracket_depth = 0i32;
		for c in trimmed.chars() {
			match c {
				'(' => paren_depth += 1,
				')' => paren_depth -= 1,
				'[' => bracket_depth += 1,
				']' => bracket_depth -= 1,
				_ => {}
			}
		}
		if bracket_depth > 0 {
			return ContextKind::RelationshipType;
		}
		if paren_depth > 0 {
			return ContextKind::Label;
		}
	}
	ContextKind::FunctionOrVariable
}

/// For `(left)-[:_` completion, extracts `left`'s first label by scanning backward for the
/// nearest preceding `(ident:Label...)` group (spec.md §4.C relationship-type sub-case).
fn preceding_node_label(body: &str, offset: usize) -> Option<String> {
	let before = &body[..offset.min(body.len())];
	let open = before.rfind('(')?;
	let segment = &before[open..];
	let colon = segment.find(':')?;
	let after_colon = &segment[colon + 1..];
	let end = after_colon.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(after_colon.len());
	let label = &after_colon[..end];
	if label.is_empty() {
		None
	} else {
		Some(label.to_string())
	}
}

pub fn complete(body: &str, meta: &QueryMetadata, offset: usize, ctx: &QueryLSPContext) -> Vec<Completion> {
	match classify(body, offset) {
		ContextKind::Parameter => ctx
			.declared_params
			.iter()
			.map(|p| Completion {
				label: p.clone(),
				detail: Some("parameter".to_string()),
				insert_text: p.clone(),
				is_snippet: false,
				kind: CompletionKind::Parameter,
			})
			.collect(),
		ContextKind::Label => ctx
			.schema
			.map(|s| {
				s.models
					.keys()
					.map(|name| Completion {
						label: name.clone(),
						detail: Some("label".to_string()),
						insert_text: name.clone(),
						is_snippet: false,
						kind: CompletionKind::Label,
					})
					.collect()
			})
			.unwrap_or_default(),
		ContextKind::RelationshipType => {
			let schema = match ctx.schema {
				Some(s) => s,
				None => return Vec::new(),
			};
			let candidates: Vec<&str> = match preceding_node_label(body, offset) {
				Some(label) => {
					let scoped: Vec<&str> = schema.relationships_from(&label).into_iter().map(|r| r.rel_type.as_str()).collect();
					if scoped.is_empty() { schema.all_relationship_names() } else { scoped }
				}
				None => schema.all_relationship_names(),
			};
			candidates
				.into_iter()
				.map(|name| Completion {
					label: name.to_string(),
					detail: Some("relationship type".to_string()),
					insert_text: name.to_string(),
					is_snippet: false,
					kind: CompletionKind::RelationshipType,
				})
				.collect()
		}
		ContextKind::Property => {
			let Some(schema) = ctx.schema else { return Vec::new() };
			// Best-effort: offer every field of every model; the caller narrows by typed prefix.
			schema
				.models
				.values()
				.flat_map(|m| m.fields.iter())
				.map(|f| Completion {
					label: f.name.clone(),
					detail: Some(f.ty.display()),
					insert_text: f.name.clone(),
					is_snippet: false,
					kind: CompletionKind::Property,
				})
				.collect()
		}
		ContextKind::FunctionOrVariable => {
			let mut items: Vec<Completion> = CLAUSE_KEYWORDS
				.iter()
				.map(|kw| Completion {
					label: (*kw).to_string(),
					detail: Some("keyword".to_string()),
					insert_text: (*kw).to_string(),
					is_snippet: false,
					kind: CompletionKind::Keyword,
				})
				.collect();
			items.extend(KNOWN_FUNCTIONS.iter().map(|name| Completion {
				label: (*name).to_string(),
				detail: Some("function".to_string()),
				insert_text: format!("{name}($1)"),
				is_snippet: true,
				kind: CompletionKind::Function,
			}));
			items.extend(meta.bindings_variable_names().into_iter().map(|name| Completion {
				label: name.clone(),
				detail: Some("variable".to_string()),
				insert_text: name,
				is_snippet: false,
				kind: CompletionKind::Variable,
			}));
			items
		}
	}
}

pub fn hover(body: &str, meta: &QueryMetadata, offset: usize, ctx: &QueryLSPContext) -> Option<Hover> {
	let (tokens, _) = tokenize(body);
	let token = tokens.iter().find(|t| t.span.contains(&offset) || t.span.end == offset)?;
	if token.kind != TokenKind::Identifier {
		return None;
	}

	let preceded_by_dot = tokens.iter().take_while(|t| t.span.start < token.span.start).last().map(|t| t.kind) == Some(TokenKind::Dot);

	if preceded_by_dot {
		// Find the base variable immediately before the dot.
		let dot_index = tokens.iter().position(|t| std::ptr::eq(t, token))?.checked_sub(2)?;
		let base = tokens.get(dot_index)?;
		let base_ty = meta.bindings.get(&base.text)?;
		let schema = ctx.schema?;
		if let crate::schema::Type::Named(model_name) = base_ty {
			let model = schema.model(model_name)?;
			let field = model.field(&token.text)?;
			let nullable = if field.required { "" } else { " | null" };
			return Some(Hover {
				contents: format!("(property) `{}.{}`: {}{}", base.text, token.text, field.ty.display(), nullable),
				span: token.span.clone(),
			});
		}
		return None;
	}

	if let Some(ty) = meta.bindings.get(&token.text) {
		return Some(Hover { contents: format!("(variable) `{}`: {}", token.text, ty.display()), span: token.span.clone() });
	}

	if let Some(projection) = meta.returns.iter().find(|r| r.effective_name() == token.text) {
		return Some(Hover {
			contents: format!("(column) `{}`: {}", projection.effective_name(), projection.ty.display()),
			span: token.span.clone(),
		});
	}

	None
}

pub fn diagnostics(meta: &QueryMetadata, _ctx: &QueryLSPContext) -> Vec<Diagnostic> { meta.diagnostics.clone() }

/// Finds the nearest enclosing, still-open function call and its active (comma-delimited)
/// argument index, per spec.md §6's `(` `,` signature-help trigger characters.
pub fn signature_help(body: &str, offset: usize, _ctx: &QueryLSPContext) -> Option<SignatureHelp> {
	let before = &body[..offset.min(body.len())];
	let mut depth = 0i32;
	let mut call_start = None;
	for (i, c) in before.char_indices().rev() {
		match c {
			')' => depth += 1,
			'(' => {
				if depth == 0 {
					call_start = Some(i);
					break;
				}
				depth -= 1;
			}
			_ => {}
		}
	}
	let open_paren = call_start?;
	let name_end = open_paren;
	let name_start = before[..name_end].rfind(|c: char| !(c.is_alphanumeric() || c == '_')).map(|i| i + 1).unwrap_or(0);
	let name = &before[name_start..name_end];
	if name.is_empty() || !KNOWN_FUNCTIONS.contains(&name) {
		return None;
	}
	let active_parameter = before[open_paren + 1..].matches(',').count();
	Some(SignatureHelp { label: format!("{name}(...)"), active_parameter })
}

pub fn inlay_hints(meta: &QueryMetadata, _ctx: &QueryLSPContext) -> Vec<InlayHint> {
	meta.returns.iter().map(|r| InlayHint { position: r.span.end, label: format!(": {}", r.ty.display()) }).collect()
}

impl QueryMetadata {
	fn bindings_variable_names(&self) -> Vec<String> {
		let mut names: Vec<String> = Vec::new();
		for clause in &self.query.clauses {
			if let ast::Clause::Match { patterns, .. } = clause {
				for pattern in patterns {
					names.extend(pattern.nodes.iter().filter_map(|n| n.variable.clone()));
					names.extend(pattern.relationships.iter().filter_map(|r| r.variable.clone()));
				}
			}
		}
		names
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cypher::analyze;
	use pretty_assertions::assert_eq;

	fn ctx<'a>(schema: Option<&'a TypeSchema>) -> QueryLSPContext<'a> {
		QueryLSPContext { enclosing_function_name: None, declared_params: vec!["minAge".to_string()], file_path: "q.scaf".to_string(), schema, trigger_character: None }
	}

	#[test]
	fn completes_parameter_after_dollar() {
		let body = "RETURN $";
		let meta = analyze(body);
		let c = ctx(None);
		let items = complete(body, &meta, body.len(), &c);
		assert!(items.iter().any(|i| i.label == "minAge"));
	}

	#[test]
	fn signature_help_tracks_active_argument() {
		let body = "RETURN coalesce(1, $";
		let help = signature_help(body, body.len(), &ctx(None)).expect("signature help");
		assert_eq!(help.label, "coalesce(...)");
		assert_eq!(help.active_parameter, 1);
	}

	#[test]
	fn inlay_hints_show_inferred_return_types() {
		let meta = analyze("RETURN 1 + 2 AS total");
		let hints = inlay_hints(&meta, &ctx(None));
		assert_eq!(hints[0].label, ": int");
	}
}
