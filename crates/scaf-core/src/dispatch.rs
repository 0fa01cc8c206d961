//! Position-Dispatch Layer (spec.md §4.F): the single source of truth for mapping a document
//! position to a logical region. Feature handlers never compute offsets directly — they call
//! [`classify`] and match on the returned [`PositionContext`].

use crate::parser::ast::{Assert, File, FunctionScope, Group, ParenExpr, SetupClause, Test, TestOrGroup, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum PositionContext {
	/// The position is strictly between the backticks of a query body.
	InQueryBody {
		body: String,
		offset: usize,
		enclosing_function: Option<String>,
		declared_params: Vec<String>,
		/// Byte offset, in the containing document, of the first character of `body`.
		body_start_position: usize,
	},
	/// The position is inside a `(…)` expression: an assert condition or a `where` clause.
	InExpression { enclosing_scope: Option<String>, assert_query_name: Option<String>, assert_query_body: Option<String> },
	/// Anywhere else in the suite DSL.
	InDSL {
		in_scope: Option<String>,
		in_test: bool,
		in_setup: bool,
		in_assert: bool,
		at_top_level: bool,
		dotted_prefix: String,
	},
}

/// Doc ↔ byte offset: linear scan counting `\n`s.
pub fn byte_offset_to_doc_position(source: &str, offset: usize) -> (u32, u32) {
	let offset = offset.min(source.len());
	let mut line = 0u32;
	let mut line_start = 0usize;

	for (i, c) in source.char_indices() {
		if i >= offset {
			break;
		}
		if c == '\n' {
			line += 1;
			line_start = i + 1;
		}
	}

	let character = source[line_start..offset].chars().count() as u32;
	(line, character)
}

pub fn doc_position_to_byte_offset(source: &str, line: u32, character: u32) -> usize {
	let mut current_line = 0u32;
	let mut byte_offset = 0usize;

	for (i, c) in source.char_indices() {
		if current_line == line {
			break;
		}
		byte_offset = i + c.len_utf8();
		if c == '\n' {
			current_line += 1;
		}
	}

	if current_line < line {
		return source.len();
	}

	let rest = &source[byte_offset..];
	let mut chars_seen = 0u32;

	for (i, c) in rest.char_indices() {
		if chars_seen == character {
			return byte_offset + i;
		}
		chars_seen += 1;
		if c == '\n' {
			return byte_offset + i;
		}
	}

	source.len()
}

/// Body offset ↔ doc position, starting from `body_start_position` (the position immediately
/// after the opening backtick): walk the body string counting newlines, clamped to `[0, len(body)]`.
pub fn body_offset_to_doc_offset(body_start_position: usize, body: &str, body_offset: usize) -> usize {
	body_start_position + body_offset.min(body.len())
}

pub fn doc_offset_to_body_offset(body_start_position: usize, body: &str, doc_offset: usize) -> usize {
	doc_offset.saturating_sub(body_start_position).min(body.len())
}

/// Classifies `offset` (a byte offset into `source`) against the parsed suite `file`.
pub fn classify(file: &File, source: &str, offset: usize) -> PositionContext {
	for function in &file.functions {
		let body_start_position = function.body_start + 1;
		let body_end_position = body_start_position + function.body_raw_string.len();

		if offset > function.body_start && offset <= body_end_position {
			return PositionContext::InQueryBody {
				body: function.body_raw_string.clone(),
				offset: offset - body_start_position,
				enclosing_function: Some(function.name.clone()),
				declared_params: function.params.iter().map(|p| p.name.clone()).collect(),
				body_start_position,
			};
		}
	}

	for scope in &file.scopes {
		if scope.span.contains(&offset) {
			if let Some(context) = classify_scope(scope, offset) {
				return context;
			}
		}
	}

	InDslScan::new(source, offset).finish()
}

fn classify_scope(scope: &FunctionScope, offset: usize) -> Option<PositionContext> {
	if let Some(context) = classify_setup(&scope.setup, &scope.function_name, offset) {
		return Some(context);
	}
	if let Some(context) = classify_setup(&scope.teardown, &scope.function_name, offset) {
		return Some(context);
	}

	classify_items(&scope.items, &scope.function_name, offset)
}

fn classify_items(items: &[TestOrGroup], enclosing_scope: &str, offset: usize) -> Option<PositionContext> {
	for item in items {
		if !item.span().contains(&offset) {
			continue;
		}

		return match item {
			TestOrGroup::Test(test) => classify_test(test, enclosing_scope, offset),
			TestOrGroup::Group(group) => classify_group(group, enclosing_scope, offset),
		};
	}

	None
}

fn classify_group(group: &Group, enclosing_scope: &str, offset: usize) -> Option<PositionContext> {
	if let Some(context) = classify_setup(&group.setup, enclosing_scope, offset) {
		return Some(context);
	}
	if let Some(context) = classify_setup(&group.teardown, enclosing_scope, offset) {
		return Some(context);
	}

	classify_items(&group.items, enclosing_scope, offset)
}

fn classify_test(test: &Test, enclosing_scope: &str, offset: usize) -> Option<PositionContext> {
	if let Some(context) = classify_setup(&test.setup, enclosing_scope, offset) {
		return Some(context);
	}

	for statement in &test.statements {
		if let Some(expr) = value_expr(&statement.value) {
			if expr.span.contains(&offset) {
				return Some(PositionContext::InExpression {
					enclosing_scope: Some(enclosing_scope.to_string()),
					assert_query_name: None,
					assert_query_body: None,
				});
			}
		}
	}

	for assert in &test.asserts {
		if let Some(context) = classify_assert(assert, enclosing_scope, offset) {
			return Some(context);
		}
	}

	None
}

fn classify_assert(assert: &Assert, enclosing_scope: &str, offset: usize) -> Option<PositionContext> {
	if !assert.span.contains(&offset) {
		return None;
	}

	for condition in &assert.conditions {
		if condition.span.contains(&offset) {
			let (assert_query_name, assert_query_body) = match &assert.query_ref {
				Some(crate::parser::ast::AssertQuery::Named { name, .. }) => (Some(name.clone()), None),
				Some(crate::parser::ast::AssertQuery::Inline(body)) => (None, Some(body.clone())),
				None => (None, None),
			};

			return Some(PositionContext::InExpression {
				enclosing_scope: Some(enclosing_scope.to_string()),
				assert_query_name,
				assert_query_body,
			});
		}
	}

	None
}

fn classify_setup(setup: &Option<SetupClause>, enclosing_scope: &str, _offset: usize) -> Option<PositionContext> {
	match setup {
		Some(SetupClause::Call { args, .. }) => args.iter().find_map(|value| {
			let expr = value_expr(value)?;
			if expr.span.contains(&_offset) {
				Some(PositionContext::InExpression { enclosing_scope: Some(enclosing_scope.to_string()), assert_query_name: None, assert_query_body: None })
			} else {
				None
			}
		}),
		_ => None,
	}
}

fn value_expr(value: &Value) -> Option<&ParenExpr> {
	match value {
		Value::Expr(expr) => Some(expr),
		Value::LiteralWhere(_, expr) => Some(expr),
		Value::Literal(_) => None,
	}
}

/// Falls back to a best-effort text scan when the position isn't inside any query body or
/// expression: figures out the DSL sub-context (scope/test/setup/assert) by looking at the
/// nearest enclosing brace depth in the raw text, and the dotted-prefix being typed by scanning
/// backwards over identifier/`.`/`$` characters.
struct InDslScan<'a> {
	source: &'a str,
	offset: usize,
}

impl<'a> InDslScan<'a> {
	fn new(source: &'a str, offset: usize) -> Self { Self { source, offset: offset.min(source.len()) } }

	fn finish(self) -> PositionContext {
		let before = &self.source[..self.offset];

		let dotted_prefix: String = before
			.chars()
			.rev()
			.take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.' || *c == '$')
			.collect::<Vec<_>>()
			.into_iter()
			.rev()
			.collect();

		let in_test = last_keyword_before(before, "test");
		let in_setup = last_keyword_before(before, "setup");
		let in_assert = last_keyword_before(before, "assert");
		let at_top_level = !before.contains('{') || before.matches('{').count() == before.matches('}').count();

		PositionContext::InDSL {
			in_scope: nearest_identifier_before(before, &["fn", "setup", "teardown"]),
			in_test,
			in_setup,
			in_assert,
			at_top_level,
			dotted_prefix,
		}
	}
}

fn last_keyword_before(before: &str, keyword: &str) -> bool {
	let Some(keyword_pos) = before.rfind(keyword) else { return false };

	let open_braces_after = before[keyword_pos..].matches('{').count();
	let close_braces_after = before[keyword_pos..].matches('}').count();

	open_braces_after > close_braces_after
}

fn nearest_identifier_before(before: &str, keywords: &[&str]) -> Option<String> {
	for keyword in keywords {
		if let Some(pos) = before.rfind(keyword) {
			let rest = before[pos + keyword.len()..].trim_start();
			let name: String = rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect();

			if !name.is_empty() {
				return Some(name);
			}
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::dsl::tokenize;
	use crate::parser::parse;
	use pretty_assertions::assert_eq;

	#[test]
	fn classifies_inside_a_query_body() {
		let source = r#"fn GetUser($id) `MATCH (u:User) RETURN u`"#;
		let (tokens, _) = tokenize(source);
		let (file, _) = parse(&tokens);

		let backtick_offset = source.find('`').unwrap();
		let context = classify(&file, source, backtick_offset + 5);

		match context {
			PositionContext::InQueryBody { enclosing_function, declared_params, .. } => {
				assert_eq!(enclosing_function.as_deref(), Some("GetUser"));
				assert_eq!(declared_params, vec!["id".to_string()]);
			}
			other => panic!("expected InQueryBody, got {other:?}"),
		}
	}

	#[test]
	fn classifies_inside_an_assert_condition() {
		let source = r#"
			fn GetUser() `RETURN 1 AS total`

			GetUser {
				test "t" {
					assert (1 == 1)
				}
			}
		"#;
		let (tokens, _) = tokenize(source);
		let (file, _) = parse(&tokens);

		let paren_offset = source.find("(1 == 1)").unwrap() + 2;
		let context = classify(&file, source, paren_offset);

		assert!(matches!(context, PositionContext::InExpression { .. }));
	}

	#[test]
	fn doc_offset_roundtrips_through_position() {
		let source = "line one\nline two\nline three";
		let offset = source.find("two").unwrap();
		let (line, character) = byte_offset_to_doc_position(source, offset);
		assert_eq!(doc_position_to_byte_offset(source, line, character), offset);
	}
}
