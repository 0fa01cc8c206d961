//! Leading-comment attachment (spec.md §4.B): after parsing, walks the AST and attaches the run
//! of trivia ending immediately before each node's first token as `leading_comments`, stopping
//! the run at the first blank line.

use crate::lexer::dsl::Token;
use crate::lexer::{Trivia, TriviaKind};
use crate::parser::ast;

pub fn attach_leading_comments(file: &mut ast::File, tokens: &[Token], trivia: &[Trivia]) {
	let token_index_by_start: std::collections::HashMap<usize, usize> =
		tokens.iter().enumerate().map(|(i, t)| (t.span.start, i)).collect();

	for import in &mut file.imports {
		set_comments(&mut import.leading_comments, import.span.start, &token_index_by_start, trivia);
	}
	for function in &mut file.functions {
		set_comments(&mut function.leading_comments, function.span.start, &token_index_by_start, trivia);
		for param in &mut function.params {
			set_comments(&mut param.leading_comments, param.span.start, &token_index_by_start, trivia);
		}
	}
	for scope in &mut file.scopes {
		for item in &mut scope.items {
			attach_to_item(item, &token_index_by_start, trivia);
		}
	}
}

fn attach_to_item(item: &mut ast::TestOrGroup, token_index_by_start: &std::collections::HashMap<usize, usize>, trivia: &[Trivia]) {
	match item {
		ast::TestOrGroup::Test(test) => {
			set_comments(&mut test.leading_comments, test.span.start, token_index_by_start, trivia);
		}
		ast::TestOrGroup::Group(group) => {
			set_comments(&mut group.leading_comments, group.span.start, token_index_by_start, trivia);
			for sub in &mut group.items {
				attach_to_item(sub, token_index_by_start, trivia);
			}
		}
	}
}

fn set_comments(
	out: &mut ast::LeadingComments,
	span_start: usize,
	token_index_by_start: &std::collections::HashMap<usize, usize>,
	trivia: &[Trivia],
) {
	let Some(&token_index) = token_index_by_start.get(&span_start) else { return };
	*out = collect_leading_comments(token_index, trivia);
}

fn collect_leading_comments(token_index: usize, trivia: &[Trivia]) -> ast::LeadingComments {
	let run: Vec<&Trivia> = trivia.iter().filter(|t| t.precedes_token == token_index).collect();
	let mut comments = Vec::new();

	for t in run.iter().rev() {
		match t.kind {
			TriviaKind::Whitespace => {
				if t.text.matches('\n').count() >= 2 {
					break;
				}
			}
			TriviaKind::LineComment | TriviaKind::BlockComment => comments.push(t.text.clone()),
		}
	}

	comments.reverse();
	comments
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::dsl::tokenize;
	use crate::parser::parse;
	use pretty_assertions::assert_eq;

	#[test]
	fn attaches_a_comment_directly_above_a_function() {
		let source = "// fetches a user by id\nfn GetUser() `RETURN 1`";
		let (tokens, trivia) = tokenize(source);
		let (mut file, _) = parse(&tokens);
		attach_leading_comments(&mut file, &tokens, &trivia);
		assert_eq!(file.functions[0].leading_comments, vec!["// fetches a user by id".to_string()]);
	}

	#[test]
	fn does_not_attach_across_a_blank_line() {
		let source = "// stale comment\n\nfn GetUser() `RETURN 1`";
		let (tokens, trivia) = tokenize(source);
		let (mut file, _) = parse(&tokens);
		attach_leading_comments(&mut file, &tokens, &trivia);
		assert!(file.functions[0].leading_comments.is_empty());
	}
}
