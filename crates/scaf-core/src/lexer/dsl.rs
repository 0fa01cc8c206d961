//! Hand-written lexer for the outer scaf DSL (spec.md §4.A).
//!
//! Recognizes identifiers, numbers, double-quoted strings with escapes, backtick-delimited raw
//! strings (no escapes, may span lines — this is the query-body literal), the DSL's punctuation
//! set, and its keyword set. Whitespace and comments are lexed too, then split out as [`Trivia`]
//! so the parser never sees them.

use logos::Logos;

use super::{advance_line_col, LineCol, Trivia, TriviaKind};
use crate::base_abstractions::Span;

pub type Token = super::Token<TokenKind>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	#[token("import")]
	Import,
	#[token("fn")]
	Fn,
	#[token("setup")]
	Setup,
	#[token("teardown")]
	Teardown,
	#[token("test")]
	Test,
	#[token("group")]
	Group,
	#[token("assert")]
	Assert,
	#[token("where")]
	Where,

	#[token("{")]
	LBrace,
	#[token("}")]
	RBrace,
	#[token("(")]
	LParen,
	#[token(")")]
	RParen,
	#[token("[")]
	LBracket,
	#[token("]")]
	RBracket,
	#[token(",")]
	Comma,
	#[token(";")]
	Semicolon,
	#[token(":")]
	Colon,
	#[token(".")]
	Dot,
	#[token("$")]
	Dollar,
	#[token("=")]
	Equals,

	#[regex("[A-Za-z_][A-Za-z0-9_]*")]
	Identifier,

	#[regex("[0-9]+(\\.[0-9]+)?")]
	Number,

	#[regex(r#""([^"\\]|\\.)*""#)]
	StringLiteral,

	/// The value excludes the backticks; the span includes them — load-bearing for query-body
	/// coordinate mapping (spec.md §4.A).
	#[regex(r"`[^`]*`")]
	RawString,

	#[regex("//[^\n]*")]
	LineComment,

	#[regex(r"/\*([^*]|\*[^/])*\*/")]
	BlockComment,

	#[regex("[ \t\r\n]+")]
	Whitespace,

	#[error]
	Error,
}

impl TokenKind {
	pub fn is_trivia(self) -> bool {
		matches!(self, TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment)
	}

	/// The raw-string literal's value with its delimiting backticks stripped.
	pub fn raw_string_value(text: &str) -> &str {
		text.strip_prefix('`').and_then(|s| s.strip_suffix('`')).unwrap_or(text)
	}

	/// `"..."` unescaped to the string's real contents (`\"` and `\\` and `\n` only).
	pub fn string_literal_value(text: &str) -> String {
		let inner = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text);
		let mut out = String::with_capacity(inner.len());
		let mut chars = inner.chars();
		while let Some(c) = chars.next() {
			if c == '\\' {
				match chars.next() {
					Some('n') => out.push('\n'),
					Some('t') => out.push('\t'),
					Some(other) => out.push(other),
					None => {}
				}
			} else {
				out.push(c);
			}
		}
		out
	}
}

pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Trivia>) {
	let mut tokens = Vec::new();
	let mut trivia = Vec::new();
	let mut pos = LineCol::default();

	let mut lexer = TokenKind::lexer(source);
	while let Some(kind) = lexer.next() {
		let span: Span = lexer.span();
		let text = lexer.slice().to_string();
		let start = pos;

		if kind.is_trivia() {
			let trivia_kind = match kind {
				TokenKind::Whitespace => TriviaKind::Whitespace,
				TokenKind::LineComment => TriviaKind::LineComment,
				TokenKind::BlockComment => TriviaKind::BlockComment,
				_ => unreachable!(),
			};
			advance_line_col(&mut pos, &text);
			trivia.push(Trivia { kind: trivia_kind, text, span, precedes_token: tokens.len() });
			continue;
		}

		advance_line_col(&mut pos, &text);
		tokens.push(Token { kind, text, span, start });
	}

	(tokens, trivia)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn lexes_keywords_and_punctuation() {
		let (tokens, _) = tokenize("import a \"./a\"");
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
		assert_eq!(kinds, vec![TokenKind::Import, TokenKind::Identifier, TokenKind::StringLiteral]);
	}

	#[test]
	fn raw_string_spans_multiple_lines_and_keeps_backticks_in_span() {
		let source = "fn Q() `MATCH (n)\nRETURN n`";
		let (tokens, _) = tokenize(source);
		let raw = tokens.iter().find(|t| t.kind == TokenKind::RawString).unwrap();
		assert_eq!(&source[raw.span.clone()], "`MATCH (n)\nRETURN n`");
		assert_eq!(TokenKind::raw_string_value(&raw.text), "MATCH (n)\nRETURN n");
	}

	#[test]
	fn whitespace_and_comments_become_trivia_not_tokens() {
		let (tokens, trivia) = tokenize("fn // a comment\n Q");
		assert_eq!(tokens.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![TokenKind::Fn, TokenKind::Identifier]);
		assert!(trivia.iter().any(|t| t.kind == TriviaKind::LineComment));
	}

	#[test]
	fn string_literal_escapes() {
		assert_eq!(TokenKind::string_literal_value(r#""a\"b\nc""#), "a\"b\nc");
	}
}
