//! Lexer for Cypher query bodies (spec.md §4.A). Hand-written on `logos`, same shape as the DSL
//! lexer: trivia (whitespace, comments) is split out of the token stream rather than skipped
//! outright, since the query-body LSP surface wants comment-aware completion context later.

use logos::Logos;

use super::{advance_line_col, LineCol, Trivia, TriviaKind};
use crate::base_abstractions::Span;

pub type Token = super::Token<TokenKind>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	#[token("MATCH")]
	#[token("match")]
	Match,
	#[token("OPTIONAL")]
	#[token("optional")]
	Optional,
	#[token("RETURN")]
	#[token("return")]
	Return,
	#[token("WHERE")]
	#[token("where")]
	Where,
	#[token("AS")]
	#[token("as")]
	As,
	#[token("WITH")]
	#[token("with")]
	With,
	#[token("ORDER")]
	#[token("order")]
	Order,
	#[token("BY")]
	#[token("by")]
	By,
	#[token("ASC")]
	#[token("asc")]
	Asc,
	#[token("DESC")]
	#[token("desc")]
	Desc,
	#[token("SKIP")]
	#[token("skip")]
	Skip,
	#[token("LIMIT")]
	#[token("limit")]
	Limit,
	#[token("UNWIND")]
	#[token("unwind")]
	Unwind,
	#[token("CREATE")]
	#[token("create")]
	Create,
	#[token("MERGE")]
	#[token("merge")]
	Merge,
	#[token("SET")]
	#[token("set")]
	Set,
	#[token("DELETE")]
	#[token("delete")]
	Delete,
	#[token("DETACH")]
	#[token("detach")]
	Detach,
	#[token("REMOVE")]
	#[token("remove")]
	Remove,
	#[token("DISTINCT")]
	#[token("distinct")]
	Distinct,

	#[token("AND")]
	#[token("and")]
	And,
	#[token("OR")]
	#[token("or")]
	Or,
	#[token("XOR")]
	#[token("xor")]
	Xor,
	#[token("NOT")]
	#[token("not")]
	Not,
	#[token("IN")]
	#[token("in")]
	In,
	#[token("IS")]
	#[token("is")]
	Is,
	#[token("NULL")]
	#[token("null")]
	Null,
	#[token("TRUE")]
	#[token("true")]
	True,
	#[token("FALSE")]
	#[token("false")]
	False,
	#[token("CASE")]
	#[token("case")]
	Case,
	#[token("WHEN")]
	#[token("when")]
	When,
	#[token("THEN")]
	#[token("then")]
	Then,
	#[token("ELSE")]
	#[token("else")]
	Else,
	#[token("END")]
	#[token("end")]
	End,
	#[token("ALL")]
	#[token("all")]
	All,
	#[token("ANY")]
	#[token("any")]
	Any,
	#[token("NONE")]
	#[token("none")]
	None,
	#[token("SINGLE")]
	#[token("single")]
	Single,
	#[token("EXISTS")]
	#[token("exists")]
	Exists,
	#[token("STARTS")]
	#[token("starts")]
	Starts,
	#[token("ENDS")]
	#[token("ends")]
	Ends,
	#[token("CONTAINS")]
	#[token("contains")]
	Contains,

	#[regex("[A-Za-z_][A-Za-z0-9_]*")]
	Identifier,

	#[regex("[0-9]+\\.[0-9]+")]
	FloatLiteral,
	#[regex("[0-9]+")]
	IntLiteral,
	#[regex(r#""([^"\\]|\\.)*""#)]
	StringLiteral,
	#[regex(r"'([^'\\]|\\.)*'")]
	StringLiteralSingle,

	#[token("(")]
	LParen,
	#[token(")")]
	RParen,
	#[token("[")]
	LBracket,
	#[token("]")]
	RBracket,
	#[token("{")]
	LBrace,
	#[token("}")]
	RBrace,
	#[token(",")]
	Comma,
	#[token(".")]
	Dot,
	#[token("..")]
	DotDot,
	#[token(":")]
	Colon,
	#[token("|")]
	Pipe,
	#[token("$")]
	Dollar,

	#[token("+")]
	Plus,
	#[token("-")]
	Minus,
	#[token("*")]
	Star,
	#[token("/")]
	Slash,
	#[token("%")]
	Percent,
	#[token("^")]
	Caret,

	#[token("=")]
	Eq,
	#[token("<>")]
	Neq,
	#[token("<=")]
	Lte,
	#[token(">=")]
	Gte,
	#[token("<")]
	Lt,
	#[token(">")]
	Gt,

	#[token("->")]
	ArrowRight,
	#[token("<-")]
	ArrowLeft,

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

	pub fn is_keyword(self) -> bool {
		use TokenKind::*;
		matches!(
			self,
			Match | Optional | Return | Where | As | With | Order | By | Asc | Desc | Skip | Limit
				| Unwind | Create | Merge | Set | Delete | Detach | Remove | Distinct | And | Or | Xor
				| Not | In | Is | Null | True | False | Case | When | Then | Else | End | All | Any
				| None | Single | Exists | Starts | Ends | Contains
		)
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
	fn lexes_a_match_return_query() {
		let (tokens, _) = tokenize("MATCH (u:User) RETURN u.name AS name");
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
		assert_eq!(
			kinds,
			vec![
				TokenKind::Match,
				TokenKind::LParen,
				TokenKind::Identifier,
				TokenKind::Colon,
				TokenKind::Identifier,
				TokenKind::RParen,
				TokenKind::Return,
				TokenKind::Identifier,
				TokenKind::Dot,
				TokenKind::Identifier,
				TokenKind::As,
				TokenKind::Identifier,
			]
		);
	}

	#[test]
	fn relationship_arrow_and_brackets() {
		let (tokens, _) = tokenize("(p)-[:FRIENDS]->(q)");
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
		assert!(kinds.contains(&TokenKind::Minus));
		assert!(kinds.contains(&TokenKind::LBracket));
		assert!(kinds.contains(&TokenKind::ArrowRight));
	}

	#[test]
	fn numbers_distinguish_int_and_float() {
		let (tokens, _) = tokenize("1 2.5");
		assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
		assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
	}
}
