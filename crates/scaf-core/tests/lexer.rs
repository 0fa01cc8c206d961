use pretty_assertions::assert_eq;
use scaf_core::lexer::dsl::{tokenize, TokenKind};
use scaf_core::lexer::cypher::{tokenize as tokenize_cypher, TokenKind as CypherTokenKind};

#[test]
fn lexes_a_function_definition_with_a_raw_string_body() {
	let (tokens, _) = tokenize(r#"fn GetUser($id) `MATCH (u:User) RETURN u`"#);
	let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
	assert_eq!(
		kinds,
		vec![
			TokenKind::Fn,
			TokenKind::Identifier,
			TokenKind::LParen,
			TokenKind::Dollar,
			TokenKind::Identifier,
			TokenKind::RParen,
			TokenKind::RawString,
		]
	);
}

#[test]
fn splits_trivia_out_of_the_token_stream() {
	let (tokens, trivia) = tokenize("fn A() `RETURN 1` // trailing\n");
	assert!(!tokens.is_empty());
	assert!(trivia.iter().any(|t| t.text.contains("trailing")));
}

#[test]
fn cypher_lexer_distinguishes_keywords_from_identifiers() {
	let (tokens, _) = tokenize_cypher("MATCH (match_count:Counter)");
	assert_eq!(tokens[0].kind, CypherTokenKind::Match);
	assert_eq!(tokens[2].kind, CypherTokenKind::Identifier);
}
