//! Hand-written recursive-descent parser for the scaf DSL with statement-boundary error
//! recovery (spec.md §4.B). Never fails outright: every mismatch records a diagnostic, skips to
//! the next synchronization point, and resumes, so callers always get a usable partial AST.

pub mod ast;

use crate::base_abstractions::{Diagnostic, DiagnosticKind, Span};
use crate::lexer::dsl::{Token, TokenKind};

/// Recovered-error cap (spec.md §4.B "Cap"): further errors abort the parse early.
const MAX_RECOVERED_ERRORS: usize = 50;

pub fn parse(tokens: &[Token]) -> (ast::File, Vec<Diagnostic>) {
	let mut parser = Parser::new(tokens);
	let file = parser.parse_file();
	(file, parser.diagnostics)
}

struct Parser<'a> {
	tokens: &'a [Token],
	pos: usize,
	diagnostics: Vec<Diagnostic>,
	recovered: usize,
	aborted: bool,
}

/// Keywords that double as synchronization points, in priority order (spec.md §4.B).
fn is_sync_keyword(kind: TokenKind) -> bool {
	matches!(
		kind,
		TokenKind::Import | TokenKind::Fn | TokenKind::Test | TokenKind::Group | TokenKind::Setup
			| TokenKind::Teardown | TokenKind::Assert
	)
}

impl<'a> Parser<'a> {
	fn new(tokens: &'a [Token]) -> Self {
		Self { tokens, pos: 0, diagnostics: Vec::new(), recovered: 0, aborted: false }
	}

	fn peek(&self) -> Option<&'a Token> { self.tokens.get(self.pos) }

	fn peek_kind(&self) -> Option<TokenKind> { self.peek().map(|t| t.kind) }

	fn at_eof(&self) -> bool { self.pos >= self.tokens.len() }

	fn bump(&mut self) -> Option<&'a Token> {
		let tok = self.tokens.get(self.pos);
		if tok.is_some() {
			self.pos += 1;
		}
		tok
	}

	fn cur_span(&self) -> Span {
		self.peek().map(|t| t.span.clone()).unwrap_or_else(|| self.end_span())
	}

	fn end_span(&self) -> Span {
		self.tokens.last().map(|t| t.span.end..t.span.end).unwrap_or(0..0)
	}

	fn expect(&mut self, kind: TokenKind, what: &str) -> Option<&'a Token> {
		if self.peek_kind() == Some(kind) {
			self.bump()
		} else {
			let span = self.cur_span();
			let actual = self.peek().map(|t| t.text.clone()).unwrap_or_else(|| "<eof>".to_string());
			self.error(span, format!("expected {what}, found '{actual}'"));
			None
		}
	}

	fn error(&mut self, span: Span, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic::error(DiagnosticKind::ParseError, span, message));
	}

	/// Skips forward, tracking `{}`/`()`/`[]` nesting, until a top-level sync keyword at depth 0
	/// or a matching close brace at depth 0 is found, or EOF (spec.md §4.B).
	fn recover(&mut self) {
		self.recovered += 1;
		if self.recovered > MAX_RECOVERED_ERRORS {
			self.aborted = true;
			self.pos = self.tokens.len();
			return;
		}

		// Always consume at least one token, so a bad token that is itself a sync keyword
		// doesn't cause an infinite loop.
		self.bump();

		let mut depth: i32 = 0;
		while let Some(tok) = self.peek() {
			match tok.kind {
				TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
				TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
					if depth == 0 {
						return;
					}
					depth -= 1;
				}
				_ if depth == 0 && is_sync_keyword(tok.kind) => return,
				_ => {}
			}
			self.bump();
		}
	}

	fn parse_file(&mut self) -> ast::File {
		let start = self.cur_span().start;
		let mut imports = Vec::new();
		let mut functions = Vec::new();
		let mut setup = None;
		let mut teardown = None;
		let mut scopes = Vec::new();

		while !self.at_eof() && !self.aborted {
			match self.peek_kind() {
				Some(TokenKind::Import) => imports.push(self.parse_import()),
				Some(TokenKind::Fn) => functions.push(self.parse_function()),
				Some(TokenKind::Setup) => {
					self.bump();
					setup = self.parse_setup_clause_body();
				}
				Some(TokenKind::Teardown) => {
					self.bump();
					teardown = self.parse_setup_clause_body();
				}
				Some(TokenKind::Identifier) => scopes.push(self.parse_function_scope()),
				_ => {
					let span = self.cur_span();
					let actual = self.peek().map(|t| t.text.clone()).unwrap_or_else(|| "<eof>".to_string());
					self.error(span, format!("unexpected token '{actual}' at top level"));
					self.recover();
				}
			}
		}

		let end = self.tokens.last().map(|t| t.span.end).unwrap_or(start);
		ast::File { imports, functions, setup, teardown, scopes, span: start..end }
	}

	fn parse_import(&mut self) -> ast::Import {
		let start = self.cur_span().start;
		self.bump(); // `import`
		let alias = self.expect(TokenKind::Identifier, "import alias").map(|t| t.text.clone()).unwrap_or_default();
		let path = self
			.expect(TokenKind::StringLiteral, "import path string")
			.map(|t| TokenKind::string_literal_value(&t.text))
			.unwrap_or_default();
		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::Import { alias, path, span: start..end, leading_comments: Vec::new() }
	}

	fn parse_function(&mut self) -> ast::Function {
		let start = self.cur_span().start;
		self.bump(); // `fn`
		let name_tok = self.expect(TokenKind::Identifier, "function name");
		let (name, name_span) = match name_tok {
			Some(t) => (t.text.clone(), t.span.clone()),
			None => (String::new(), start..start),
		};

		let mut params = Vec::new();
		if self.expect(TokenKind::LParen, "'('").is_some() {
			while self.peek_kind() != Some(TokenKind::RParen) && !self.at_eof() {
				params.push(self.parse_fn_param());
				if self.peek_kind() == Some(TokenKind::Comma) {
					self.bump();
				} else {
					break;
				}
			}
			self.expect(TokenKind::RParen, "')'");
		}

		let (body_raw_string, body_start, end) = match self.expect(TokenKind::RawString, "query body") {
			Some(tok) => {
				let body = TokenKind::raw_string_value(&tok.text).to_string();
				(body, tok.span.start, tok.span.end)
			}
			None => (String::new(), self.cur_span().start, self.cur_span().start),
		};

		ast::Function { name, name_span, params, body_raw_string, body_start, span: start..end, leading_comments: Vec::new() }
	}

	fn parse_fn_param(&mut self) -> ast::FnParam {
		let start = self.cur_span().start;
		let name = self.expect(TokenKind::Identifier, "parameter name").map(|t| t.text.clone()).unwrap_or_default();
		let mut type_expr = None;
		if self.peek_kind() == Some(TokenKind::Colon) {
			self.bump();
			type_expr = self.expect(TokenKind::Identifier, "parameter type").map(|t| t.text.clone());
		}
		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::FnParam { name, type_expr, span: start..end, leading_comments: Vec::new() }
	}

	fn parse_function_scope(&mut self) -> ast::FunctionScope {
		let start = self.cur_span().start;
		let function_name = self.bump().map(|t| t.text.clone()).unwrap_or_default();
		let mut setup = None;
		let mut teardown = None;
		let mut items = Vec::new();

		if self.expect(TokenKind::LBrace, "'{'").is_some() {
			while self.peek_kind() != Some(TokenKind::RBrace) && !self.at_eof() && !self.aborted {
				match self.peek_kind() {
					Some(TokenKind::Setup) => {
						self.bump();
						setup = self.parse_setup_clause_body();
					}
					Some(TokenKind::Teardown) => {
						self.bump();
						teardown = self.parse_setup_clause_body();
					}
					Some(TokenKind::Test) => items.push(ast::TestOrGroup::Test(self.parse_test())),
					Some(TokenKind::Group) => items.push(ast::TestOrGroup::Group(self.parse_group())),
					_ => {
						let span = self.cur_span();
						self.error(span, "expected 'test', 'group', 'setup' or 'teardown'");
						self.recover();
					}
				}
			}
			self.expect(TokenKind::RBrace, "'}'");
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::FunctionScope { function_name, setup, teardown, items, span: start..end }
	}

	fn parse_test(&mut self) -> ast::Test {
		let start = self.cur_span().start;
		self.bump(); // `test`
		let name = self
			.expect(TokenKind::StringLiteral, "test name string")
			.map(|t| TokenKind::string_literal_value(&t.text))
			.unwrap_or_default();
		let mut setup = None;
		let mut statements = Vec::new();
		let mut asserts = Vec::new();

		if self.expect(TokenKind::LBrace, "'{'").is_some() {
			while self.peek_kind() != Some(TokenKind::RBrace) && !self.at_eof() && !self.aborted {
				match self.peek_kind() {
					Some(TokenKind::Setup) => {
						self.bump();
						setup = self.parse_setup_clause_body();
					}
					Some(TokenKind::Assert) => asserts.push(self.parse_assert()),
					Some(TokenKind::Dollar) | Some(TokenKind::Identifier) => statements.push(self.parse_statement()),
					_ => {
						let span = self.cur_span();
						self.error(span, "expected a statement or 'assert'");
						self.recover();
					}
				}
			}
			self.expect(TokenKind::RBrace, "'}'");
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::Test { name, setup, statements, asserts, span: start..end, leading_comments: Vec::new() }
	}

	fn parse_group(&mut self) -> ast::Group {
		let start = self.cur_span().start;
		self.bump(); // `group`
		let name = self
			.expect(TokenKind::StringLiteral, "group name string")
			.map(|t| TokenKind::string_literal_value(&t.text))
			.unwrap_or_default();
		let mut setup = None;
		let mut teardown = None;
		let mut items = Vec::new();

		if self.expect(TokenKind::LBrace, "'{'").is_some() {
			while self.peek_kind() != Some(TokenKind::RBrace) && !self.at_eof() && !self.aborted {
				match self.peek_kind() {
					Some(TokenKind::Setup) => {
						self.bump();
						setup = self.parse_setup_clause_body();
					}
					Some(TokenKind::Teardown) => {
						self.bump();
						teardown = self.parse_setup_clause_body();
					}
					Some(TokenKind::Test) => items.push(ast::TestOrGroup::Test(self.parse_test())),
					Some(TokenKind::Group) => items.push(ast::TestOrGroup::Group(self.parse_group())),
					_ => {
						let span = self.cur_span();
						self.error(span, "expected 'test' or 'group'");
						self.recover();
					}
				}
			}
			self.expect(TokenKind::RBrace, "'}'");
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::Group { name, setup, teardown, items, span: start..end, leading_comments: Vec::new() }
	}

	fn parse_statement(&mut self) -> ast::Statement {
		let start = self.cur_span().start;
		let key = self.parse_dotted_ident();
		self.expect(TokenKind::Colon, "':'");
		let value = self.parse_value();
		if self.peek_kind() == Some(TokenKind::Semicolon) {
			self.bump();
		}
		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::Statement { key, value, span: start..end }
	}

	fn parse_dotted_ident(&mut self) -> ast::DottedIdent {
		let start = self.cur_span().start;
		let is_parameter = self.peek_kind() == Some(TokenKind::Dollar);
		if is_parameter {
			self.bump();
		}
		let mut segments = Vec::new();
		if let Some(tok) = self.expect(TokenKind::Identifier, "identifier") {
			segments.push(tok.text.clone());
		}
		while self.peek_kind() == Some(TokenKind::Dot) {
			self.bump();
			if let Some(tok) = self.expect(TokenKind::Identifier, "identifier") {
				segments.push(tok.text.clone());
			}
		}
		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::DottedIdent { is_parameter, segments, span: start..end }
	}

	fn parse_value(&mut self) -> ast::Value {
		if self.peek_kind() == Some(TokenKind::LParen) {
			let expr = self.parse_paren_expr();
			return ast::Value::Expr(expr);
		}

		let literal = self.parse_literal();
		if self.peek_kind() == Some(TokenKind::Where) {
			self.bump();
			let expr = self.parse_paren_expr();
			return ast::Value::LiteralWhere(literal, expr);
		}
		ast::Value::Literal(literal)
	}

	fn parse_literal(&mut self) -> ast::Literal {
		match self.peek_kind() {
			Some(TokenKind::StringLiteral) => {
				let text = self.bump().unwrap().text.clone();
				ast::Literal::String(TokenKind::string_literal_value(&text))
			}
			Some(TokenKind::Number) => {
				let text = self.bump().unwrap().text.clone();
				if text.contains('.') {
					ast::Literal::Float(text.parse().unwrap_or(0.0))
				} else {
					ast::Literal::Int(text.parse().unwrap_or(0))
				}
			}
			Some(TokenKind::Identifier) => {
				let tok = self.bump().unwrap();
				let (text, span) = (tok.text.clone(), tok.span.clone());
				match text.as_str() {
					"true" => ast::Literal::Bool(true),
					"false" => ast::Literal::Bool(false),
					"null" => ast::Literal::Null,
					_ => {
						self.error(span, format!("expected a literal, found '{text}'"));
						ast::Literal::Null
					}
				}
			}
			_ => {
				let span = self.cur_span();
				self.error(span, "expected a literal value");
				ast::Literal::Null
			}
		}
	}

	/// Consumes a balanced `(...)` run, recording its tokens verbatim — never re-parsed beyond
	/// bracket balance (spec.md §3 `ParenExpr`).
	fn parse_paren_expr(&mut self) -> ast::ParenExpr {
		let start = self.cur_span().start;
		let mut tokens = Vec::new();
		let mut depth = 0i32;

		if self.peek_kind() == Some(TokenKind::LParen) {
			tokens.push(self.bump().unwrap().clone());
			depth = 1;
		}

		while depth > 0 {
			match self.peek_kind() {
				Some(TokenKind::LParen) => depth += 1,
				Some(TokenKind::RParen) => depth -= 1,
				None => break,
				_ => {}
			}
			if let Some(tok) = self.bump() {
				tokens.push(tok.clone());
			} else {
				break;
			}
		}

		let end = tokens.last().map(|t| t.span.end).unwrap_or(start);
		ast::ParenExpr { tokens, span: start..end }
	}

	fn parse_assert(&mut self) -> ast::Assert {
		let start = self.cur_span().start;
		self.bump(); // `assert`

		let mut query_ref = None;
		if self.peek_kind() == Some(TokenKind::RawString) {
			let text = self.bump().unwrap().text.clone();
			query_ref = Some(ast::AssertQuery::Inline(TokenKind::raw_string_value(&text).to_string()));
		} else if self.peek_kind() == Some(TokenKind::Identifier) {
			let first = self.bump().unwrap().text.clone();
			if self.peek_kind() == Some(TokenKind::Dot) {
				self.bump();
				let name = self.expect(TokenKind::Identifier, "query name").map(|t| t.text.clone()).unwrap_or_default();
				query_ref = Some(ast::AssertQuery::Named { module: Some(first), name });
			} else {
				query_ref = Some(ast::AssertQuery::Named { module: None, name: first });
			}
		}

		let mut conditions = Vec::new();
		if self.peek_kind() == Some(TokenKind::LBrace) {
			self.bump();
			while self.peek_kind() == Some(TokenKind::LParen) {
				conditions.push(self.parse_paren_expr());
			}
			self.expect(TokenKind::RBrace, "'}'");
		} else if self.peek_kind() == Some(TokenKind::LParen) {
			conditions.push(self.parse_paren_expr());
		} else {
			let span = self.cur_span();
			self.error(span, "expected an assert condition");
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ast::Assert { query_ref, conditions, span: start..end }
	}

	/// `setup`/`teardown` bodies: a module reference, an inline query, a block of nested
	/// clauses, or a `module.query(args)` call.
	fn parse_setup_clause_body(&mut self) -> Option<ast::SetupClause> {
		match self.peek_kind() {
			Some(TokenKind::RawString) => {
				let text = self.bump().unwrap().text.clone();
				Some(ast::SetupClause::InlineQuery(TokenKind::raw_string_value(&text).to_string()))
			}
			Some(TokenKind::LBrace) => {
				self.bump();
				let mut items = Vec::new();
				while self.peek_kind() != Some(TokenKind::RBrace) && !self.at_eof() && !self.aborted {
					match self.parse_setup_clause_body() {
						Some(item) => items.push(item),
						None => break,
					}
				}
				self.expect(TokenKind::RBrace, "'}'");
				Some(ast::SetupClause::Block(items))
			}
			Some(TokenKind::Identifier) => {
				let first = self.bump().unwrap().text.clone();
				if self.peek_kind() == Some(TokenKind::Dot) {
					self.bump();
					let query = self.expect(TokenKind::Identifier, "query name").map(|t| t.text.clone()).unwrap_or_default();
					let mut args = Vec::new();
					if self.peek_kind() == Some(TokenKind::LParen) {
						self.bump();
						while self.peek_kind() != Some(TokenKind::RParen) && !self.at_eof() {
							args.push(self.parse_value());
							if self.peek_kind() == Some(TokenKind::Comma) {
								self.bump();
							} else {
								break;
							}
						}
						self.expect(TokenKind::RParen, "')'");
					}
					Some(ast::SetupClause::Call { module: first, query, args })
				} else {
					Some(ast::SetupClause::ModuleRef(first))
				}
			}
			_ => {
				let span = self.cur_span();
				self.error(span, "expected a setup/teardown clause");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::dsl::tokenize;
	use pretty_assertions::assert_eq;

	fn parse_source(source: &str) -> (ast::File, Vec<Diagnostic>) {
		let (tokens, _trivia) = tokenize(source);
		parse(&tokens)
	}

	#[test]
	fn parses_import_and_function() {
		let (file, diags) = parse_source(r#"import a "./a" fn GetUser() `MATCH (u:User) RETURN u`"#);
		assert!(diags.is_empty());
		assert_eq!(file.imports.len(), 1);
		assert_eq!(file.imports[0].alias, "a");
		assert_eq!(file.imports[0].path, "./a");
		assert_eq!(file.functions.len(), 1);
		assert_eq!(file.functions[0].name, "GetUser");
		assert_eq!(file.functions[0].body_raw_string, "MATCH (u:User) RETURN u");
	}

	#[test]
	fn parses_function_scope_with_statement_and_assert() {
		let source = r#"
fn GetUser() `MATCH (u:User) RETURN u`
GetUser { test "t" { assert (u.age > 0) } }
"#;
		let (file, diags) = parse_source(source);
		assert!(diags.is_empty());
		assert_eq!(file.scopes.len(), 1);
		let scope = &file.scopes[0];
		assert_eq!(scope.function_name, "GetUser");
		assert_eq!(scope.items.len(), 1);
		let ast::TestOrGroup::Test(test) = &scope.items[0] else { panic!("expected test") };
		assert_eq!(test.name, "t");
		assert_eq!(test.asserts.len(), 1);
	}

	#[test]
	fn recovers_from_malformed_function_and_keeps_parsing() {
		let source = "import a \"./a\"\nfn ???\ntest \"t\" { $x: 1 }";
		let (file, diags) = parse_source(source);
		assert_eq!(file.imports.len(), 1);
		assert_eq!(file.functions.len(), 0);
		assert_eq!(file.scopes.len(), 0);
		assert!(!diags.is_empty());
		assert!(diags.len() <= MAX_RECOVERED_ERRORS);
	}

	#[test]
	fn parses_dotted_statement_keys_and_literal_values() {
		let source = r#"
fn GetUser() `MATCH (u:User) RETURN u.name AS name`
GetUser { test "t" { $id: 1 u.name: "bob" } }
"#;
		let (file, diags) = parse_source(source);
		assert!(diags.is_empty());
		let ast::TestOrGroup::Test(test) = &file.scopes[0].items[0] else { panic!("expected test") };
		assert_eq!(test.statements[0].key.text(), "$id");
		assert_eq!(test.statements[1].key.text(), "u.name");
		assert_eq!(test.statements[1].value, ast::Value::Literal(ast::Literal::String("bob".to_string())));
	}
}
