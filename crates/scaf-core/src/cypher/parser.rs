//! Recursive-descent parser for the supported Cypher subset (spec.md §4.C). Best-effort: a
//! malformed clause is recorded as a `syntax-error` diagnostic and skipped rather than aborting
//! the whole query, since the analyzer must always return a usable `QueryMetadata`.

use super::ast::*;
use crate::base_abstractions::{Diagnostic, DiagnosticKind, Span};
use crate::lexer::cypher::{Token, TokenKind};

pub fn parse(tokens: &[Token]) -> (Query, Vec<Diagnostic>) {
	let mut parser = Parser { tokens, pos: 0, diagnostics: Vec::new() };
	let query = parser.parse_query();
	(query, parser.diagnostics)
}

struct Parser<'a> {
	tokens: &'a [Token],
	pos: usize,
	diagnostics: Vec<Diagnostic>,
}

fn is_clause_keyword(kind: TokenKind) -> bool {
	use TokenKind::*;
	matches!(kind, Match | Optional | Where | Return | With | Create | Merge | Set | Delete | Detach | Remove | Unwind | Order | Limit | Skip)
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<&'a Token> { self.tokens.get(self.pos) }

	fn peek_kind(&self) -> Option<TokenKind> { self.peek().map(|t| t.kind) }

	fn peek_at(&self, offset: usize) -> Option<TokenKind> { self.tokens.get(self.pos + offset).map(|t| t.kind) }

	fn bump(&mut self) -> Option<&'a Token> {
		let t = self.tokens.get(self.pos);
		if t.is_some() {
			self.pos += 1;
		}
		t
	}

	fn at(&self, kind: TokenKind) -> bool { self.peek_kind() == Some(kind) }

	fn eat(&mut self, kind: TokenKind) -> bool {
		if self.at(kind) {
			self.bump();
			true
		} else {
			false
		}
	}

	fn cur_span(&self) -> Span {
		self.peek().map(|t| t.span.clone()).unwrap_or_else(|| self.tokens.last().map(|t| t.span.end..t.span.end).unwrap_or(0..0))
	}

	fn syntax_error(&mut self, span: Span, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic::error(DiagnosticKind::SyntaxError, span, message));
	}

	fn parse_query(&mut self) -> Query {
		let start = self.cur_span().start;
		let mut clauses = Vec::new();
		while !self.at_eof() {
			clauses.push(self.parse_clause());
		}
		let end = self.tokens.last().map(|t| t.span.end).unwrap_or(start);
		Query { clauses, span: start..end }
	}

	fn at_eof(&self) -> bool { self.pos >= self.tokens.len() }

	fn parse_clause(&mut self) -> Clause {
		let start = self.cur_span().start;
		match self.peek_kind() {
			Some(TokenKind::Optional) => {
				self.bump();
				self.eat(TokenKind::Match);
				self.parse_match(start, true)
			}
			Some(TokenKind::Match) => {
				self.bump();
				self.parse_match(start, false)
			}
			Some(TokenKind::Where) => {
				self.bump();
				let expr = self.parse_expr();
				let end = expr.span().end;
				Clause::Where { expr, span: start..end }
			}
			Some(TokenKind::Return) => {
				self.bump();
				self.parse_return(start)
			}
			_ => {
				// Unrecognized / unanalyzed clause: skip to the next clause keyword.
				while !self.at_eof() && !is_clause_keyword(self.peek_kind().unwrap()) {
					self.bump();
				}
				let end = self.cur_span().start;
				Clause::Unparsed { span: start..end }
			}
		}
	}

	fn parse_match(&mut self, start: usize, optional: bool) -> Clause {
		let mut patterns = vec![self.parse_pattern()];
		while self.eat(TokenKind::Comma) {
			patterns.push(self.parse_pattern());
		}
		let end = patterns.last().map(|p| p.span.end).unwrap_or(start);
		Clause::Match { optional, patterns, span: start..end }
	}

	fn parse_pattern(&mut self) -> Pattern {
		let start = self.cur_span().start;
		let mut nodes = vec![self.parse_node_pattern()];
		let mut relationships = Vec::new();

		while self.at(TokenKind::Minus) || self.at(TokenKind::ArrowLeft) {
			relationships.push(self.parse_rel_pattern());
			nodes.push(self.parse_node_pattern());
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		Pattern { nodes, relationships, span: start..end }
	}

	fn parse_node_pattern(&mut self) -> NodePattern {
		let start = self.cur_span().start;
		if !self.eat(TokenKind::LParen) {
			self.syntax_error(self.cur_span(), "expected '(' to start a node pattern");
			return NodePattern { variable: None, labels: Vec::new(), properties: Vec::new(), span: start..start };
		}

		let variable = if self.at(TokenKind::Identifier) { Some(self.bump().unwrap().text.clone()) } else { None };

		let mut labels = Vec::new();
		while self.eat(TokenKind::Colon) {
			if let Some(tok) = self.peek() {
				if tok.kind == TokenKind::Identifier {
					labels.push(self.bump().unwrap().text.clone());
					continue;
				}
			}
			break;
		}

		let mut properties = Vec::new();
		if self.eat(TokenKind::LBrace) {
			properties = self.parse_property_map();
			if !self.eat(TokenKind::RBrace) {
				self.syntax_error(self.cur_span(), "expected '}' to close property map");
			}
		}

		if !self.eat(TokenKind::RParen) {
			self.syntax_error(self.cur_span(), "expected ')' to close node pattern");
		}

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		NodePattern { variable, labels, properties, span: start..end }
	}

	fn parse_property_map(&mut self) -> Vec<(String, Expr)> {
		let mut props = Vec::new();
		while self.at(TokenKind::Identifier) {
			let name = self.bump().unwrap().text.clone();
			if !self.eat(TokenKind::Colon) {
				self.syntax_error(self.cur_span(), "expected ':' in property map");
				break;
			}
			let value = self.parse_expr();
			props.push((name, value));
			if !self.eat(TokenKind::Comma) {
				break;
			}
		}
		props
	}

	fn parse_rel_pattern(&mut self) -> RelPattern {
		let start = self.cur_span().start;
		let leftward = self.eat(TokenKind::ArrowLeft);
		if !leftward {
			self.eat(TokenKind::Minus);
		}

		let mut variable = None;
		let mut rel_types = Vec::new();
		if self.eat(TokenKind::LBracket) {
			if self.at(TokenKind::Identifier) {
				variable = Some(self.bump().unwrap().text.clone());
			}
			while self.eat(TokenKind::Colon) {
				if self.at(TokenKind::Identifier) {
					rel_types.push(self.bump().unwrap().text.clone());
				}
				if !self.eat(TokenKind::Pipe) {
					break;
				}
			}
			if !self.eat(TokenKind::RBracket) {
				self.syntax_error(self.cur_span(), "expected ']' to close relationship pattern");
			}
		}

		let rightward = self.eat(TokenKind::ArrowRight);
		if !leftward && !rightward {
			self.eat(TokenKind::Minus);
		}

		let direction = match (leftward, rightward) {
			(true, false) => RelDirection::Incoming,
			(false, true) => RelDirection::Outgoing,
			_ => RelDirection::Either,
		};

		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		RelPattern { variable, rel_types, direction, span: start..end }
	}

	fn parse_return(&mut self, start: usize) -> Clause {
		let distinct = self.eat(TokenKind::Distinct);
		let mut items = vec![self.parse_return_item()];
		while self.eat(TokenKind::Comma) {
			items.push(self.parse_return_item());
		}
		let end = items.last().map(|i| i.span.end).unwrap_or(start);
		Clause::Return { distinct, items, span: start..end }
	}

	fn parse_return_item(&mut self) -> ReturnItem {
		let start = self.cur_span().start;
		let expr = self.parse_expr();
		let alias = if self.eat(TokenKind::As) {
			if self.at(TokenKind::Identifier) { Some(self.bump().unwrap().text.clone()) } else { None }
		} else {
			None
		};
		let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
		ReturnItem { expr, alias, span: start..end }
	}

	// --- expression grammar, bottom-up per spec.md §4.C ---

	pub(crate) fn parse_expr(&mut self) -> Expr { self.parse_or() }

	fn parse_or(&mut self) -> Expr {
		let mut lhs = self.parse_xor();
		while self.eat(TokenKind::Or) {
			let rhs = self.parse_xor();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op: BinOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_xor(&mut self) -> Expr {
		let mut lhs = self.parse_and();
		while self.eat(TokenKind::Xor) {
			let rhs = self.parse_and();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op: BinOp::Xor, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_and(&mut self) -> Expr {
		let mut lhs = self.parse_not();
		while self.eat(TokenKind::And) {
			let rhs = self.parse_not();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_not(&mut self) -> Expr {
		if self.eat(TokenKind::Not) {
			let start = self.tokens[self.pos - 1].span.start;
			let operand = self.parse_not();
			let span = start..operand.span().end;
			return Expr::Not { operand: Box::new(operand), span };
		}
		self.parse_comparison()
	}

	fn parse_comparison(&mut self) -> Expr {
		let mut lhs = self.parse_add();
		loop {
			let op = match self.peek_kind() {
				Some(TokenKind::Eq) => BinOp::Eq,
				Some(TokenKind::Neq) => BinOp::Neq,
				Some(TokenKind::Lt) => BinOp::Lt,
				Some(TokenKind::Gt) => BinOp::Gt,
				Some(TokenKind::Lte) => BinOp::Lte,
				Some(TokenKind::Gte) => BinOp::Gte,
				_ => break,
			};
			self.bump();
			let rhs = self.parse_add();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_add(&mut self) -> Expr {
		let mut lhs = self.parse_mul();
		loop {
			let op = match self.peek_kind() {
				Some(TokenKind::Plus) => BinOp::Add,
				Some(TokenKind::Minus) => BinOp::Sub,
				_ => break,
			};
			self.bump();
			let rhs = self.parse_mul();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_mul(&mut self) -> Expr {
		let mut lhs = self.parse_div();
		loop {
			let op = match self.peek_kind() {
				Some(TokenKind::Star) => BinOp::Mul,
				Some(TokenKind::Percent) => BinOp::Mod,
				_ => break,
			};
			self.bump();
			let rhs = self.parse_div();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_div(&mut self) -> Expr {
		let mut lhs = self.parse_pow();
		while self.eat(TokenKind::Slash) {
			let rhs = self.parse_pow();
			let span = lhs.span().start..rhs.span().end;
			lhs = Expr::Binary { op: BinOp::Div, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_pow(&mut self) -> Expr {
		let lhs = self.parse_unary();
		if self.eat(TokenKind::Caret) {
			let rhs = self.parse_pow();
			let span = lhs.span().start..rhs.span().end;
			return Expr::Binary { op: BinOp::Pow, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
		}
		lhs
	}

	fn parse_unary(&mut self) -> Expr {
		if self.eat(TokenKind::Minus) {
			let start = self.tokens[self.pos - 1].span.start;
			let operand = self.parse_unary();
			let span = start..operand.span().end;
			return Expr::Neg { operand: Box::new(operand), span };
		}
		self.parse_postfix()
	}

	fn parse_postfix(&mut self) -> Expr {
		let mut expr = self.parse_atom();
		loop {
			match self.peek_kind() {
				Some(TokenKind::Dot) => {
					self.bump();
					let name_span = self.cur_span();
					let name = if self.at(TokenKind::Identifier) { self.bump().unwrap().text.clone() } else { String::new() };
					let span = expr.span().start..name_span.end;
					expr = Expr::Property { base: Box::new(expr), name, name_span, span };
				}
				Some(TokenKind::LBracket) => {
					self.bump();
					if self.at(TokenKind::DotDot) {
						self.bump();
						let _ = self.parse_expr_opt();
						let end = self.cur_span().end;
						self.eat(TokenKind::RBracket);
						let span = expr.span().start..end;
						expr = Expr::Slice { base: Box::new(expr), span };
					} else {
						let index = self.parse_expr();
						if self.eat(TokenKind::DotDot) {
							let _ = self.parse_expr_opt();
							let end = self.cur_span().end;
							self.eat(TokenKind::RBracket);
							let span = expr.span().start..end;
							expr = Expr::Slice { base: Box::new(expr), span };
						} else {
							let end = self.cur_span().end;
							self.eat(TokenKind::RBracket);
							let span = expr.span().start..end;
							expr = Expr::Index { base: Box::new(expr), index: Box::new(index), span };
						}
					}
				}
				Some(TokenKind::Is) => {
					self.bump();
					let negated = self.eat(TokenKind::Not);
					let end = self.cur_span().end;
					self.eat(TokenKind::Null);
					let span = expr.span().start..end;
					expr = Expr::IsNull { operand: Box::new(expr), negated, span };
				}
				Some(TokenKind::In) => {
					self.bump();
					let rhs = self.parse_add();
					let span = expr.span().start..rhs.span().end;
					expr = Expr::In { lhs: Box::new(expr), rhs: Box::new(rhs), span };
				}
				Some(TokenKind::Starts) => {
					self.bump();
					self.eat(TokenKind::With);
					let rhs = self.parse_add();
					let span = expr.span().start..rhs.span().end;
					expr = Expr::StringPredicate { op: StringPredicateOp::StartsWith, lhs: Box::new(expr), rhs: Box::new(rhs), span };
				}
				Some(TokenKind::Ends) => {
					self.bump();
					self.eat(TokenKind::With);
					let rhs = self.parse_add();
					let span = expr.span().start..rhs.span().end;
					expr = Expr::StringPredicate { op: StringPredicateOp::EndsWith, lhs: Box::new(expr), rhs: Box::new(rhs), span };
				}
				Some(TokenKind::Contains) => {
					self.bump();
					let rhs = self.parse_add();
					let span = expr.span().start..rhs.span().end;
					expr = Expr::StringPredicate { op: StringPredicateOp::Contains, lhs: Box::new(expr), rhs: Box::new(rhs), span };
				}
				Some(TokenKind::Colon) if matches!(expr, Expr::Variable { .. }) => {
					self.bump();
					let mut labels = Vec::new();
					if self.at(TokenKind::Identifier) {
						labels.push(self.bump().unwrap().text.clone());
					}
					let end = self.cur_span().start;
					let span = expr.span().start..end;
					expr = Expr::LabelPredicate { operand: Box::new(expr), labels, span };
				}
				_ => break,
			}
		}
		expr
	}

	fn parse_expr_opt(&mut self) -> Option<Expr> {
		if matches!(self.peek_kind(), Some(TokenKind::RBracket) | None) {
			None
		} else {
			Some(self.parse_expr())
		}
	}

	fn parse_atom(&mut self) -> Expr {
		let start = self.cur_span().start;
		match self.peek_kind() {
			Some(TokenKind::IntLiteral) => {
				let tok = self.bump().unwrap();
				Expr::Literal { value: Literal::Int(tok.text.parse().unwrap_or(0)), span: tok.span.clone() }
			}
			Some(TokenKind::FloatLiteral) => {
				let tok = self.bump().unwrap();
				Expr::Literal { value: Literal::Float(tok.text.parse().unwrap_or(0.0)), span: tok.span.clone() }
			}
			Some(TokenKind::StringLiteral) | Some(TokenKind::StringLiteralSingle) => {
				let tok = self.bump().unwrap();
				let inner = tok.text.get(1..tok.text.len().saturating_sub(1)).unwrap_or("").to_string();
				Expr::Literal { value: Literal::String(inner), span: tok.span.clone() }
			}
			Some(TokenKind::True) => {
				let tok = self.bump().unwrap();
				Expr::Literal { value: Literal::Bool(true), span: tok.span.clone() }
			}
			Some(TokenKind::False) => {
				let tok = self.bump().unwrap();
				Expr::Literal { value: Literal::Bool(false), span: tok.span.clone() }
			}
			Some(TokenKind::Null) => {
				let tok = self.bump().unwrap();
				Expr::Literal { value: Literal::Null, span: tok.span.clone() }
			}
			Some(TokenKind::Dollar) => {
				self.bump();
				let name_span = self.cur_span();
				let name = if self.at(TokenKind::Identifier) { self.bump().unwrap().text.clone() } else { String::new() };
				Expr::Parameter { name, span: start..name_span.end }
			}
			Some(TokenKind::LParen) => {
				self.bump();
				let inner = self.parse_expr();
				let end = self.cur_span().end;
				self.eat(TokenKind::RParen);
				let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
				// Preserve inner expr but widen its span to the parens.
				reparent_span(inner, span)
			}
			Some(TokenKind::LBracket) => self.parse_list_or_comprehension(start),
			Some(TokenKind::LBrace) => self.parse_map_literal(start),
			Some(TokenKind::Case) => self.parse_case(start),
			Some(TokenKind::All) => self.parse_filter(FilterKind::All, start),
			Some(TokenKind::Any) => self.parse_filter(FilterKind::Any, start),
			Some(TokenKind::None) => self.parse_filter(FilterKind::None, start),
			Some(TokenKind::Single) => self.parse_filter(FilterKind::Single, start),
			Some(TokenKind::Exists) => {
				self.bump();
				if self.eat(TokenKind::LBrace) {
					let mut depth = 1i32;
					while depth > 0 && !self.at_eof() {
						match self.peek_kind() {
							Some(TokenKind::LBrace) => depth += 1,
							Some(TokenKind::RBrace) => depth -= 1,
							_ => {}
						}
						self.bump();
					}
				}
				let end = self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(start);
				Expr::Exists { span: start..end }
			}
			Some(TokenKind::Identifier) if self.peek_at(1) == Some(TokenKind::LParen) => self.parse_call(start),
			Some(TokenKind::Identifier) => {
				let tok = self.bump().unwrap();
				Expr::Variable { name: tok.text.clone(), span: tok.span.clone() }
			}
			_ => {
				self.syntax_error(self.cur_span(), "expected an expression");
				let span = start..start;
				self.bump();
				Expr::Literal { value: Literal::Null, span }
			}
		}
	}

	fn parse_call(&mut self, start: usize) -> Expr {
		let name = self.bump().unwrap().text.clone();
		self.eat(TokenKind::LParen);
		let mut args = Vec::new();
		while !self.at(TokenKind::RParen) && !self.at_eof() {
			args.push(self.parse_expr());
			if !self.eat(TokenKind::Comma) {
				break;
			}
		}
		let end = self.cur_span().end;
		self.eat(TokenKind::RParen);
		let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
		Expr::Call { name, args, span }
	}

	fn parse_list_or_comprehension(&mut self, start: usize) -> Expr {
		self.bump(); // `[`

		// Pattern comprehension: `[(a:A)-[:R]->(b:B) | expr]`.
		if self.at(TokenKind::LParen) {
			let pattern = self.parse_pattern();
			let map = if self.eat(TokenKind::Pipe) { Box::new(self.parse_expr()) } else { Box::new(self.parse_expr()) };
			let end = self.cur_span().end;
			self.eat(TokenKind::RBracket);
			let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
			return Expr::PatternComprehension { pattern, map, span };
		}

		// List comprehension: `[x IN src WHERE pred | map]`.
		if self.at(TokenKind::Identifier) && self.peek_at(1) == Some(TokenKind::In) {
			let variable = self.bump().unwrap().text.clone();
			self.eat(TokenKind::In);
			let source = Box::new(self.parse_expr());
			let predicate = if self.eat(TokenKind::Where) { Some(Box::new(self.parse_expr())) } else { None };
			let map = if self.eat(TokenKind::Pipe) { Some(Box::new(self.parse_expr())) } else { None };
			let end = self.cur_span().end;
			self.eat(TokenKind::RBracket);
			let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
			return Expr::ListComprehension { variable, source, predicate, map, span };
		}

		let mut items = Vec::new();
		while !self.at(TokenKind::RBracket) && !self.at_eof() {
			items.push(self.parse_expr());
			if !self.eat(TokenKind::Comma) {
				break;
			}
		}
		let end = self.cur_span().end;
		self.eat(TokenKind::RBracket);
		let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
		Expr::Literal { value: Literal::List(items), span }
	}

	fn parse_map_literal(&mut self, start: usize) -> Expr {
		self.bump(); // `{`
		let props = self.parse_property_map();
		let end = self.cur_span().end;
		self.eat(TokenKind::RBrace);
		let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
		Expr::Literal { value: Literal::Map(props), span }
	}

	fn parse_case(&mut self, start: usize) -> Expr {
		self.bump(); // `CASE`
		let mut branches = Vec::new();
		while self.eat(TokenKind::When) {
			let cond = self.parse_expr();
			self.eat(TokenKind::Then);
			let result = self.parse_expr();
			branches.push((cond, result));
		}
		let else_branch = if self.eat(TokenKind::Else) { Some(Box::new(self.parse_expr())) } else { None };
		let end = self.cur_span().end;
		self.eat(TokenKind::End);
		let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
		Expr::Case { branches, else_branch, span }
	}

	fn parse_filter(&mut self, kind: FilterKind, start: usize) -> Expr {
		self.bump(); // ALL/ANY/NONE/SINGLE
		self.eat(TokenKind::LParen);
		let variable = if self.at(TokenKind::Identifier) { self.bump().unwrap().text.clone() } else { String::new() };
		self.eat(TokenKind::In);
		let source = Box::new(self.parse_expr());
		self.eat(TokenKind::Where);
		let predicate = Box::new(self.parse_expr());
		let end = self.cur_span().end;
		self.eat(TokenKind::RParen);
		let span = start..self.tokens.get(self.pos.saturating_sub(1)).map(|t| t.span.end).unwrap_or(end);
		Expr::Filter { kind, variable, source, predicate, span }
	}
}

fn reparent_span(expr: Expr, span: Span) -> Expr {
	match expr {
		Expr::Literal { value, .. } => Expr::Literal { value, span },
		Expr::Parameter { name, .. } => Expr::Parameter { name, span },
		Expr::Variable { name, .. } => Expr::Variable { name, span },
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::cypher::tokenize;
	use pretty_assertions::assert_eq;

	#[test]
	fn parses_match_return() {
		let (tokens, _) = tokenize("MATCH (u:User) RETURN u.name AS name, u.age AS age");
		let (query, diags) = parse(&tokens);
		assert!(diags.is_empty());
		assert_eq!(query.clauses.len(), 2);
		let Clause::Return { items, .. } = &query.clauses[1] else { panic!("expected return clause") };
		assert_eq!(items.len(), 2);
		assert_eq!(items[0].alias.as_deref(), Some("name"));
	}

	#[test]
	fn parses_relationship_pattern_with_direction() {
		let (tokens, _) = tokenize("MATCH (p:Person)-[:FRIENDS]->(q:Person) RETURN q");
		let (query, diags) = parse(&tokens);
		assert!(diags.is_empty());
		let Clause::Match { patterns, .. } = &query.clauses[0] else { panic!("expected match") };
		assert_eq!(patterns[0].relationships[0].direction, RelDirection::Outgoing);
		assert_eq!(patterns[0].relationships[0].rel_types, vec!["FRIENDS"]);
	}

	#[test]
	fn parses_property_map_literal_in_node_pattern() {
		let (tokens, _) = tokenize("MATCH (p:Person {name: false}) RETURN p");
		let (query, _) = parse(&tokens);
		let Clause::Match { patterns, .. } = &query.clauses[0] else { panic!("expected match") };
		assert_eq!(patterns[0].nodes[0].properties[0].0, "name");
	}
}
