//! AST for the subset of Cypher the analyzer understands: `MATCH`/`WHERE`/`RETURN` clauses and
//! the full expression grammar (spec.md §4.C).

use crate::base_abstractions::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
	pub clauses: Vec<Clause>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
	Match { optional: bool, patterns: Vec<Pattern>, span: Span },
	Where { expr: Expr, span: Span },
	Return { distinct: bool, items: Vec<ReturnItem>, span: Span },
	/// A clause recognized by keyword but not deeply analyzed (`CREATE`, `MERGE`, `SET`,
	/// `DELETE`, `UNWIND`, `WITH`, `ORDER BY`, `LIMIT`, `SKIP`, ...): non-goal per spec.md §1
	/// ("Database execution. Queries are analyzed, never run.").
	Unparsed { span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
	pub expr: Expr,
	pub alias: Option<String>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
	pub nodes: Vec<NodePattern>,
	pub relationships: Vec<RelPattern>,
	pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelDirection {
	Outgoing,
	Incoming,
	Either,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
	pub variable: Option<String>,
	pub labels: Vec<String>,
	pub properties: Vec<(String, Expr)>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelPattern {
	pub variable: Option<String>,
	pub rel_types: Vec<String>,
	pub direction: RelDirection,
	pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
	Or,
	Xor,
	And,
	Eq,
	Neq,
	Lt,
	Gt,
	Lte,
	Gte,
	Add,
	Sub,
	Mul,
	Mod,
	Div,
	Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	Int(i64),
	Float(f64),
	String(String),
	Bool(bool),
	Null,
	List(Vec<Expr>),
	Map(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
	All,
	Any,
	None,
	Single,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Literal { value: Literal, span: Span },
	/// `$name`.
	Parameter { name: String, span: Span },
	Variable { name: String, span: Span },
	Not { operand: Box<Expr>, span: Span },
	Neg { operand: Box<Expr>, span: Span },
	Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
	/// `base.name`.
	Property { base: Box<Expr>, name: String, name_span: Span, span: Span },
	/// `base[index]`.
	Index { base: Box<Expr>, index: Box<Expr>, span: Span },
	/// `base[a..b]`.
	Slice { base: Box<Expr>, span: Span },
	IsNull { operand: Box<Expr>, negated: bool, span: Span },
	In { lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
	StringPredicate { op: StringPredicateOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
	/// `var:Label` — a label predicate on an already-bound variable.
	LabelPredicate { operand: Box<Expr>, labels: Vec<String>, span: Span },
	Case { branches: Vec<(Expr, Expr)>, else_branch: Option<Box<Expr>>, span: Span },
	Call { name: String, args: Vec<Expr>, span: Span },
	/// `[x IN src WHERE pred | map]`.
	ListComprehension { variable: String, source: Box<Expr>, predicate: Option<Box<Expr>>, map: Option<Box<Expr>>, span: Span },
	/// `[(a:A)-[:R]->(b:B) | expr]`.
	PatternComprehension { pattern: Pattern, map: Box<Expr>, span: Span },
	Filter { kind: FilterKind, variable: String, source: Box<Expr>, predicate: Box<Expr>, span: Span },
	Exists { span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPredicateOp {
	StartsWith,
	EndsWith,
	Contains,
}

impl Expr {
	pub fn span(&self) -> Span {
		match self {
			Expr::Literal { span, .. }
			| Expr::Parameter { span, .. }
			| Expr::Variable { span, .. }
			| Expr::Not { span, .. }
			| Expr::Neg { span, .. }
			| Expr::Binary { span, .. }
			| Expr::Property { span, .. }
			| Expr::Index { span, .. }
			| Expr::Slice { span, .. }
			| Expr::IsNull { span, .. }
			| Expr::In { span, .. }
			| Expr::StringPredicate { span, .. }
			| Expr::LabelPredicate { span, .. }
			| Expr::Case { span, .. }
			| Expr::Call { span, .. }
			| Expr::ListComprehension { span, .. }
			| Expr::PatternComprehension { span, .. }
			| Expr::Filter { span, .. }
			| Expr::Exists { span } => span.clone(),
		}
	}
}
