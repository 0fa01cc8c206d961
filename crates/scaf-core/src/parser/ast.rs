//! The Suite AST: typed nodes with byte-accurate spans, produced by the DSL parser (spec.md §3).
//!
//! Every node's `span` strictly contains all of its children's spans. Parsing never fails
//! outright — sub-parsers that hit an error still return a node whose span covers whatever was
//! consumed, with missing children left `None` so the rest of the tree stays usable.

use crate::base_abstractions::Span;
use crate::lexer::dsl::Token;

/// Comments attached to a node by the leading-comment pass (spec.md §4.B).
pub type LeadingComments = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct File {
	pub imports: Vec<Import>,
	pub functions: Vec<Function>,
	pub setup: Option<SetupClause>,
	pub teardown: Option<SetupClause>,
	pub scopes: Vec<FunctionScope>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
	pub alias: String,
	pub path: String,
	pub span: Span,
	pub leading_comments: LeadingComments,
}

/// A named query definition: `fn Name(params) \`body\``.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
	pub name: String,
	pub name_span: Span,
	pub params: Vec<FnParam>,
	/// The query body's text with the delimiting backticks stripped.
	pub body_raw_string: String,
	/// Byte offset, in the containing file, of the opening backtick — needed to map coordinates
	/// inside the body back to document coordinates (spec.md §4.F).
	pub body_start: usize,
	pub span: Span,
	pub leading_comments: LeadingComments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
	pub name: String,
	pub type_expr: Option<String>,
	pub span: Span,
	pub leading_comments: LeadingComments,
}

/// A block `Name { … tests … }` binding tests to a previously declared function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionScope {
	pub function_name: String,
	pub setup: Option<SetupClause>,
	pub teardown: Option<SetupClause>,
	pub items: Vec<TestOrGroup>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestOrGroup {
	Test(Test),
	Group(Group),
}

impl TestOrGroup {
	pub fn name(&self) -> &str {
		match self {
			TestOrGroup::Test(t) => &t.name,
			TestOrGroup::Group(g) => &g.name,
		}
	}

	pub fn span(&self) -> Span {
		match self {
			TestOrGroup::Test(t) => t.span.clone(),
			TestOrGroup::Group(g) => g.span.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Test {
	pub name: String,
	pub setup: Option<SetupClause>,
	pub statements: Vec<Statement>,
	pub asserts: Vec<Assert>,
	pub span: Span,
	pub leading_comments: LeadingComments,
}

/// A recursive grouping of tests, possibly with its own setup/teardown.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
	pub name: String,
	pub setup: Option<SetupClause>,
	pub teardown: Option<SetupClause>,
	pub items: Vec<TestOrGroup>,
	pub span: Span,
	pub leading_comments: LeadingComments,
}

/// `key: value` inside a test. `key` starts with `$` for a parameter binding, otherwise it is a
/// dotted path into the enclosing query's return projections.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
	pub key: DottedIdent,
	pub value: Value,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DottedIdent {
	pub is_parameter: bool,
	pub segments: Vec<String>,
	pub span: Span,
}

impl DottedIdent {
	pub fn text(&self) -> String {
		let prefix = if self.is_parameter { "$" } else { "" };
		format!("{prefix}{}", self.segments.join("."))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	String(String),
	Int(i64),
	Float(f64),
	Bool(bool),
	Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Literal(Literal),
	Expr(ParenExpr),
	/// A literal whose assertion is additionally guarded by a `where` clause.
	LiteralWhere(Literal, ParenExpr),
}

/// A balanced-paren expression in the embedded mini-language. Token-balance checked only — never
/// re-parsed beyond that; handed whole to an external evaluator at test time.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
	pub tokens: Vec<Token>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetupClause {
	ModuleRef(String),
	InlineQuery(String),
	Block(Vec<SetupClause>),
	Call { module: String, query: String, args: Vec<Value> },
}

/// `assert (expr)` or `assert Query { (expr) (expr) }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assert {
	pub query_ref: Option<AssertQuery>,
	pub conditions: Vec<ParenExpr>,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssertQuery {
	Named { module: Option<String>, name: String },
	Inline(String),
}
