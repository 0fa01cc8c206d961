//! Bottom-up type inference over a parsed query (spec.md §4.C). Inference never fails: an
//! expression whose type can't be determined infers as `Type::any()` rather than erroring, so the
//! rest of the query can still be analyzed.

use std::collections::HashMap;

use super::ast::{BinOp, Clause, Expr, Literal, Pattern, Query};
use super::functions::infer_call;
use crate::schema::{Type, TypeSchema};

/// Variable -> inferred type, built up from `MATCH` patterns as they're walked left to right.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
	variables: HashMap<String, Type>,
}

impl Bindings {
	pub fn get(&self, name: &str) -> Option<&Type> { self.variables.get(name) }

	pub fn insert(&mut self, name: String, ty: Type) { self.variables.insert(name, ty); }
}

/// Walks every pattern in every `MATCH` clause, binding node/relationship variables to their
/// declared label's model (or `any` if the label is unknown or absent).
pub fn collect_bindings(query: &Query, schema: Option<&TypeSchema>) -> Bindings {
	let mut bindings = Bindings::default();
	for clause in &query.clauses {
		if let Clause::Match { patterns, .. } = clause {
			for pattern in patterns {
				bind_pattern(pattern, schema, &mut bindings);
			}
		}
	}
	bindings
}

fn bind_pattern(pattern: &Pattern, schema: Option<&TypeSchema>, bindings: &mut Bindings) {
	for node in &pattern.nodes {
		if let Some(var) = &node.variable {
			let ty = node
				.labels
				.first()
				.map(|label| {
					if let Some(schema) = schema {
						if schema.model(label).is_some() {
							return Type::Named(label.clone());
						}
					}
					Type::Named(label.clone())
				})
				.unwrap_or_else(Type::any);
			bindings.insert(var.clone(), ty);
		}
	}
	for rel in &pattern.relationships {
		if let Some(var) = &rel.variable {
			let ty = rel.rel_types.first().map(|t| Type::Named(t.clone())).unwrap_or_else(Type::any);
			bindings.insert(var.clone(), ty);
		}
	}
}

pub struct InferCtx<'a> {
	pub schema: Option<&'a TypeSchema>,
	pub bindings: &'a Bindings,
	pub param_types: &'a HashMap<String, Type>,
}

pub fn infer_expr(expr: &Expr, ctx: &InferCtx) -> Type {
	match expr {
		Expr::Literal { value, .. } => infer_literal(value, ctx),
		Expr::Parameter { name, .. } => ctx.param_types.get(name).cloned().unwrap_or_else(Type::any),
		Expr::Variable { name, .. } => ctx.bindings.get(name).cloned().unwrap_or_else(Type::any),
		Expr::Not { .. } => Type::bool(),
		Expr::Neg { operand, .. } => infer_expr(operand, ctx),
		Expr::Binary { op, lhs, rhs, .. } => infer_binary(*op, lhs, rhs, ctx),
		Expr::Property { base, name, .. } => infer_property(base, name, ctx),
		Expr::Index { base, .. } => match infer_expr(base, ctx) {
			Type::Slice(inner) => *inner,
			t if t == Type::string() => Type::string(),
			Type::Map(_, value) => *value,
			_ => Type::any(),
		},
		Expr::Slice { base, .. } => infer_expr(base, ctx),
		Expr::IsNull { .. } => Type::bool(),
		Expr::In { .. } => Type::bool(),
		Expr::StringPredicate { .. } => Type::bool(),
		Expr::LabelPredicate { .. } => Type::bool(),
		Expr::Case { branches, else_branch, .. } => branches
			.first()
			.map(|(_, result)| infer_expr(result, ctx))
			.or_else(|| else_branch.as_ref().map(|e| infer_expr(e, ctx)))
			.unwrap_or_else(Type::any),
		Expr::Call { name, args, .. } => infer_call(name, &args.iter().map(|a| infer_expr(a, ctx)).collect::<Vec<_>>()),
		Expr::ListComprehension { map, source, .. } => match map {
			Some(map_expr) => Type::slice(infer_expr(map_expr, ctx)),
			None => infer_expr(source, ctx),
		},
		Expr::PatternComprehension { map, .. } => Type::slice(infer_expr(map, ctx)),
		Expr::Filter { .. } => Type::bool(),
		Expr::Exists { .. } => Type::bool(),
	}
}

/// Literal list/map typing deliberately keeps the "first element wins" behavior rather than
/// unifying every element (spec.md §9 Open Question #2: preserved, not a bug).
fn infer_literal(literal: &Literal, ctx: &InferCtx) -> Type {
	match literal {
		Literal::Int(_) => Type::int(),
		Literal::Float(_) => Type::float(),
		Literal::String(_) => Type::string(),
		Literal::Bool(_) => Type::bool(),
		Literal::Null => Type::any(),
		Literal::List(items) => {
			let element = items.first().map(|e| infer_expr(e, ctx)).unwrap_or_else(Type::any);
			Type::slice(element)
		}
		Literal::Map(_) => Type::Map(Box::new(Type::string()), Box::new(Type::any())),
	}
}

fn infer_binary(op: BinOp, lhs: &Expr, rhs: &Expr, ctx: &InferCtx) -> Type {
	use BinOp::*;
	match op {
		Or | Xor | And | Eq | Neq | Lt | Gt | Lte | Gte => Type::bool(),
		Div | Pow => Type::float(),
		Add => {
			let l = infer_expr(lhs, ctx);
			let r = infer_expr(rhs, ctx);
			if l == Type::string() || r == Type::string() {
				Type::string()
			} else {
				unify_numeric(&l, &r)
			}
		}
		Sub | Mul | Mod => {
			let l = infer_expr(lhs, ctx);
			let r = infer_expr(rhs, ctx);
			unify_numeric(&l, &r)
		}
	}
}

fn unify_numeric(l: &Type, r: &Type) -> Type {
	if *l == Type::float() || *r == Type::float() {
		Type::float()
	} else if *l == Type::int() && *r == Type::int() {
		Type::int()
	} else {
		Type::any()
	}
}

fn infer_property(base: &Expr, field_name: &str, ctx: &InferCtx) -> Type {
	let base_ty = infer_expr(base, ctx);
	if let (Type::Named(model_name), Some(schema)) = (&base_ty, ctx.schema) {
		if let Some(model) = schema.model(model_name) {
			if let Some(field) = model.field(field_name) {
				return field.ty.clone();
			}
		}
	}
	Type::any()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cypher::parser::parse;
	use crate::lexer::cypher::tokenize;
	use pretty_assertions::assert_eq;

	fn infer_return_types(source: &str) -> Vec<Type> {
		let (tokens, _) = tokenize(source);
		let (query, _) = parse(&tokens);
		let bindings = collect_bindings(&query, None);
		let param_types = HashMap::new();
		let ctx = InferCtx { schema: None, bindings: &bindings, param_types: &param_types };
		query
			.clauses
			.iter()
			.filter_map(|c| match c {
				Clause::Return { items, .. } => Some(items.iter().map(|i| infer_expr(&i.expr, &ctx)).collect::<Vec<_>>()),
				_ => None,
			})
			.flatten()
			.collect()
	}

	#[test]
	fn addition_concatenates_strings() {
		let types = infer_return_types("RETURN 'a' + 'b'");
		assert_eq!(types, vec![Type::string()]);
	}

	#[test]
	fn division_is_always_float() {
		let types = infer_return_types("RETURN 4 / 2");
		assert_eq!(types, vec![Type::float()]);
	}

	#[test]
	fn comparison_operators_return_bool() {
		let types = infer_return_types("RETURN 1 < 2");
		assert_eq!(types, vec![Type::bool()]);
	}

	#[test]
	fn list_literal_types_from_its_first_element() {
		let types = infer_return_types("RETURN [1, 'a']");
		assert_eq!(types, vec![Type::slice(Type::int())]);
	}

	#[test]
	fn collect_wraps_the_collected_expression_type() {
		let types = infer_return_types("RETURN collect(1)");
		assert_eq!(types, vec![Type::slice(Type::int())]);
	}
}
