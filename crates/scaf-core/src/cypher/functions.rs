//! Closed registry of the built-in Cypher functions the analyzer knows the return type of
//! (spec.md §4.C). A call to anything outside this set infers as `Type::any()` rather than
//! producing a diagnostic — unknown functions are a non-goal, not an error.

use crate::schema::Type;

/// Resolves the return type of a call, given the already-inferred types of its arguments.
/// `args` may be shorter than the real call's argument list if an argument failed to infer.
pub fn infer_call(name: &str, args: &[Type]) -> Type {
	match name.to_ascii_lowercase().as_str() {
		"collect" => Type::slice(args.first().cloned().unwrap_or_else(Type::any)),
		"head" | "last" => match args.first() {
			Some(Type::Slice(inner)) => (**inner).clone(),
			_ => Type::any(),
		},
		"tail" => match args.first() {
			Some(t @ Type::Slice(_)) => t.clone(),
			_ => Type::any(),
		},
		"size" | "length" => Type::int(),
		"count" => Type::int(),
		"min" | "max" => args.first().cloned().unwrap_or_else(Type::any),
		"sum" | "avg" => Type::float(),
		"coalesce" => args.iter().find(|t| **t != Type::any()).cloned().unwrap_or_else(Type::any),
		"properties" | "keys" | "labels" | "type" | "nodes" | "relationships" => Type::any(),
		"toString" | "tostring" => Type::string(),
		"toInteger" | "tointeger" => Type::int(),
		"toFloat" | "tofloat" => Type::float(),
		"toBoolean" | "toboolean" => Type::bool(),
		"exists" => Type::bool(),
		"id" => Type::int(),
		"range" => Type::slice(Type::int()),
		"abs" | "ceil" | "floor" | "round" | "sign" | "sqrt" | "rand" => Type::float(),
		"split" => Type::slice(Type::string()),
		"trim" | "ltrim" | "rtrim" | "toUpper" | "toLower" | "toupper" | "tolower" | "replace" | "substring" | "reverse" => Type::string(),
		_ => Type::any(),
	}
}
