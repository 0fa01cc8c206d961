//! The user-supplied `TypeSchema`: models, fields and relationships used to ground type
//! inference and semantic diagnostics (spec.md §3, §6). Loaded once from `.scaf.yaml` and never
//! mutated afterwards.

use std::collections::HashMap;

use serde::Deserialize;

/// A structural type, shared between the schema and the inferred expression type lattice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
	Primitive(Primitive),
	Named(String),
	Pointer(Box<Type>),
	Slice(Box<Type>),
	Map(Box<Type>, Box<Type>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	String,
	Int,
	Int32,
	Int64,
	Float32,
	Float64,
	Bool,
	Any,
}

impl Type {
	pub fn string() -> Type { Type::Primitive(Primitive::String) }

	pub fn int() -> Type { Type::Primitive(Primitive::Int) }

	pub fn float() -> Type { Type::Primitive(Primitive::Float64) }

	pub fn bool() -> Type { Type::Primitive(Primitive::Bool) }

	pub fn any() -> Type { Type::Primitive(Primitive::Any) }

	pub fn slice(of: Type) -> Type { Type::Slice(Box::new(of)) }

	/// Returns `true` if a literal of kind `other` can be assigned to a field declared as `self`
	/// (spec.md §4.C "Semantic diagnostics inside a query").
	pub fn compatible_with_literal(&self, literal: &Type) -> bool {
		use Primitive::*;

		match (self, literal) {
			(Type::Primitive(Any), _) | (_, Type::Primitive(Any)) => true,
			(Type::Primitive(String), Type::Primitive(String)) => true,
			(Type::Primitive(Int | Int32 | Int64), Type::Primitive(Int | Int32 | Int64)) => true,
			(Type::Primitive(Float32 | Float64), Type::Primitive(Float32 | Float64 | Int | Int32 | Int64)) => true,
			(Type::Primitive(Bool), Type::Primitive(Bool)) => true,
			(Type::Slice(_), Type::Slice(_)) => true,
			_ => self == literal,
		}
	}

	/// Renders the type the way a hover/diagnostic message should show it.
	pub fn display(&self) -> String {
		match self {
			Type::Primitive(String) => "string".into(),
			Type::Primitive(Int) => "int".into(),
			Type::Primitive(Int32) => "int32".into(),
			Type::Primitive(Int64) => "int64".into(),
			Type::Primitive(Float32) => "float32".into(),
			Type::Primitive(Float64) => "float".into(),
			Type::Primitive(Bool) => "boolean".into(),
			Type::Primitive(Any) => "any".into(),
			Type::Named(name) => name.clone(),
			Type::Pointer(inner) => inner.display(),
			Type::Slice(inner) => format!("[{}]", inner.display()),
			Type::Map(k, v) => format!("{{{}: {}}}", k.display(), v.display()),
		}
	}
}

use Primitive::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub name: String,
	pub ty: Type,
	pub required: bool,
	pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Outgoing,
	Incoming,
	Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
	pub name: String,
	pub rel_type: String,
	pub target: String,
	pub many: bool,
	pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
	pub name: String,
	pub fields: Vec<Field>,
	pub relationships: Vec<Relationship>,
}

impl Model {
	pub fn field(&self, name: &str) -> Option<&Field> { self.fields.iter().find(|f| f.name == name) }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeSchema {
	pub models: HashMap<String, Model>,
}

impl TypeSchema {
	pub fn model(&self, name: &str) -> Option<&Model> { self.models.get(name) }

	/// Relationships declared on `from_label` whose direction and, if known, target label match.
	pub fn relationships_from(&self, from_label: &str) -> Vec<&Relationship> {
		self.model(from_label).map(|m| m.relationships.iter().collect()).unwrap_or_default()
	}

	pub fn all_relationship_names(&self) -> Vec<&str> {
		self.models.values().flat_map(|m| m.relationships.iter().map(|r| r.rel_type.as_str())).collect()
	}
}

/// `.scaf.yaml` on-disk representation; deserialized with `serde_yaml` then lowered into
/// [`TypeSchema`], per spec.md §6.
#[derive(Debug, Deserialize)]
pub struct SchemaFile {
	#[serde(default)]
	pub models: HashMap<String, ModelFile>,
}

#[derive(Debug, Deserialize)]
pub struct ModelFile {
	#[serde(default)]
	pub fields: HashMap<String, FieldFile>,
	#[serde(default)]
	pub relationships: Vec<RelationshipFile>,
}

#[derive(Debug, Deserialize)]
pub struct FieldFile {
	#[serde(rename = "type")]
	pub ty: String,
	#[serde(default)]
	pub required: bool,
	#[serde(default)]
	pub unique: bool,
}

#[derive(Debug, Deserialize)]
pub struct RelationshipFile {
	pub name: String,
	#[serde(rename = "type")]
	pub rel_type: String,
	pub target: String,
	#[serde(default)]
	pub many: bool,
	#[serde(default = "default_direction")]
	pub direction: String,
}

fn default_direction() -> String { "out".to_string() }

/// A warning produced while lowering a `.scaf.yaml` file, e.g. for an unknown type name. Never
/// fatal (spec.md §6, §7: a missing or unparsable schema is a warning, not a crash).
#[derive(Debug, Clone)]
pub struct SchemaWarning(pub String);

pub fn load_schema(source: &str) -> (TypeSchema, Vec<SchemaWarning>) {
	let mut warnings = Vec::new();

	let file: SchemaFile = match serde_yaml::from_str(source) {
		Ok(f) => f,
		Err(err) => {
			warnings.push(SchemaWarning(format!("could not parse schema file: {err}")));
			return (TypeSchema::default(), warnings);
		}
	};

	let mut models = HashMap::new();

	for (name, model_file) in file.models {
		let mut fields = Vec::new();

		for (field_name, field_file) in model_file.fields {
			match parse_type(&field_file.ty) {
				Some(ty) => fields.push(Field {
					name: field_name,
					ty,
					required: field_file.required,
					unique: field_file.unique,
				}),
				None => warnings.push(SchemaWarning(format!(
					"unknown type '{}' for field '{}.{}'; ignoring field",
					field_file.ty, name, field_name
				))),
			}
		}

		let relationships = model_file
			.relationships
			.into_iter()
			.map(|r| Relationship {
				name: r.name,
				rel_type: r.rel_type,
				target: r.target,
				many: r.many,
				direction: match r.direction.to_lowercase().as_str() {
					"in" | "incoming" => Direction::Incoming,
					"both" => Direction::Both,
					_ => Direction::Outgoing,
				},
			})
			.collect();

		models.insert(name.clone(), Model { name, fields, relationships });
	}

	(TypeSchema { models }, warnings)
}

/// Parses a schema type string: `string|int|int32|int64|float32|float64|bool|any`, `[T]`
/// (slice), or `{K: V}` (map).
fn parse_type(s: &str) -> Option<Type> {
	let s = s.trim();

	if let Some(inner) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
		return parse_type(inner).map(|t| Type::Slice(Box::new(t)));
	}

	if let Some(inner) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
		let (key, value) = inner.split_once(':')?;
		let key_ty = parse_type(key)?;
		let value_ty = parse_type(value)?;
		return Some(Type::Map(Box::new(key_ty), Box::new(value_ty)));
	}

	Some(match s {
		"string" => Type::Primitive(String),
		"int" => Type::Primitive(Int),
		"int32" => Type::Primitive(Int32),
		"int64" => Type::Primitive(Int64),
		"float32" => Type::Primitive(Float32),
		"float64" | "float" => Type::Primitive(Float64),
		"bool" => Type::Primitive(Bool),
		"any" => Type::Primitive(Any),
		_ if !s.is_empty() && s.chars().next().unwrap().is_uppercase() => Type::Named(s.to_string()),
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn loads_models_fields_and_relationships() {
		let yaml = r#"
models:
  User:
    fields:
      name: { type: string, required: true }
      age: { type: int }
    relationships:
      - { name: friends, type: FRIENDS, target: User, many: true, direction: out }
"#;
		let (schema, warnings) = load_schema(yaml);
		assert!(warnings.is_empty());

		let user = schema.model("User").unwrap();
		assert_eq!(user.field("name").unwrap().ty, Type::string());
		assert!(user.field("name").unwrap().required);
		assert_eq!(user.relationships[0].rel_type, "FRIENDS");
	}

	#[test]
	fn unknown_type_is_a_warning_not_a_failure() {
		let yaml = r#"
models:
  User:
    fields:
      name: { type: wat }
"#;
		let (schema, warnings) = load_schema(yaml);
		assert_eq!(warnings.len(), 1);
		assert!(schema.model("User").unwrap().fields.is_empty());
	}

	#[test]
	fn slice_and_map_types_parse() {
		assert_eq!(parse_type("[int]"), Some(Type::slice(Type::int())));
		assert_eq!(parse_type("{string: int}"), Some(Type::Map(Box::new(Type::string()), Box::new(Type::int()))));
	}
}
