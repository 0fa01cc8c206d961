use scaf_core::analyze;
use scaf_core::base_abstractions::DiagnosticKind;

/// spec.md §8 S3: a malformed function definition still leaves the rest of the file analyzable.
#[test]
fn malformed_function_does_not_abort_the_rest_of_the_file() {
	let source = r#"
		fn Broken( `RETURN 1`

		fn GetUser() `RETURN 1 AS total`

		GetUser {
			test "still analyzed" {
				total: 1
			}
		}
	"#;

	let analyzed = analyze(source);

	assert!(analyzed.has_parse_errors);
	assert!(analyzed.symbols.queries.contains_key("GetUser"));
	assert!(analyzed.diagnostics.iter().any(|d| d.kind == DiagnosticKind::ParseError));
}

#[test]
fn unknown_parameter_and_projection_are_reported_together() {
	let source = r#"
		fn GetUser($id) `MATCH (u:User) WHERE u.id = $id RETURN u.name AS name`

		GetUser {
			test "typo'd references" {
				$missing: 1
				nope: "x"
			}
		}
	"#;

	let analyzed = analyze(source);

	assert!(analyzed.diagnostics.iter().any(|d| d.kind == DiagnosticKind::UnknownParameter));
	assert!(analyzed.diagnostics.iter().any(|d| d.kind == DiagnosticKind::UnknownProjection));
}
