use criterion::{black_box, Criterion};
use scaf_core::lexer::dsl::{tokenize, Token};

fn baseline(input: String) -> Vec<char> { input.chars().collect() }

fn basic(input: String) -> Vec<Token> { tokenize(&input).0 }

pub fn criterion_benchmark(c: &mut Criterion) {
	let input = r#"
		import db "./db.scaf"

		fn GetUser($id) `MATCH (u:User) WHERE u.id = $id RETURN u.name AS name, u.age AS age`

		GetUser {
			setup db.SeedUsers

			test "finds an existing user" {
				$id: 1
				name: "Ada"
				age: 36

				assert (name != "")
			}

			group "edge cases" {
				test "missing user" {
					$id: -1
					assert GetUser { (name == "") }
				}
			}
		}
	"#
	.to_string();
	let input = input.repeat(1000);

	let mut group = c.benchmark_group("lex 1000 repetitions of a scaf suite");

	group.bench_function("baseline", |b| b.iter(|| baseline(black_box(input.clone()))));
	group.bench_function("dsl lexer", |b| b.iter(|| basic(black_box(input.clone()))));

	group.finish()
}
