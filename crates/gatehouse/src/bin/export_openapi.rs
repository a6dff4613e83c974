// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json
//
// Generates the spec without starting the API server; useful for CI and
// documentation builds.

use gatehouse::openapi::ApiDoc;

fn main() {
    println!("{}", ApiDoc::to_json());
}
