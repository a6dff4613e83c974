// OpenAPI specification generation
//
// Used by the API server (for Swagger UI) and the export-openapi binary
// (for static spec generation).

use crate::auth;
use crate::error::ErrorResponse;
use crate::oauth;
use utoipa::OpenApi;

/// OpenAPI documentation for the Gatehouse API
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::login,
        auth::routes::register,
        oauth::routes::begin_login,
        oauth::routes::callback,
    ),
    components(
        schemas(
            auth::routes::LoginRequest,
            auth::routes::LoginResponse,
            auth::routes::RegisterRequest,
            auth::routes::RegisterResponse,
            oauth::routes::AuthUrlResponse,
            oauth::routes::CallbackRequest,
            oauth::routes::MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Email/password authentication endpoints"),
        (name = "oauth", description = "OAuth2 account-linking endpoints")
    ),
    info(
        title = "Gatehouse API",
        version = "0.1.0",
        description = "Identity and account-linking API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> String {
        Self::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec")
    }
}
