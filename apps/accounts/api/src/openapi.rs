use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Accounts API",
        version = "0.1.0",
        description = "Sign-up, sign-in and user management"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
