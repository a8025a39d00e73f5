use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// CORS policy that admits any origin, method and header, with credentials.
///
/// Browsers refuse a literal `*` when credentials are allowed, so the origin,
/// method and header lists are mirrored back from the request instead.
pub fn permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
