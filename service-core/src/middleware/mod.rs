pub mod cors;
pub mod metrics;
pub mod tracing;

pub use self::cors::permissive_cors_layer;
pub use self::metrics::metrics_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
