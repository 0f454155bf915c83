pub mod auth;
pub mod request_id;

pub use auth::{require_auth, CurrentUser};
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId};
