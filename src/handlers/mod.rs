pub mod health;
pub mod users;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use users::{api_fallback, create_user, get_user, update_user};
