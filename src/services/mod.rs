pub mod database;
pub mod metrics;
pub mod pinger;

pub use database::UserDb;
pub use metrics::{get_metrics, init_metrics};
pub use pinger::Pinger;
