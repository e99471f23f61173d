pub mod auth;
pub mod config;
pub mod error;
pub mod learner;
pub mod metrics;
pub mod middleware;
pub mod review;
pub mod router;
pub mod state;
pub mod tasks;
pub mod tracing;
pub mod validation;

pub use config::{ApiConfig, ConfigError, Environment};
pub use error::ApiError;
pub use state::ApiState;
