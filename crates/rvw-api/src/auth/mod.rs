pub mod middleware;

pub use middleware::{Authorized, WebhookSecret};
