pub mod model;
pub mod routes;
pub mod service;

pub use model::{ReviewPayload, ReviewRequest, ReviewResponse};
pub use routes::routes;
pub use service::review_item;
