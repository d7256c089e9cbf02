pub mod error;
pub mod event_store;
pub mod validation;

pub use error::EventError;
pub use event_store::{filter_from_query, EventStore};
