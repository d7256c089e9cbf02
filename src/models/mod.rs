pub mod event;
pub mod timestamp;

pub use event::{
    Event, EventChanges, EventFilter, EventQuery, EventStatus, NewEvent, StatusPatch,
};
