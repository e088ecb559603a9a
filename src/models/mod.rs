pub mod event;
pub mod requests;

pub use event::{Event, EventChanges, NewEvent};
pub use requests::{CreateEventRequest, ListEventsQuery, RecommendationsQuery, UpdateEventRequest};
