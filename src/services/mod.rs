pub mod events;
pub mod recommend;

pub use events::EventService;
