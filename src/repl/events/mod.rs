//! # Events Module
//!
//! Cache events flowing from the query cache to its subscribers, background
//! events flowing from spawned work to the event loop, and view events flowing
//! from the view model to the renderer.

pub mod background_events;
pub mod cache_events;
pub mod event_bus;
pub mod view_events;

pub use background_events::{BackgroundEvent, MutationOutcome};
pub use cache_events::CacheEvent;
pub use event_bus::{CacheEventHandler, EventBus, SimpleEventBus, SubscriptionId};
pub use view_events::ViewEvent;
