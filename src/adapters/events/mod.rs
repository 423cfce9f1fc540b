//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus capturing published envelopes

mod in_memory;

pub use in_memory::InMemoryEventBus;
