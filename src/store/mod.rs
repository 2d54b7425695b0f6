// Store exports
pub mod behavior;
pub mod registry;

pub use behavior::{BehaviorStore, InMemoryBehaviorStore};
pub use registry::{InMemoryProviderStore, ProviderStore};
