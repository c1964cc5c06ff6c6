pub mod memory;
pub mod state;
pub mod store;

pub use memory::InMemoryStore;
pub use state::AppState;
pub use store::{Store, StoreError};
