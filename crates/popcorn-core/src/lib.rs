pub mod details;
mod lookup;
pub mod persist;
pub mod search;
pub mod store;
pub mod watched;

pub use details::DetailsController;
pub use persist::PersistentList;
pub use search::{effective_len, SearchController, MIN_QUERY_LEN};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use watched::WatchedList;
