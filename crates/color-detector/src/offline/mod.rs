//! Offline layer: versioned asset caches, the fetch policy in front of the
//! network, and update detection.

pub mod cache;
pub mod http;
pub mod update;
pub mod worker;

pub use cache::{CacheStorage, CachedResponse};
pub use http::{FetchRequest, FetchResponse, Network, RequestMode, ResponseType};
pub use update::UpdateWatcher;
pub use worker::{
    ClickAction, Clients, FetchOutcome, Notification, OfflineWorker, ResponseSource,
    WindowClient, WorkerMessage, WorkerState,
};
