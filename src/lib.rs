//! # Knowledge Cache
//!
//! A flashcard study server, usable both as a standalone binary and as a
//! library. The library surface also carries the client-side study logic
//! (review deck, gestures, card-motion springs, save diffing, delete flow)
//! so that any frontend can drive it without reimplementing the rules.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! knowledge-cache = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use knowledge_cache::media::MediaStore;
//! use knowledge_cache::server::{AppState, create_router};
//! use knowledge_cache::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/kcache.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     media: MediaStore::new(Path::new("./data")),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the server binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod editing;
pub mod error;
pub mod media;
pub mod repository;
pub mod review;
pub mod server;
pub mod store;
pub mod types;
