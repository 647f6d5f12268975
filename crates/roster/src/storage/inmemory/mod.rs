//! In-memory storage backend.
//!
//! All tables sit behind one `tokio::sync::RwLock`, so every multi-row
//! mutation (student create/delete, group create, subject delete) is applied
//! atomically. Nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use roster::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
