//! # Repoman
//!
//! Provisions version-control repositories on a remote management service
//! and keeps each project's access record in sync with it. Usable both as a
//! library and through the bundled CLI.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! repoman = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use repoman::config::RemoteConfig;
//! use repoman::remote::HttpRemote;
//! use repoman::service::RepoManager;
//! use repoman::store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::new("./data/repoman.db").unwrap());
//! store.initialize().unwrap();
//!
//! let remote = Arc::new(HttpRemote::new(RemoteConfig::default()).unwrap());
//! let manager = RepoManager::new(remote, store.clone(), store);
//! let repo_id = manager.create_repo("my-project", "Me <me@example.com>").unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod service;
pub mod store;
pub mod types;
