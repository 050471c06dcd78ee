//! File-backed storage for the Newsdesk console.
//!
//! Implements the persistence traits of `newsdesk-core` on top of TOML files
//! in the user's configuration directory.

pub mod config_service;
pub mod credential_store;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use credential_store::FileCredentialStore;
pub use paths::NewsdeskPaths;
