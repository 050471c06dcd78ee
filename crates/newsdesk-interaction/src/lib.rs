//! HTTP adapters for the remote Newsdesk services.
//!
//! Implements `SessionApi` and `NewsletterApi` from `newsdesk-core` against
//! the REST backend (`/auth/*` and `/newsletter/*`).

pub mod client;
pub mod newsletter_api;
pub mod session_api;

pub use client::ApiClient;
pub use newsletter_api::HttpNewsletterApi;
pub use session_api::HttpSessionApi;
