//! Newsletter domain module.
//!
//! # Module Structure
//!
//! - `model`: the draft and its news items (`NewsletterDraft`, `NewsItem`)
//! - `composer`: mutation and eligibility checks on a draft (`NewsletterComposer`)
//! - `api`: the remote rendering/delivery service interface (`NewsletterApi`)
//! - `dispatcher`: preview and send orchestration (`NewsletterDispatcher`)
//! - `error`: validation, dispatch and composition failures

mod api;
mod composer;
mod dispatcher;
mod error;
mod model;

// Re-export public API
pub use api::{DispatchReceipt, DispatchRequest, NewsletterApi, PreviewRequest};
pub use composer::NewsletterComposer;
pub use dispatcher::{DispatchOutcome, NewsletterDispatcher, REJECTION_FALLBACK_MESSAGE};
pub use error::{CompositionError, DispatchError, ValidationError};
pub use model::{ItemField, NewsItem, NewsletterDraft};
