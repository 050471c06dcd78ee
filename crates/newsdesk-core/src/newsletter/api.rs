//! Remote newsletter service interface.

use async_trait::async_trait;

use super::model::NewsItem;
use crate::error::ApiError;

/// Content to render into HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub subject: String,
    pub items: Vec<NewsItem>,
    /// Name of the server-side template set.
    pub theme: String,
}

/// A rendered newsletter ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub subject: String,
    pub html: String,
    pub is_test: bool,
    /// Explicit recipients. `None` means every subscribed contact.
    pub recipients: Option<Vec<String>>,
}

/// What the delivery service reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub success: bool,
    pub total_sent: Option<u32>,
    pub total_failed: Option<u32>,
    pub message: Option<String>,
    /// Per-recipient failure descriptions.
    pub errors: Vec<String>,
}

/// The remote service that renders and delivers newsletters.
///
/// Implementations attach the session credential themselves.
#[async_trait]
pub trait NewsletterApi: Send + Sync {
    /// Renders the newsletter and returns the HTML.
    async fn render_preview(&self, request: &PreviewRequest) -> Result<String, ApiError>;

    /// Delivers rendered HTML.
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, ApiError>;
}
