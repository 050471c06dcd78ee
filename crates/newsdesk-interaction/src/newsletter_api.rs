use crate::client::ApiClient;
use async_trait::async_trait;
use newsdesk_core::ApiError;
use newsdesk_core::credential::CredentialStore;
use newsdesk_core::newsletter::{
    DispatchReceipt, DispatchRequest, NewsItem, NewsletterApi, PreviewRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
struct PreviewBody<'a> {
    subject: &'a str,
    news_items: &'a [NewsItem],
    theme: &'a str,
}

#[derive(Deserialize)]
struct PreviewResponse {
    html: String,
}

#[derive(Serialize)]
struct SendBody<'a> {
    subject: &'a str,
    html_content: &'a str,
    is_test: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipients: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct SendResponse {
    success: bool,
    total_sent: Option<u32>,
    total_failed: Option<u32>,
    message: Option<String>,
    errors: Option<Vec<String>>,
}

impl From<SendResponse> for DispatchReceipt {
    fn from(response: SendResponse) -> Self {
        Self {
            success: response.success,
            total_sent: response.total_sent,
            total_failed: response.total_failed,
            message: response.message,
            errors: response.errors.unwrap_or_default(),
        }
    }
}

/// [`NewsletterApi`] over `POST /newsletter/preview` and `POST /newsletter/send`.
///
/// The credential is read from the store on every request, so a login or
/// logout takes effect on the next call.
pub struct HttpNewsletterApi {
    client: ApiClient,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpNewsletterApi {
    pub fn new(client: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn bearer(&self) -> Option<String> {
        match self.credentials.get() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("[HttpNewsletterApi] Failed to read credential: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl NewsletterApi for HttpNewsletterApi {
    async fn render_preview(&self, request: &PreviewRequest) -> Result<String, ApiError> {
        let body = PreviewBody {
            subject: &request.subject,
            news_items: &request.items,
            theme: &request.theme,
        };
        let bearer = self.bearer();

        let response: PreviewResponse = self
            .client
            .post_json("/newsletter/preview", &body, bearer.as_deref())
            .await?;
        Ok(response.html)
    }

    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, ApiError> {
        let body = SendBody {
            subject: &request.subject,
            html_content: &request.html,
            is_test: request.is_test,
            recipients: request.recipients.as_deref(),
        };
        let bearer = self.bearer();

        let response: SendResponse = self
            .client
            .post_json("/newsletter/send", &body, bearer.as_deref())
            .await?;
        Ok(response.into())
    }
}
