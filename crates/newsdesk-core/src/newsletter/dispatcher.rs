use super::api::{DispatchReceipt, DispatchRequest, NewsletterApi, PreviewRequest};
use super::error::{DispatchError, ValidationError};
use super::model::NewsletterDraft;
use crate::config::DEFAULT_THEME;
use crate::error::ApiError;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Message used when the delivery service rejects a send without saying why.
pub const REJECTION_FALLBACK_MESSAGE: &str = "Delivery rejected";

/// Result of a send that reached the delivery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A test send was accepted. Test sends carry no delivery count.
    TestDelivered { message: Option<String> },
    /// A full send was accepted.
    Delivered {
        total_sent: Option<u32>,
        total_failed: Option<u32>,
        message: Option<String>,
        errors: Vec<String>,
    },
    /// The service answered but refused the delivery. The draft is still
    /// intact and may be sent again.
    Rejected { message: String },
}

impl DispatchOutcome {
    fn from_receipt(receipt: DispatchReceipt, is_test: bool) -> Self {
        if !receipt.success {
            let message = receipt
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| REJECTION_FALLBACK_MESSAGE.to_string());
            return Self::Rejected { message };
        }

        if is_test {
            Self::TestDelivered {
                message: receipt.message,
            }
        } else {
            Self::Delivered {
                total_sent: receipt.total_sent,
                total_failed: receipt.total_failed,
                message: receipt.message,
                errors: receipt.errors,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// Number of delivered emails. Only full sends report one.
    pub fn total_sent(&self) -> Option<u32> {
        match self {
            Self::Delivered { total_sent, .. } => *total_sent,
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::TestDelivered { message } | Self::Delivered { message, .. } => {
                message.as_deref()
            }
            Self::Rejected { message } => Some(message),
        }
    }
}

/// Orchestrates previews and sends of a draft against the remote service.
///
/// Every send renders the draft again immediately before delivering it, and
/// at most one send per dispatcher is in flight at a time.
pub struct NewsletterDispatcher {
    api: Arc<dyn NewsletterApi>,
    theme: String,
    in_flight: Mutex<()>,
}

impl NewsletterDispatcher {
    pub fn new(api: Arc<dyn NewsletterApi>) -> Self {
        Self::with_theme(api, DEFAULT_THEME)
    }

    pub fn with_theme(api: Arc<dyn NewsletterApi>, theme: impl Into<String>) -> Self {
        Self {
            api,
            theme: theme.into(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Renders the draft and returns the HTML unchanged.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Validation`] if the draft is incomplete (no remote call)
    /// - [`DispatchError::Preview`] if rendering fails
    pub async fn preview(&self, draft: &NewsletterDraft) -> Result<String, DispatchError> {
        Self::validate(draft)?;
        self.render(draft).await
    }

    /// Sends the draft to every subscribed contact, or to the test audience
    /// when `is_test` is set.
    ///
    /// Full sends are expected to be confirmed by the caller beforehand.
    pub async fn send(
        &self,
        draft: &NewsletterDraft,
        is_test: bool,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.send_to(draft, is_test, None).await
    }

    /// Like [`Self::send`], with an explicit recipient list.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Validation`] if the draft is incomplete (no remote call)
    /// - [`DispatchError::Busy`] if another send is in flight (no remote call)
    /// - [`DispatchError::Preview`] if rendering fails (delivery is not attempted)
    /// - [`DispatchError::Dispatch`] if delivery fails in transport
    ///
    /// A delivery refused by the service is not an error; it is reported as
    /// [`DispatchOutcome::Rejected`].
    pub async fn send_to(
        &self,
        draft: &NewsletterDraft,
        is_test: bool,
        recipients: Option<Vec<String>>,
    ) -> Result<DispatchOutcome, DispatchError> {
        Self::validate(draft)?;

        let _slot = self.in_flight.try_lock().map_err(|_| {
            tracing::warn!("[NewsletterDispatcher] Send rejected: another send is in flight");
            DispatchError::Busy
        })?;

        let html = self.render(draft).await?;

        let request = DispatchRequest {
            subject: draft.subject().to_string(),
            html,
            is_test,
            recipients,
        };
        tracing::info!(
            "[NewsletterDispatcher] Dispatching '{}' (test: {})",
            request.subject,
            is_test
        );
        let receipt = self.api.dispatch(&request).await.map_err(|e| {
            tracing::error!("[NewsletterDispatcher] Dispatch failed: {}", e);
            DispatchError::Dispatch(passthrough(&e))
        })?;

        let outcome = DispatchOutcome::from_receipt(receipt, is_test);
        match &outcome {
            DispatchOutcome::Rejected { message } => {
                tracing::warn!("[NewsletterDispatcher] Delivery rejected: {}", message);
            }
            DispatchOutcome::Delivered {
                total_sent,
                total_failed,
                ..
            } => {
                tracing::info!(
                    "[NewsletterDispatcher] Delivered: sent={:?} failed={:?}",
                    total_sent,
                    total_failed
                );
            }
            DispatchOutcome::TestDelivered { .. } => {
                tracing::info!("[NewsletterDispatcher] Test send delivered");
            }
        }
        Ok(outcome)
    }

    fn validate(draft: &NewsletterDraft) -> Result<(), ValidationError> {
        if draft.is_eligible() {
            return Ok(());
        }
        let missing = draft.missing_fields();
        tracing::debug!("[NewsletterDispatcher] Draft incomplete: {:?}", missing);
        Err(ValidationError { missing })
    }

    async fn render(&self, draft: &NewsletterDraft) -> Result<String, DispatchError> {
        let request = PreviewRequest {
            subject: draft.subject().to_string(),
            items: draft.items().to_vec(),
            theme: self.theme.clone(),
        };
        self.api.render_preview(&request).await.map_err(|e| {
            tracing::error!("[NewsletterDispatcher] Preview failed: {}", e);
            DispatchError::Preview(passthrough(&e))
        })
    }
}

/// The server's own message when it sent one, otherwise the error text.
fn passthrough(error: &ApiError) -> String {
    error
        .remote_message()
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newsletter::model::NewsItem;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    type ApiResult<T> = std::result::Result<T, ApiError>;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Render(PreviewRequest),
        Dispatch(DispatchRequest),
    }

    // Mock NewsletterApi that records every call in order
    struct MockNewsletterApi {
        renders: StdMutex<Vec<ApiResult<String>>>,
        receipt: ApiResult<DispatchReceipt>,
        calls: StdMutex<Vec<Call>>,
        render_count: AtomicUsize,
        gate: Option<Notify>,
    }

    impl MockNewsletterApi {
        fn new(html: &str) -> Self {
            Self {
                renders: StdMutex::new(vec![Ok(html.to_string())]),
                receipt: Ok(DispatchReceipt {
                    success: true,
                    ..Default::default()
                }),
                calls: StdMutex::new(Vec::new()),
                render_count: AtomicUsize::new(0),
                gate: None,
            }
        }

        /// Successive renders return these results; the last one repeats.
        fn with_renders(self, renders: Vec<ApiResult<String>>) -> Self {
            *self.renders.lock().unwrap() = renders;
            self
        }

        fn with_receipt(mut self, receipt: ApiResult<DispatchReceipt>) -> Self {
            self.receipt = receipt;
            self
        }

        fn gated(mut self) -> Self {
            self.gate = Some(Notify::new());
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsletterApi for MockNewsletterApi {
        async fn render_preview(&self, request: &PreviewRequest) -> ApiResult<String> {
            self.calls.lock().unwrap().push(Call::Render(request.clone()));
            self.render_count.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let mut renders = self.renders.lock().unwrap();
            if renders.len() > 1 {
                renders.remove(0)
            } else {
                renders[0].clone()
            }
        }

        async fn dispatch(&self, request: &DispatchRequest) -> ApiResult<DispatchReceipt> {
            self.calls.lock().unwrap().push(Call::Dispatch(request.clone()));
            self.receipt.clone()
        }
    }

    fn weekly_update() -> NewsletterDraft {
        NewsletterDraft::with_items("Weekly Update", vec![NewsItem::new("A", "B")])
    }

    #[tokio::test]
    async fn test_preview_returns_html_unchanged() {
        // Scenario C
        let api = Arc::new(MockNewsletterApi::new("<h1>A</h1><p>B</p>"));
        let dispatcher = NewsletterDispatcher::new(api.clone());

        let html = dispatcher.preview(&weekly_update()).await.unwrap();

        assert_eq!(html, "<h1>A</h1><p>B</p>");
        assert_eq!(
            api.calls(),
            vec![Call::Render(PreviewRequest {
                subject: "Weekly Update".to_string(),
                items: vec![NewsItem::new("A", "B")],
                theme: DEFAULT_THEME.to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_full_send_reports_total_sent() {
        // Scenario D
        let api = Arc::new(MockNewsletterApi::new("<h1>A</h1>").with_receipt(Ok(
            DispatchReceipt {
                success: true,
                total_sent: Some(42),
                total_failed: Some(0),
                message: Some("Newsletter enviada para 42 destinatários".to_string()),
                errors: vec![],
            },
        )));
        let dispatcher = NewsletterDispatcher::new(api);

        let outcome = dispatcher.send(&weekly_update(), false).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.total_sent(), Some(42));
    }

    #[tokio::test]
    async fn test_rejected_send_is_an_outcome() {
        // Scenario E
        let api = Arc::new(MockNewsletterApi::new("<h1>A</h1>").with_receipt(Ok(
            DispatchReceipt {
                success: false,
                message: Some("quota exceeded".to_string()),
                ..Default::default()
            },
        )));
        let dispatcher = NewsletterDispatcher::new(api.clone());
        let draft = weekly_update();
        let before = draft.clone();

        let outcome = dispatcher.send(&draft, false).await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Rejected {
                message: "quota exceeded".to_string()
            }
        );
        assert!(!outcome.is_success());
        assert_eq!(draft, before);

        // Still resendable
        assert!(dispatcher.send(&draft, false).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let api = Arc::new(MockNewsletterApi::new("<p/>").with_receipt(Ok(DispatchReceipt {
            success: false,
            ..Default::default()
        })));
        let dispatcher = NewsletterDispatcher::new(api);

        let outcome = dispatcher.send(&weekly_update(), true).await.unwrap();

        assert_eq!(outcome.message(), Some(REJECTION_FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_test_send_has_no_count() {
        let api = Arc::new(MockNewsletterApi::new("<p/>").with_receipt(Ok(DispatchReceipt {
            success: true,
            total_sent: Some(1),
            ..Default::default()
        })));
        let dispatcher = NewsletterDispatcher::new(api.clone());

        let outcome = dispatcher.send(&weekly_update(), true).await.unwrap();

        assert!(matches!(outcome, DispatchOutcome::TestDelivered { .. }));
        assert_eq!(outcome.total_sent(), None);
        match &api.calls()[1] {
            Call::Dispatch(request) => assert!(request.is_test),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_renders_fresh_html_before_dispatch() {
        let api = Arc::new(MockNewsletterApi::new("").with_renders(vec![
            Ok("<p>stale</p>".to_string()),
            Ok("<p>fresh</p>".to_string()),
        ]));
        let dispatcher = NewsletterDispatcher::new(api.clone());
        let draft = weekly_update();

        let previewed = dispatcher.preview(&draft).await.unwrap();
        dispatcher.send(&draft, false).await.unwrap();

        assert_eq!(previewed, "<p>stale</p>");
        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], Call::Render(_)));
        match &calls[2] {
            Call::Dispatch(request) => {
                assert_eq!(request.html, "<p>fresh</p>");
                assert_eq!(request.subject, "Weekly Update");
                assert_eq!(request.recipients, None);
            }
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_incomplete_draft_makes_no_remote_call() {
        let api = Arc::new(MockNewsletterApi::new("<p/>"));
        let dispatcher = NewsletterDispatcher::new(api.clone());
        let drafts = [
            NewsletterDraft::with_items("", vec![NewsItem::new("A", "B")]),
            NewsletterDraft::with_items("Weekly Update", vec![NewsItem::new("", "B")]),
            NewsletterDraft::with_items(
                "Weekly Update",
                vec![NewsItem::new("A", "B"), NewsItem::new("C", "")],
            ),
        ];

        for draft in &drafts {
            assert!(dispatcher.preview(draft).await.unwrap_err().is_validation());
            assert!(dispatcher.send(draft, false).await.unwrap_err().is_validation());
            assert!(dispatcher.send(draft, true).await.unwrap_err().is_validation());
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_never_dispatches() {
        let api = Arc::new(MockNewsletterApi::new("").with_renders(vec![Err(ApiError::Status {
            status: 500,
            detail: Some("template not found".to_string()),
        })]));
        let dispatcher = NewsletterDispatcher::new(api.clone());

        let err = dispatcher.send(&weekly_update(), false).await.unwrap_err();

        assert_eq!(err, DispatchError::Preview("template not found".to_string()));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_transport_failure() {
        let api = Arc::new(
            MockNewsletterApi::new("<p/>")
                .with_receipt(Err(ApiError::transport("connection reset"))),
        );
        let dispatcher = NewsletterDispatcher::new(api);

        let err = dispatcher.send(&weekly_update(), false).await.unwrap_err();

        assert_eq!(
            err,
            DispatchError::Dispatch("Request failed: connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn test_overlapping_send_is_busy() {
        let api = Arc::new(MockNewsletterApi::new("<p/>").gated());
        let dispatcher = Arc::new(NewsletterDispatcher::new(api.clone()));

        let first = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move { dispatcher.send(&weekly_update(), false).await }
        });
        while api.render_count.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = dispatcher.send(&weekly_update(), false).await;
        assert_eq!(second.unwrap_err(), DispatchError::Busy);
        assert_eq!(api.render_count.load(Ordering::SeqCst), 1);

        if let Some(gate) = &api.gate {
            gate.notify_one();
        }
        assert!(first.await.unwrap().is_ok());

        // The slot is free again once the first send returns.
        if let Some(gate) = &api.gate {
            gate.notify_one();
        }
        assert!(dispatcher.send(&weekly_update(), true).await.is_ok());
    }

    #[tokio::test]
    async fn test_preview_is_not_guarded() {
        let api = Arc::new(MockNewsletterApi::new("<p/>"));
        let dispatcher = NewsletterDispatcher::with_theme(api.clone(), "plain");
        let _held = dispatcher.in_flight.try_lock().unwrap();

        assert_eq!(dispatcher.preview(&weekly_update()).await.unwrap(), "<p/>");
        match &api.calls()[0] {
            Call::Render(request) => assert_eq!(request.theme, "plain"),
            other => panic!("expected render, got {other:?}"),
        }
    }
}
