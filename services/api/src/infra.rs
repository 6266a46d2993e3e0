use metrics_exporter_prometheus::PrometheusHandle;
use sg_quote::config::AppConfig;
use sg_quote::quote::{QuoteService, SendGridMailer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the SendGrid transport into the quote service.
///
/// Incomplete mail settings only produce a warning here; each quote request
/// then answers with a configuration error until they are fixed.
pub(crate) fn quote_service(config: &AppConfig) -> Arc<QuoteService<SendGridMailer>> {
    let missing = config.mail.missing();
    if !missing.is_empty() {
        warn!(?missing, "mail configuration incomplete; quotes will be refused");
    }

    let mailer = SendGridMailer::new(
        config.mail.api_key.clone().unwrap_or_default(),
        config.mail.api_url.clone(),
    );

    Arc::new(QuoteService::new(
        Arc::new(mailer),
        config.mail.clone(),
        config.notification.clone(),
    ))
}
