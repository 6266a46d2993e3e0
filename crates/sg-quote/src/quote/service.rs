use std::sync::Arc;

use chrono::Datelike;
use serde_json::Value;
use tracing::{error, info, warn};

use super::domain::QuoteSubmission;
use super::mailer::{MailError, Mailer, OutboundEmail};
use super::normalize::validate;
use super::render::{render, RenderOptions};
use crate::config::{MailConfig, NotificationConfig};

const LOGO_PATH: &str = "/logo-sg-transporte.png";

/// Every way a quote request can fail.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Variáveis de ambiente ausentes: verifique SENDGRID_API_KEY, MAIL_TO e MAIL_FROM.")]
    MissingConfiguration { missing: Vec<&'static str> },
    #[error("Campos obrigatórios: nome, email e CEP de retirada.")]
    InvalidSubmission,
    #[error("Corpo da requisição inválido.")]
    MalformedBody,
    #[error("Falha interna ao enviar e-mail.")]
    Dispatch(#[source] MailError),
}

/// Where the request came from, as seen through the proxy headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub forwarded_proto: Option<String>,
    pub host: Option<String>,
}

impl RequestOrigin {
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|host| !host.is_empty())?;
        let proto = self
            .forwarded_proto
            .as_deref()
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("https");
        Some(format!("{proto}://{host}"))
    }
}

/// Acknowledgment for a dispatched quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteReceipt {
    pub code: Option<String>,
}

/// Validates, renders and dispatches quote submissions.
pub struct QuoteService<M> {
    mailer: Arc<M>,
    mail: MailConfig,
    notification: NotificationConfig,
}

impl<M> QuoteService<M>
where
    M: Mailer + 'static,
{
    pub fn new(mailer: Arc<M>, mail: MailConfig, notification: NotificationConfig) -> Self {
        Self {
            mailer,
            mail,
            notification,
        }
    }

    /// `LOGO_URL` when configured, otherwise the logo served next to the form.
    pub fn render_options(&self, origin: &RequestOrigin) -> RenderOptions {
        let logo_src = self.notification.logo_url.clone().or_else(|| {
            origin
                .base_url()
                .map(|base| format!("{base}{LOGO_PATH}"))
        });

        RenderOptions {
            style: self.notification.style,
            logo_src,
            year: chrono::Utc::now().year(),
        }
    }

    /// Handles one raw request body end to end.
    pub async fn submit(
        &self,
        body: &[u8],
        origin: &RequestOrigin,
    ) -> Result<QuoteReceipt, QuoteError> {
        let Some(recipients) = self.mail.recipients() else {
            let missing = self.mail.missing();
            warn!(?missing, "quote rejected: mail configuration incomplete");
            return Err(QuoteError::MissingConfiguration { missing });
        };

        let submission = parse_submission(body)?;
        let quote = validate(submission)?;
        let rendered = render(&quote, &self.render_options(origin));

        let email = OutboundEmail {
            to: recipients.to.to_string(),
            from: recipients.from.to_string(),
            reply_to: quote.requester_email.clone(),
            subject: rendered.subject,
            text: rendered.plain_text_body,
            html: rendered.html_body,
        };

        if let Err(err) = self.mailer.send(&email).await {
            error!(error = %err, code = ?quote.code(), "failed to send quote email");
            return Err(QuoteError::Dispatch(err));
        }

        info!(
            code = ?quote.code(),
            pickup_cep = %quote.pickup_postal_code,
            "quote email dispatched"
        );

        Ok(QuoteReceipt {
            code: quote.submission.code,
        })
    }
}

/// An empty body counts as an empty submission; anything but a JSON object is malformed.
pub fn parse_submission(body: &[u8]) -> Result<QuoteSubmission, QuoteError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QuoteSubmission::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| QuoteError::MalformedBody)?;
    if !value.is_object() {
        return Err(QuoteError::MalformedBody);
    }
    serde_json::from_value(value).map_err(|_| QuoteError::MalformedBody)
}
