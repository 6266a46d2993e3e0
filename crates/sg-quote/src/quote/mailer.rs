//! Outbound mail seam.
//!
//! The dispatch service only sees [`Mailer`]; production wires in
//! [`SendGridMailer`], tests substitute an in-memory recorder.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// A rendered notification with its addressing, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail provider credential is not configured")]
    MissingCredential,
    #[error("mail provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Async email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// SendGrid v3 `mail/send` over HTTPS.
#[derive(Clone)]
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SendGridMailer {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn payload(email: &OutboundEmail) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": email.from },
            "reply_to": { "email": email.reply_to },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html },
            ],
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.api_key.is_empty() {
            return Err(MailError::MissingCredential);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::payload(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %email.to, status = status.as_u16(), "sendgrid accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            to: "cotacoes@sg.com.br".to_string(),
            from: "no-reply@sg.com.br".to_string(),
            reply_to: "ana@x.com".to_string(),
            subject: "Nova cotação — Ana — 01310100".to_string(),
            text: "texto".to_string(),
            html: "<p>html</p>".to_string(),
        }
    }

    #[test]
    fn payload_follows_sendgrid_v3_shape() {
        let payload = SendGridMailer::payload(&email());
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "cotacoes@sg.com.br");
        assert_eq!(payload["from"]["email"], "no-reply@sg.com.br");
        assert_eq!(payload["reply_to"]["email"], "ana@x.com");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][1]["value"], "<p>html</p>");
    }

    #[tokio::test]
    async fn refuses_to_send_without_credential() {
        let mailer = SendGridMailer::new("", "http://127.0.0.1:9/v3/mail/send");
        let err = mailer.send(&email()).await.expect_err("no credential");
        assert!(matches!(err, MailError::MissingCredential));
    }
}
