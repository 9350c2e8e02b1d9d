//! Outbound email.
//!
//! When SMTP delivery is disabled (the default in development), messages are
//! logged via `tracing` instead of being sent. Invoice delivery still flips
//! the invoice to SENT either way.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Message could not be constructed.
    #[error("Invalid message: {0}")]
    Build(String),
    /// SMTP delivery failed.
    #[error("Delivery failed: {0}")]
    Transport(String),
}

/// Sends transactional email, or logs it when SMTP is disabled.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// Creates the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Transport` if the SMTP relay cannot be configured.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let transport = if config.smtp_enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| EmailError::Transport(e.to_string()))?
                    .port(config.smtp_port);

            if !config.smtp_username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self { config, transport })
    }

    /// Sends a plain-text email to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is malformed or delivery fails.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let Some(transport) = &self.transport else {
            tracing::info!(to = %to, subject = %subject, "smtp disabled, logging email instead");
            tracing::debug!(body = %body, "email body");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| EmailError::Build(format!("{e}")))?,
            )
            .to(to.parse().map_err(|e| EmailError::Build(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_smtp_logs_instead_of_sending() {
        let service = EmailService::new(EmailConfig::default()).unwrap();
        let result = service
            .send("client@example.com", "Invoice INV-001", "Please find attached.")
            .await;
        assert!(result.is_ok());
    }
}
