//! SMTP delivery behind the [`Notifier`] seam.

use std::collections::BTreeMap;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use stemgate_config::SmtpConfig;
use tracing::info;

use crate::error::{NotifyError, NotifyResult};
use crate::template::render_stems_email;

/// Seam between HTTP handlers and the mail relay.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the stems-ready notification for `title` to `to`.
    async fn send_stems(
        &self,
        to: &str,
        title: &str,
        stems: &BTreeMap<String, String>,
    ) -> NotifyResult<()>;
}

/// Notifier that relays through authenticated SMTP with STARTTLS.
#[derive(Debug)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build a notifier from the configured relay settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the sender address cannot be parsed or the
    /// relay parameters are rejected by the transport builder.
    pub fn new(config: &SmtpConfig) -> NotifyResult<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|source| NotifyError::address("smtp.from", source))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|source| NotifyError::Transport { source })?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_stems(
        &self,
        to: &str,
        title: &str,
        stems: &BTreeMap<String, String>,
    ) -> NotifyResult<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|source| NotifyError::address("to", source))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("Your stems for \"{title}\" are ready"))
            .header(ContentType::TEXT_HTML)
            .body(render_stems_email(title, stems))
            .map_err(|source| NotifyError::Build { source })?;

        self.transport
            .send(message)
            .await
            .map_err(|source| NotifyError::Transport { source })?;
        info!(title = %title, "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer@example.com".to_string(),
            password: "hunter2".to_string(),
            from: "mailer@example.com".to_string(),
        }
    }

    #[test]
    fn new_accepts_valid_relay_settings() -> Result<()> {
        let notifier = SmtpNotifier::new(&smtp_config())?;
        assert_eq!(notifier.from.email.to_string(), "mailer@example.com");
        Ok(())
    }

    #[test]
    fn new_rejects_malformed_sender() {
        let mut config = smtp_config();
        config.from = "not an address".to_string();
        let err = SmtpNotifier::new(&config).unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Address {
                field: "smtp.from",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn send_stems_rejects_malformed_recipient() -> Result<()> {
        let notifier = SmtpNotifier::new(&smtp_config())?;
        let err = notifier
            .send_stems("not an address", "Track", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Address { field: "to", .. }));
        Ok(())
    }
}
