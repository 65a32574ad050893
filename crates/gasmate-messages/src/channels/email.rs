//! Email notification channel.

use async_trait::async_trait;
use gasmate_core::config::defaults;
use gasmate_core::{ChannelKind, NotificationSettings};

use super::NotificationChannel;
use crate::content::NotificationContent;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: defaults::SMTP_PORT,
            username: None,
            password: None,
            from_address: from_address.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Email channel for sending alerts via SMTP.
#[derive(Debug, Clone)]
pub struct SmtpEmailChannel {
    config: SmtpConfig,
}

impl SmtpEmailChannel {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        config
            .from_address
            .parse::<lettre::message::Mailbox>()
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid from address: {}", e)))?;
        Ok(Self { config })
    }

    fn build_message(&self, to: &str, content: &NotificationContent) -> Result<lettre::Message> {
        let from_mailbox: lettre::message::Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid from address: {}", e)))?;
        let to_mailbox: lettre::message::Mailbox = to
            .parse()
            .map_err(|e| Error::MissingRecipient(format!("Invalid email address {}: {}", to, e)))?;

        lettre::Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(content.email_subject.clone())
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_PLAIN)
                            .body(content.text.clone()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(lettre::message::header::ContentType::TEXT_HTML)
                            .body(content.email_html.clone()),
                    ),
            )
            .map_err(|e| Error::SendFailed(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl NotificationChannel for SmtpEmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn transport(&self) -> &str {
        "smtp"
    }

    async fn deliver(
        &self,
        _account_id: &str,
        content: &NotificationContent,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let address = settings.email.address.trim();
        if address.is_empty() {
            return Err(Error::MissingRecipient(
                "No email address configured".to_string(),
            ));
        }

        let email = self.build_message(address, content)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let mut builder = lettre::SmtpTransport::relay(&config.host)
                .map_err(|e| Error::SendFailed(format!("Invalid SMTP server: {}", e)))?
                .port(config.port);
            if let (Some(username), Some(password)) = (config.username, config.password) {
                builder = builder.credentials(
                    lettre::transport::smtp::authentication::Credentials::new(username, password),
                );
            }
            let mailer = builder.build();

            lettre::Transport::send(&mailer, &email)
                .map_err(|e| Error::Transport(format!("Failed to send email: {}", e)))?;

            Ok::<(), Error>(())
        })
        .await
        .map_err(|e| Error::SendFailed(format!("Task join error: {}", e)))?
    }
}
