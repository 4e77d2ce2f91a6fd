//! Customer notifications.
//!
//! Availability emails are rendered from Askama templates and delivered
//! through a [`Notifier`]. Production uses [`EmailService`] (SMTP via lettre);
//! without SMTP settings the server falls back to [`LogNotifier`], which
//! writes the rendered message to the log.

use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use r4c_core::{Email, RobotCode};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::{EmailConfig, SmtpConfig};

/// Subject line of the availability email.
pub const ROBOT_AVAILABLE_SUBJECT: &str = "Робот доступен к покупке!";

/// HTML template for the availability email.
#[derive(Template)]
#[template(path = "email/robot_available.html")]
struct RobotAvailableHtml<'a> {
    model: &'a str,
    version: &'a str,
}

/// Plain text template for the availability email.
#[derive(Template)]
#[template(path = "email/robot_available.txt")]
struct RobotAvailableText<'a> {
    model: &'a str,
    version: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// "The robot you asked about is in stock" addressed to one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: Email,
    pub model: RobotCode,
    pub version: RobotCode,
}

/// A notification rendered into its final subject and bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub to: String,
    pub subject: &'static str,
    pub text: String,
    pub html: String,
}

impl Notification {
    /// Render subject, plain text and HTML bodies.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if a template fails to render.
    pub fn render(&self) -> Result<RenderedEmail, EmailError> {
        let model = self.model.as_str();
        let version = self.version.as_str();

        Ok(RenderedEmail {
            to: self.to.to_string(),
            subject: ROBOT_AVAILABLE_SUBJECT,
            text: RobotAvailableText { model, version }.render()?,
            html: RobotAvailableHtml { model, version }.render()?,
        })
    }
}

/// Delivers notifications to customers.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if rendering or delivery fails.
    async fn send(&self, notification: &Notification) -> Result<(), EmailError>;
}

/// SMTP email delivery.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service sending from `from_address` through `smtp`.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(smtp: &SmtpConfig, from_address: &str) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            smtp.username.clone(),
            smtp.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: from_address.to_string(),
        })
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(&self, email: &RenderedEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?)
            .subject(email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html.clone()),
                    ),
            )?;

        self.mailer.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(&self, notification: &Notification) -> Result<(), EmailError> {
        self.send_multipart_email(&notification.render()?).await
    }
}

/// Writes rendered notifications to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    from_address: String,
}

impl LogNotifier {
    #[must_use]
    pub const fn new(from_address: String) -> Self {
        Self { from_address }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), EmailError> {
        let email = notification.render()?;
        tracing::info!(
            from = %self.from_address,
            to = %email.to,
            subject = %email.subject,
            body = %email.text,
            "Email not sent (no SMTP configured)"
        );
        Ok(())
    }
}

/// Pick the notifier for `config`: SMTP when a relay is configured, the log
/// otherwise.
///
/// # Errors
///
/// Returns error if the SMTP relay cannot be configured.
pub fn notifier_from_config(config: &EmailConfig) -> Result<Arc<dyn Notifier>, SmtpError> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "Email delivery via SMTP");
            Ok(Arc::new(EmailService::new(smtp, &config.from_address)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will be written to the log");
            Ok(Arc::new(LogNotifier::new(config.from_address.clone())))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            to: Email::parse("buyer@robots.io").unwrap(),
            model: RobotCode::new("R2").unwrap(),
            version: RobotCode::new("D2").unwrap(),
        }
    }

    #[test]
    fn test_render_mentions_model_and_version() {
        let email = notification().render().unwrap();

        assert_eq!(email.to, "buyer@robots.io");
        assert_eq!(email.subject, "Робот доступен к покупке!");
        assert!(email.text.starts_with("Здравствуйте!"));
        assert!(
            email
                .text
                .contains("нашим роботом модели R2, версии D2.")
        );
        assert!(email.html.contains("<strong>R2</strong>"));
        assert!(email.html.contains("<strong>D2</strong>"));
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_message() {
        let notifier = LogNotifier::new("info@robocomplex.com".to_string());
        assert!(notifier.send(&notification()).await.is_ok());
    }
}
