use anyhow::Result;
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::AppConfig;

/// Outbound transactional email. Callers must treat failures as
/// recoverable: a broken mailer never aborts a signup or a password-reset
/// request.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, to: &str, name: &str) -> Result<()>;

    async fn send_password_reset(&self, to: &str, token: &str, name: &str) -> Result<()>;

    /// Check if the mail relay is reachable
    async fn health_check(&self) -> bool;
}

/// SMTP mailer over a pooled async transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    client_url: String,
}

impl SmtpMailer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?;
        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.smtp_from.parse()?,
            client_url: config.client_url.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_welcome(&self, to: &str, name: &str) -> Result<()> {
        let name = if name.is_empty() { "there" } else { name };
        let html = format!(
            "<h2>Welcome to Streamhub!</h2>\
             <p>Hi {name},</p>\
             <p>Your account is ready. Start exploring the catalog in the free \
             category and discover premium content.</p>\
             <p><a href=\"{url}\">Start watching</a></p>",
            name = name,
            url = self.client_url,
        );

        self.send(to, "Welcome to Streamhub!", html).await?;
        tracing::info!("Welcome email sent to {}", to);
        Ok(())
    }

    async fn send_password_reset(&self, to: &str, token: &str, name: &str) -> Result<()> {
        let name = if name.is_empty() { "User" } else { name };
        let reset_url = format!("{}/reset-password?token={}", self.client_url, token);
        let html = format!(
            "<h2>Password Reset Request</h2>\
             <p>Hello {name},</p>\
             <p>We received a request to reset your password. Click the link \
             below to create a new one. If you didn't request this, ignore \
             this email and your password stays unchanged.</p>\
             <p><a href=\"{url}\">Reset Password</a></p>\
             <p>The link expires shortly after it was requested.</p>",
            name = name,
            url = reset_url,
        );

        self.send(to, "Password Reset Request", html).await?;
        tracing::info!("Password reset email sent to {}", to);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.transport.test_connection().await.unwrap_or(false)
    }
}

/// Mailer that drops everything on the floor (development and tests)
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_welcome(&self, to: &str, _name: &str) -> Result<()> {
        tracing::warn!("NoopMailer: skipping welcome email to {}", to);
        Ok(())
    }

    async fn send_password_reset(&self, to: &str, _token: &str, _name: &str) -> Result<()> {
        tracing::warn!("NoopMailer: skipping password reset email to {}", to);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Factory function to create the appropriate mailer based on config
pub fn create_mailer(config: &AppConfig) -> Result<Box<dyn Mailer>> {
    match config.mailer_type.to_lowercase().as_str() {
        "smtp" => Ok(Box::new(SmtpMailer::new(config)?)),
        "noop" | "none" | "disabled" => Ok(Box::new(NoopMailer)),
        other => {
            tracing::warn!("Unknown mailer type '{}', using NoopMailer", other);
            Ok(Box::new(NoopMailer))
        }
    }
}
