use crate::config::AppConfig;
use crate::services::mailer::{Mailer, NoopMailer, create_mailer};
use std::sync::Arc;
use tracing::info;

pub async fn setup_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    let mailer_service = match create_mailer(config) {
        Ok(mailer) => mailer,
        Err(e) => {
            tracing::warn!("⚠️  Mailer setup failed ({}), using NoopMailer", e);
            Box::new(NoopMailer)
        }
    };

    // Warm up the relay connection
    if config.mailer_type == "smtp" {
        if mailer_service.health_check().await {
            info!("📧 SMTP relay connected successfully");
        } else {
            tracing::warn!(
                "⚠️  SMTP relay unreachable! Welcome and password-reset emails may be dropped."
            );
        }
    }

    mailer_service.into()
}
