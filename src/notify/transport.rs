// Push-notification transport
// Delivers an alert label and position to the notification endpoint

use reqwest::Url;
use std::future::Future;
use thiserror::Error;

use crate::notify::types::PushNotification;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid notification endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Outbound delivery of a push notification
pub trait NotificationTransport: Send + Sync + 'static {
    fn send(
        &self,
        notification: &PushNotification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// POSTs the notification as JSON
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self, NotifyError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| NotifyError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        Ok(HttpTransport {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl NotificationTransport for HttpTransport {
    async fn send(&self, notification: &PushNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await?;

        // No response contract; status is informational only
        log::debug!(
            "Notification for {} answered with {}",
            notification.label,
            response.status()
        );
        Ok(())
    }
}
