// Notification worker
// Consumes alert dispatches off the detection thread: locate, then send, fire-and-forget

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::notify::geolocation::{GeolocationError, GeolocationProvider};
use crate::notify::transport::NotificationTransport;
use crate::notify::types::{AlertDispatch, PushNotification};

pub type AlertSender = mpsc::UnboundedSender<AlertDispatch>;
pub type AlertReceiver = mpsc::UnboundedReceiver<AlertDispatch>;

/// Channel between the detection session and the notification worker
pub fn alert_channel() -> (AlertSender, AlertReceiver) {
    mpsc::unbounded_channel()
}

/// What happened to one dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Sent,

    /// Position unavailable or denied; dispatch dropped silently
    NoLocation(GeolocationError),

    /// Transport error; not retried
    Failed(String),
}

/// Resolves a position for each dispatch and hands it to the transport
pub struct NotificationWorker<G, T> {
    geolocation: Arc<G>,
    transport: Arc<T>,
}

impl<G, T> Clone for NotificationWorker<G, T> {
    fn clone(&self) -> Self {
        NotificationWorker {
            geolocation: Arc::clone(&self.geolocation),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<G: GeolocationProvider, T: NotificationTransport> NotificationWorker<G, T> {
    pub fn new(geolocation: G, transport: T) -> Self {
        NotificationWorker {
            geolocation: Arc::new(geolocation),
            transport: Arc::new(transport),
        }
    }

    /// Deliver a single dispatch
    pub async fn deliver(&self, dispatch: AlertDispatch) -> DeliveryOutcome {
        let location = match self.geolocation.current_position().await {
            Ok(location) => location,
            Err(e) => {
                log::debug!("Dropping {} notification: {}", dispatch.label, e);
                return DeliveryOutcome::NoLocation(e);
            }
        };

        let notification = PushNotification::new(dispatch.label, location);
        match self.transport.send(&notification).await {
            Ok(()) => {
                log::info!("Notification sent for {}", notification.label);
                DeliveryOutcome::Sent
            }
            Err(e) => {
                log::warn!("Notification for {} failed: {}", notification.label, e);
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }

    /// Handle dispatches until every sender is dropped
    /// Each dispatch runs in its own task; in-flight requests are not awaited.
    pub async fn run(self, mut receiver: AlertReceiver) {
        while let Some(dispatch) = receiver.recv().await {
            let worker = self.clone();
            tokio::spawn(async move {
                worker.deliver(dispatch).await;
            });
        }
        log::debug!("Alert channel closed; notification worker exiting");
    }

    pub fn spawn(self, receiver: AlertReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::geolocation::{SharedLocation, StaticLocation};
    use crate::notify::transport::NotifyError;
    use crate::notify::types::Coordinates;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    /// Transport that records notifications instead of sending them
    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<PushNotification>>>,
    }

    impl NotificationTransport for RecordingTransport {
        async fn send(&self, notification: &PushNotification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn dispatch(label: &str) -> AlertDispatch {
        AlertDispatch::new(Uuid::new_v4(), label, 0.9)
    }

    #[tokio::test]
    async fn test_deliver_with_location() {
        let transport = RecordingTransport::default();
        let here = Coordinates::new(48.85, 2.35);
        let worker = NotificationWorker::new(StaticLocation::new(Some(here)), transport.clone());

        assert_eq!(
            worker.deliver(dispatch("Explosion or Gunshot")).await,
            DeliveryOutcome::Sent
        );

        let sent = transport.sent.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[PushNotification::new("Explosion or Gunshot", here)]
        );
    }

    #[tokio::test]
    async fn test_no_location_drops_dispatch() {
        let transport = RecordingTransport::default();
        let location = SharedLocation::new();
        location.report_denied();
        let worker = NotificationWorker::new(location, transport.clone());

        assert_eq!(
            worker.deliver(dispatch("Distress Screams")).await,
            DeliveryOutcome::NoLocation(GeolocationError::PermissionDenied)
        );
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_dispatch_uses_latest_position() {
        let transport = RecordingTransport::default();
        let location = SharedLocation::new();
        let worker = NotificationWorker::new(location.clone(), transport.clone());

        let start = Coordinates::new(52.52, 13.40);
        location.report(start);
        worker.deliver(dispatch("Traffic Collision")).await;

        // Host moved while listening
        let moved = Coordinates::new(52.50, 13.45);
        location.report(moved);
        worker.deliver(dispatch("Explosion or Gunshot")).await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].location, start);
        assert_eq!(sent[1].location, moved);
    }

    #[tokio::test]
    async fn test_transport_failure_reported() {
        // Nothing listens on the local discard port
        let transport =
            crate::notify::transport::HttpTransport::new("http://127.0.0.1:9/send-notification")
                .unwrap();
        let worker =
            NotificationWorker::new(StaticLocation::new(Some(Coordinates::new(0.0, 0.0))), transport);

        assert!(matches!(
            worker.deliver(dispatch("Traffic Collision")).await,
            DeliveryOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_run_handles_every_dispatch() {
        let transport = RecordingTransport::default();
        let worker = NotificationWorker::new(
            StaticLocation::new(Some(Coordinates::new(1.0, 2.0))),
            transport.clone(),
        );
        let (sender, receiver) = alert_channel();
        let handle = worker.spawn(receiver);

        sender.send(dispatch("Traffic Collision")).unwrap();
        sender.send(dispatch("Explosion or Gunshot")).unwrap();
        drop(sender);
        handle.await.unwrap();

        // Deliveries run in detached tasks; give them a moment
        for _ in 0..50 {
            if transport.sent.lock().unwrap().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let mut labels: Vec<String> = transport
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.label.clone())
            .collect();
        labels.sort();
        assert_eq!(labels, vec!["Explosion or Gunshot", "Traffic Collision"]);
    }
}
