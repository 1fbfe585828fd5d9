// Notification types
// Alert dispatch messages and the push-notification payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Emitted by the detection session each time an alert is raised
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDispatch {
    pub session_id: Uuid,
    pub label: String,
    pub confidence: f32,
    pub raised_at: DateTime<Utc>,
}

impl AlertDispatch {
    pub fn new(session_id: Uuid, label: impl Into<String>, confidence: f32) -> Self {
        AlertDispatch {
            session_id,
            label: label.into(),
            confidence,
            raised_at: Utc::now(),
        }
    }
}

/// JSON body POSTed to the notification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub label: String,
    pub location: Coordinates,
}

impl PushNotification {
    pub fn new(label: impl Into<String>, location: Coordinates) -> Self {
        PushNotification {
            label: label.into(),
            location,
        }
    }
}
