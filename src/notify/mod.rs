// Notification module
// Geolocated push notifications for raised alerts

pub mod geolocation;
pub mod transport;
pub mod types;
pub mod worker;

pub use geolocation::{GeolocationError, GeolocationProvider, SharedLocation, StaticLocation};
pub use transport::{HttpTransport, NotificationTransport, NotifyError};
pub use types::{AlertDispatch, Coordinates, PushNotification};
pub use worker::{alert_channel, AlertReceiver, AlertSender, DeliveryOutcome, NotificationWorker};
