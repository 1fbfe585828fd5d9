// Webview surface
// Forwards render updates to the frontend as Tauri events

use tauri::{AppHandle, Emitter};

use crate::render::labels::LabelRow;
use crate::render::spectrogram::SpectrogramImage;
use crate::render::surface::{AlertBanner, RenderSurface};

pub const EVENT_PREPARE: &str = "detection://prepare";
pub const EVENT_SPECTROGRAM: &str = "detection://spectrogram";
pub const EVENT_LABELS: &str = "detection://labels";
pub const EVENT_ALERT: &str = "detection://alert";
pub const EVENT_CLEAR: &str = "detection://clear";

pub struct WebviewSurface {
    app: AppHandle,
}

impl WebviewSurface {
    pub fn new(app: AppHandle) -> Self {
        WebviewSurface { app }
    }

    fn emit<P: serde::Serialize + Clone>(&self, event: &str, payload: P) {
        if let Err(e) = self.app.emit(event, payload) {
            log::error!("Failed to emit {}: {}", event, e);
        }
    }
}

impl RenderSurface for WebviewSurface {
    fn prepare(&mut self, labels: &[String]) {
        self.emit(EVENT_PREPARE, labels);
    }

    fn draw_spectrogram(&mut self, image: &SpectrogramImage) {
        self.emit(EVENT_SPECTROGRAM, image);
    }

    fn show_labels(&mut self, rows: &[LabelRow]) {
        self.emit(EVENT_LABELS, rows);
    }

    fn show_alert(&mut self, label: Option<&str>) {
        self.emit(EVENT_ALERT, AlertBanner::for_label(label));
    }

    fn clear(&mut self) {
        self.emit(EVENT_CLEAR, ());
    }
}
