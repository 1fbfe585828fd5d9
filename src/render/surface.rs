// Rendering surfaces
// Where the detection session draws spectrograms, label rows and alert text

use serde::Serialize;

use crate::render::labels::{alert_text, LabelRow};
use crate::render::spectrogram::SpectrogramImage;

/// Sink for visible UI updates
/// Holds no state beyond the currently visible frame.
pub trait RenderSurface {
    /// Lay out one (empty) row per class label
    fn prepare(&mut self, labels: &[String]);

    fn draw_spectrogram(&mut self, image: &SpectrogramImage);

    fn show_labels(&mut self, rows: &[LabelRow]);

    /// Show the alert banner for a label, or hide it with `None`
    fn show_alert(&mut self, label: Option<&str>);

    /// Wipe everything visible
    fn clear(&mut self);
}

/// Visible alert banner
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertBanner {
    pub text: String,
    pub opacity: f32,
}

impl AlertBanner {
    /// Visible banner for a label, hidden banner for `None`
    pub fn for_label(label: Option<&str>) -> Self {
        match label {
            Some(label) => AlertBanner {
                text: alert_text(label),
                opacity: 1.0,
            },
            None => AlertBanner::default(),
        }
    }
}

/// In-memory surface keeping a snapshot of the visible frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotSurface {
    pub labels: Vec<String>,
    pub spectrogram: Option<SpectrogramImage>,
    pub rows: Vec<LabelRow>,
    pub banner: AlertBanner,

    /// Frames drawn since the surface was last cleared
    pub frames_drawn: usize,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_visible(&self) -> bool {
        self.banner.opacity > 0.0
    }
}

impl RenderSurface for SnapshotSurface {
    fn prepare(&mut self, labels: &[String]) {
        self.labels = labels.to_vec();
        self.rows.clear();
    }

    fn draw_spectrogram(&mut self, image: &SpectrogramImage) {
        self.spectrogram = Some(image.clone());
        self.frames_drawn += 1;
    }

    fn show_labels(&mut self, rows: &[LabelRow]) {
        self.rows = rows.to_vec();
    }

    fn show_alert(&mut self, label: Option<&str>) {
        self.banner = AlertBanner::for_label(label);
    }

    fn clear(&mut self) {
        *self = SnapshotSurface::default();
    }
}
