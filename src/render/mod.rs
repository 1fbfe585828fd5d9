// Render module
// Spectrogram rasterization, label rows and the surfaces they are drawn on

pub mod labels;
pub mod spectrogram;
pub mod surface;
#[cfg(feature = "desktop")]
pub mod webview;

pub use labels::{alert_text, label_rows, LabelRow, Rgba};
pub use spectrogram::{intensity, rasterize, SpectrogramImage};
pub use surface::{AlertBanner, RenderSurface, SnapshotSurface};
#[cfg(feature = "desktop")]
pub use webview::WebviewSurface;
