// Detection module
// Top-label evaluation, alert debouncing and the detection session lifecycle

pub mod confidence;
pub mod debounce;
pub mod session;
pub mod types;

pub use confidence::top_label;
pub use debounce::{AlertDebouncer, AlertDecision, AlertPolicy, AlertState};
pub use session::{DetectionSession, FrameOutcome, SessionError, SessionState};
pub use types::{ClassificationFrame, LabelScore, RawFrame, Spectrogram, TopLabel};
