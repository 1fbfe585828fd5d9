// Classifier abstraction
// Subscription interface to a streaming audio classifier and its listen options

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::detection::confidence::top_label;
use crate::detection::types::ClassificationFrame;

/// Word labels the classifier reserves for non-events
pub const NOISE_LABELS: [&str; 2] = ["_background_noise_", "_unknown_"];

/// Errors raised while loading or subscribing to a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Invalid model base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Model resource unreachable: {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model resource {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed model resource {url}: {reason}")]
    MalformedResource { url: String, reason: String },

    #[error("Invalid listen options: {0}")]
    InvalidOptions(String),

    #[error("Classifier is already listening")]
    AlreadyListening,
}

/// Subscription options passed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListenOptions {
    /// Attach the spectrogram window to every frame (required for rendering)
    pub include_spectrogram: bool,

    /// Minimum top score for a frame to be delivered
    /// Looser than the alert threshold so partial scores still render.
    pub probability_threshold: f32,

    /// Deliver frames whose top label is background noise or unknown
    pub invoke_callback_on_noise_and_unknown: bool,

    /// Overlap between consecutive analysis windows [0, 1)
    pub overlap_factor: f32,
}

impl Default for ListenOptions {
    fn default() -> Self {
        ListenOptions {
            include_spectrogram: true,
            probability_threshold: 0.5,
            invoke_callback_on_noise_and_unknown: true,
            overlap_factor: 0.5,
        }
    }
}

impl ListenOptions {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !self.include_spectrogram {
            return Err(ClassifierError::InvalidOptions(
                "spectrogram output is required for rendering".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.probability_threshold) {
            return Err(ClassifierError::InvalidOptions(format!(
                "probability threshold {} outside [0, 1]",
                self.probability_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.overlap_factor) {
            return Err(ClassifierError::InvalidOptions(format!(
                "overlap factor {} outside [0, 1)",
                self.overlap_factor
            )));
        }
        Ok(())
    }

    /// Whether a frame passes the classifier's callback filter
    pub fn admits(&self, frame: &ClassificationFrame) -> bool {
        let Some(top) = top_label(&frame.scores) else {
            return false;
        };

        if !self.invoke_callback_on_noise_and_unknown && NOISE_LABELS.contains(&top.label.as_str())
        {
            return false;
        }

        top.confidence >= self.probability_threshold
    }
}

/// Producer end of a frame subscription
/// Holds at most one undelivered frame; newer frames are dropped until the
/// consumer catches up.
#[derive(Debug, Clone)]
pub struct FrameSink {
    sender: mpsc::Sender<ClassificationFrame>,
    options: ListenOptions,
}

impl FrameSink {
    /// Deliver a frame, returning whether it reached the consumer's queue
    pub fn deliver(&self, frame: ClassificationFrame) -> bool {
        if !self.options.admits(&frame) {
            return false;
        }

        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::debug!("Frame dropped: previous frame still being handled");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub fn options(&self) -> &ListenOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Create a subscription channel for the given options
pub fn frame_channel(options: ListenOptions) -> (FrameSink, mpsc::Receiver<ClassificationFrame>) {
    let (sender, receiver) = mpsc::channel(1);
    (FrameSink { sender, options }, receiver)
}

/// A loaded streaming classifier
pub trait AudioClassifier: Send {
    /// Class labels in score-vector order
    fn word_labels(&self) -> &[String];

    /// Start delivering frames into `sink`
    fn listen(&mut self, sink: FrameSink) -> Result<(), ClassifierError>;

    /// Stop delivering frames; no-op when not listening
    fn stop_listening(&mut self);

    fn is_listening(&self) -> bool;
}

/// Loads a classifier handle (e.g. fetching its model descriptors)
pub trait ClassifierLoader {
    type Classifier: AudioClassifier;

    fn load(&self) -> impl Future<Output = Result<Self::Classifier, ClassifierError>> + Send;
}
