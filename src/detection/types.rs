// Detection data types
// Classification frames, spectrogram grids and label scores delivered by the classifier

use serde::{Deserialize, Serialize};

/// Confidence of one class label within a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,

    /// Classifier probability [0.0, 1.0]
    pub confidence: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        LabelScore {
            label: label.into(),
            confidence,
        }
    }
}

/// Spectrogram window attached to a frame
/// Flat, time-major grid: `data[t * frame_size + f]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spectrogram {
    /// Normalized magnitudes in [-1.0, 1.0]
    pub data: Vec<f32>,

    /// Number of frequency bins per time step
    pub frame_size: usize,
}

impl Spectrogram {
    pub fn new(data: Vec<f32>, frame_size: usize) -> Self {
        Spectrogram { data, frame_size }
    }

    /// Number of complete time steps in the grid
    pub fn time_steps(&self) -> usize {
        if self.frame_size == 0 {
            return 0;
        }
        self.data.len() / self.frame_size
    }

    /// Magnitude at time step `t`, frequency bin `f`
    pub fn magnitude(&self, t: usize, f: usize) -> Option<f32> {
        if f >= self.frame_size {
            return None;
        }
        self.data.get(t * self.frame_size + f).copied()
    }
}

/// Frame as emitted by a host classifier: scores are ordered like the word labels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFrame {
    pub scores: Vec<f32>,
    #[serde(default)]
    pub spectrogram: Spectrogram,
}

/// One classification result, consumed once by the detection session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationFrame {
    pub scores: Vec<LabelScore>,
    pub spectrogram: Spectrogram,
}

impl ClassificationFrame {
    pub fn new(scores: Vec<LabelScore>, spectrogram: Spectrogram) -> Self {
        ClassificationFrame {
            scores,
            spectrogram,
        }
    }

    /// Attach word labels to a raw score vector
    /// Scores beyond the label list (or labels beyond the scores) are ignored
    pub fn from_raw(labels: &[String], raw: RawFrame) -> Self {
        let scores = labels
            .iter()
            .zip(raw.scores)
            .map(|(label, confidence)| LabelScore::new(label.clone(), confidence))
            .collect();

        ClassificationFrame {
            scores,
            spectrogram: raw.spectrogram,
        }
    }
}

/// Arg-max label of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLabel {
    /// Position of the label in the frame's score vector
    pub index: usize,
    pub label: String,
    pub confidence: f32,
}
