// Host-bridged classifier
// The model runs outside this process (webview, test script) and pushes frames in

use std::sync::{Arc, Mutex, PoisonError};

use crate::classifier::backend::{AudioClassifier, ClassifierError, ClassifierLoader, FrameSink};
use crate::detection::types::{ClassificationFrame, RawFrame};

#[derive(Debug, Default)]
struct BridgeInner {
    labels: Vec<String>,
    sink: Option<FrameSink>,
}

/// Shared entry point through which an external host delivers frames
#[derive(Debug, Clone, Default)]
pub struct FrameBridge {
    inner: Arc<Mutex<BridgeInner>>,
}

impl FrameBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut BridgeInner) -> T) -> T {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner)
    }

    fn attach(&self, labels: &[String], sink: FrameSink) {
        self.with_inner(|inner| {
            inner.labels = labels.to_vec();
            inner.sink = Some(sink);
        });
    }

    fn detach(&self) {
        self.with_inner(|inner| inner.sink = None);
    }

    /// Whether a subscriber is currently attached
    pub fn is_attached(&self) -> bool {
        self.with_inner(|inner| inner.sink.as_ref().is_some_and(|s| !s.is_closed()))
    }

    /// Push a raw score vector; labels are attached from the loaded model
    /// Returns whether the frame was queued for the session.
    pub fn push(&self, raw: RawFrame) -> bool {
        self.with_inner(|inner| match &inner.sink {
            Some(sink) => sink.deliver(ClassificationFrame::from_raw(&inner.labels, raw)),
            None => false,
        })
    }

    /// Push an already-labeled frame
    pub fn push_frame(&self, frame: ClassificationFrame) -> bool {
        self.with_inner(|inner| match &inner.sink {
            Some(sink) => sink.deliver(frame),
            None => false,
        })
    }
}

/// Classifier whose frames arrive through a [`FrameBridge`]
#[derive(Debug)]
pub struct BridgedClassifier {
    labels: Vec<String>,
    bridge: FrameBridge,
    listening: bool,
}

impl BridgedClassifier {
    pub fn new(labels: Vec<String>, bridge: FrameBridge) -> Self {
        BridgedClassifier {
            labels,
            bridge,
            listening: false,
        }
    }

    pub fn bridge(&self) -> &FrameBridge {
        &self.bridge
    }
}

impl AudioClassifier for BridgedClassifier {
    fn word_labels(&self) -> &[String] {
        &self.labels
    }

    fn listen(&mut self, sink: FrameSink) -> Result<(), ClassifierError> {
        if self.listening {
            return Err(ClassifierError::AlreadyListening);
        }
        sink.options().validate()?;

        self.bridge.attach(&self.labels, sink);
        self.listening = true;
        Ok(())
    }

    fn stop_listening(&mut self) {
        if self.listening {
            self.bridge.detach();
            self.listening = false;
        }
    }

    fn is_listening(&self) -> bool {
        self.listening
    }
}

/// Loader for a model whose labels are already known; no network access
#[derive(Debug, Clone)]
pub struct FixedLabelsLoader {
    labels: Vec<String>,
    bridge: FrameBridge,
}

impl FixedLabelsLoader {
    pub fn new<I, S>(labels: I, bridge: FrameBridge) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FixedLabelsLoader {
            labels: labels.into_iter().map(Into::into).collect(),
            bridge,
        }
    }
}

impl ClassifierLoader for FixedLabelsLoader {
    type Classifier = BridgedClassifier;

    async fn load(&self) -> Result<Self::Classifier, ClassifierError> {
        Ok(BridgedClassifier::new(
            self.labels.clone(),
            self.bridge.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::backend::{frame_channel, ListenOptions};
    use crate::detection::types::Spectrogram;

    fn raw(scores: &[f32]) -> RawFrame {
        RawFrame {
            scores: scores.to_vec(),
            spectrogram: Spectrogram::new(vec![0.0; 4], 2),
        }
    }

    #[test]
    fn test_push_without_listener_is_dropped() {
        let bridge = FrameBridge::new();
        assert!(!bridge.is_attached());
        assert!(!bridge.push(raw(&[0.9])));
    }

    #[test]
    fn test_listen_attaches_labels() {
        let bridge = FrameBridge::new();
        let mut classifier =
            BridgedClassifier::new(vec!["Noise".into(), "Explosion or Gunshot".into()], bridge.clone());
        let (sink, mut receiver) = frame_channel(ListenOptions::default());

        classifier.listen(sink).unwrap();
        assert!(classifier.is_listening());
        assert!(bridge.push(raw(&[0.1, 0.9])));

        let frame = receiver.try_recv().unwrap();
        assert_eq!(frame.scores[1].label, "Explosion or Gunshot");
        assert_eq!(frame.spectrogram.time_steps(), 2);
    }

    #[test]
    fn test_listen_twice_fails() {
        let mut classifier = BridgedClassifier::new(vec!["A".into()], FrameBridge::new());
        let (sink, _receiver) = frame_channel(ListenOptions::default());
        classifier.listen(sink.clone()).unwrap();
        assert!(matches!(
            classifier.listen(sink),
            Err(ClassifierError::AlreadyListening)
        ));
    }

    #[test]
    fn test_listen_rejects_invalid_options() {
        let mut classifier = BridgedClassifier::new(vec!["A".into()], FrameBridge::new());
        let (sink, _receiver) = frame_channel(ListenOptions {
            include_spectrogram: false,
            ..Default::default()
        });
        assert!(classifier.listen(sink).is_err());
        assert!(!classifier.is_listening());
    }

    #[test]
    fn test_stop_detaches() {
        let bridge = FrameBridge::new();
        let mut classifier = BridgedClassifier::new(vec!["A".into()], bridge.clone());
        let (sink, _receiver) = frame_channel(ListenOptions::default());
        classifier.listen(sink).unwrap();

        classifier.stop_listening();
        assert!(!classifier.is_listening());
        assert!(!bridge.push(raw(&[0.9])));

        // Second stop is a no-op
        classifier.stop_listening();
    }

    #[tokio::test]
    async fn test_fixed_labels_loader() {
        let loader = FixedLabelsLoader::new(["A", "B"], FrameBridge::new());
        let classifier = loader.load().await.unwrap();
        assert_eq!(classifier.word_labels(), &["A".to_string(), "B".to_string()]);
    }
}
