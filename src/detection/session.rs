// Detection session
// Binds the classifier subscription to rendering, alert debouncing and notification dispatch

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::classifier::{
    frame_channel, AudioClassifier, ClassifierError, ClassifierLoader, ListenOptions,
};
use crate::detection::confidence::top_label;
use crate::detection::debounce::{AlertDebouncer, AlertDecision, AlertPolicy, AlertState};
use crate::detection::types::{ClassificationFrame, TopLabel};
use crate::notify::{AlertDispatch, AlertSender};
use crate::render::{label_rows, rasterize, RenderSurface};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(#[source] ClassifierError),

    #[error("Subscription failed: {0}")]
    Subscribe(#[source] ClassifierError),
}

/// Listening state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Stopped,
    Listening,
}

impl SessionState {
    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening)
    }
}

/// Result of handling one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub top: Option<TopLabel>,
    pub decision: AlertDecision,
}

/// One detection session: a classifier subscription plus its UI and alert state
pub struct DetectionSession<L: ClassifierLoader, S: RenderSurface> {
    id: Uuid,
    loader: L,
    classifier: Option<L::Classifier>,
    frames: Option<mpsc::Receiver<ClassificationFrame>>,
    state: SessionState,
    options: ListenOptions,
    debouncer: AlertDebouncer,
    surface: S,
    alerts: AlertSender,
}

impl<L: ClassifierLoader, S: RenderSurface> DetectionSession<L, S> {
    pub fn new(
        loader: L,
        surface: S,
        policy: AlertPolicy,
        options: ListenOptions,
        alerts: AlertSender,
    ) -> Self {
        DetectionSession {
            id: Uuid::new_v4(),
            loader,
            classifier: None,
            frames: None,
            state: SessionState::Stopped,
            options,
            debouncer: AlertDebouncer::new(policy),
            surface,
            alerts,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn alert_state(&self) -> &AlertState {
        self.debouncer.state()
    }

    pub fn listen_options(&self) -> &ListenOptions {
        &self.options
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Labels of the loaded classifier; empty before the first start
    pub fn labels(&self) -> &[String] {
        self.classifier
            .as_ref()
            .map(|c| c.word_labels())
            .unwrap_or(&[])
    }

    /// Whether a classifier handle has been loaded and cached
    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Subscribe to the classifier, loading it on first use
    /// No-op while already listening. On failure the session stays stopped.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state.is_listening() {
            return Ok(());
        }

        if self.classifier.is_none() {
            let classifier = self.loader.load().await.map_err(SessionError::ModelLoad)?;
            self.classifier = Some(classifier);
        }
        let Some(classifier) = self.classifier.as_mut() else {
            return Ok(());
        };

        let (sink, frames) = frame_channel(self.options.clone());
        classifier.listen(sink).map_err(SessionError::Subscribe)?;

        self.surface.prepare(classifier.word_labels());
        self.frames = Some(frames);
        self.state = SessionState::Listening;

        log::info!(
            "Detection session {} listening ({} labels)",
            self.id,
            classifier.word_labels().len()
        );
        Ok(())
    }

    /// Unsubscribe and clear all visible and alert state
    /// No-op while stopped.
    pub fn stop(&mut self) {
        if !self.state.is_listening() {
            return;
        }

        if let Some(classifier) = self.classifier.as_mut() {
            classifier.stop_listening();
        }
        self.frames = None;
        self.surface.clear();
        self.debouncer.reset();
        self.state = SessionState::Stopped;

        log::info!("Detection session {} stopped", self.id);
    }

    /// Alternate between start and stop
    pub async fn toggle(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Stopped => self.start().await?,
            SessionState::Listening => self.stop(),
        }
        Ok(self.state)
    }

    /// Handle one classification frame
    /// Returns `None` while the session is stopped.
    pub fn handle_frame(&mut self, frame: ClassificationFrame) -> Option<FrameOutcome> {
        if !self.state.is_listening() {
            return None;
        }

        self.surface.draw_spectrogram(&rasterize(&frame.spectrogram));

        let top = top_label(&frame.scores);
        self.surface
            .show_labels(&label_rows(&frame.scores, top.as_ref()));

        let decision = self.debouncer.observe(top.as_ref());
        match &decision {
            AlertDecision::Raise(label) => {
                let confidence = top.as_ref().map(|t| t.confidence).unwrap_or_default();
                log::warn!("Alert raised: {} ({:.2})", label, confidence);
                self.dispatch(label, confidence);
                self.surface.show_alert(Some(label.as_str()));
            }
            AlertDecision::Sustain(label) => self.surface.show_alert(Some(label.as_str())),
            AlertDecision::Clear => {
                log::info!("Alert cleared");
                self.surface.show_alert(None);
            }
            AlertDecision::Idle => {}
        }

        Some(FrameOutcome { top, decision })
    }

    fn dispatch(&self, label: &str, confidence: f32) {
        if self
            .alerts
            .send(AlertDispatch::new(self.id, label, confidence))
            .is_err()
        {
            log::debug!("Notification worker gone; dispatch for {} dropped", label);
        }
    }

    /// Handle every frame already delivered, without waiting
    pub fn pump(&mut self) -> Vec<FrameOutcome> {
        let mut outcomes = Vec::new();
        while let Some(frame) = self.frames.as_mut().and_then(|f| f.try_recv().ok()) {
            if let Some(outcome) = self.handle_frame(frame) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Wait for the next frame and handle it
    /// Returns `None` once the session is stopped or the stream ends.
    pub async fn next_frame(&mut self) -> Option<FrameOutcome> {
        let frame = self.frames.as_mut()?.recv().await?;
        self.handle_frame(frame)
    }
}
