// Alert debouncing
// Turns the per-frame top label into an edge-triggered alert signal

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::detection::types::TopLabel;

/// Labels that trigger a notification by default
pub const DEFAULT_ALERT_LABELS: [&str; 3] =
    ["Distress Screams", "Traffic Collision", "Explosion or Gunshot"];

/// Confidence a top label must exceed to raise an alert
pub const DEFAULT_ALERT_THRESHOLD: f32 = 0.75;

/// Which frames count as dangerous
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPolicy {
    /// Strict lower bound on the top confidence
    pub threshold: f32,

    /// Labels considered dangerous enough to notify
    pub alert_labels: BTreeSet<String>,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        AlertPolicy {
            threshold: DEFAULT_ALERT_THRESHOLD,
            alert_labels: DEFAULT_ALERT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AlertPolicy {
    /// Alert predicate: score above threshold and label in the alert set
    pub fn qualifies(&self, label: &str, confidence: f32) -> bool {
        confidence > self.threshold && self.alert_labels.contains(label)
    }
}

/// Last alerted label; empty while idle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertState {
    pub current_alert_label: Option<String>,
}

impl AlertState {
    pub fn is_alerting(&self) -> bool {
        self.current_alert_label.is_some()
    }
}

/// Outcome of feeding one frame to the debouncer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum AlertDecision {
    /// Entered (or switched) alert state; dispatch a notification
    Raise(String),

    /// Same qualifying label as the previous frame; duplicate suppressed
    Sustain(String),

    /// Alert state left; hide the alert text
    Clear,

    /// Nothing to alert and nothing alerted before
    Idle,
}

impl AlertDecision {
    /// Whether this decision carries a notification dispatch
    pub fn dispatches(&self) -> bool {
        matches!(self, AlertDecision::Raise(_))
    }

    /// Label whose alert text should be visible after this decision
    pub fn visible_label(&self) -> Option<&str> {
        match self {
            AlertDecision::Raise(label) | AlertDecision::Sustain(label) => Some(label),
            AlertDecision::Clear | AlertDecision::Idle => None,
        }
    }
}

/// Single-frame debounce over the alert predicate
#[derive(Debug, Clone, Default)]
pub struct AlertDebouncer {
    policy: AlertPolicy,
    state: AlertState,
}

impl AlertDebouncer {
    pub fn new(policy: AlertPolicy) -> Self {
        AlertDebouncer {
            policy,
            state: AlertState::default(),
        }
    }

    /// Evaluate the current frame's top label
    /// A missing top label counts as a non-qualifying frame.
    pub fn observe(&mut self, top: Option<&TopLabel>) -> AlertDecision {
        let qualifying = top.filter(|t| self.policy.qualifies(&t.label, t.confidence));

        let Some(top) = qualifying else {
            return match self.state.current_alert_label.take() {
                Some(_) => AlertDecision::Clear,
                None => AlertDecision::Idle,
            };
        };

        if self.state.current_alert_label.as_deref() == Some(top.label.as_str()) {
            return AlertDecision::Sustain(top.label.clone());
        }

        self.state.current_alert_label = Some(top.label.clone());
        AlertDecision::Raise(top.label.clone())
    }

    /// Back to idle, forgetting the last alerted label
    pub fn reset(&mut self) {
        self.state = AlertState::default();
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }
}
