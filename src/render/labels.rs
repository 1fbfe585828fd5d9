// Per-label confidence rows
// Text and color for every label of a frame, with the top label highlighted

use serde::Serialize;

use crate::detection::types::{LabelScore, TopLabel};

/// RGBA color with alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const HIGHLIGHT: Rgba = Rgba {
        r: 0,
        g: 255,
        b: 150,
        a: 0.5,
    };

    /// Red-to-green ramp proportional to confidence
    pub fn for_confidence(confidence: f32) -> Self {
        let level = (confidence * 255.0).floor().clamp(0.0, 255.0) as u8;
        Rgba {
            r: 255 - level,
            g: level,
            b: 100,
            a: 0.3,
        }
    }

    /// CSS `rgba(...)` notation
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One visible label line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRow {
    pub label: String,
    pub text: String,
    pub background: Rgba,
    pub bold: bool,
}

impl LabelRow {
    pub fn new(score: &LabelScore) -> Self {
        LabelRow {
            label: score.label.clone(),
            text: format!("{}: {:.2}", score.label, score.confidence),
            background: Rgba::for_confidence(score.confidence),
            bold: false,
        }
    }

    fn highlight(&mut self) {
        self.background = Rgba::HIGHLIGHT;
        self.bold = true;
    }
}

/// Build rows for every label, highlighting the top one
pub fn label_rows(scores: &[LabelScore], top: Option<&TopLabel>) -> Vec<LabelRow> {
    let mut rows: Vec<LabelRow> = scores.iter().map(LabelRow::new).collect();

    if let Some(row) = top.and_then(|t| rows.get_mut(t.index)) {
        row.highlight();
    }

    rows
}

/// Banner shown while a label is in alert state
pub fn alert_text(label: &str) -> String {
    format!("🚨 Alert: {} detected!", label)
}
