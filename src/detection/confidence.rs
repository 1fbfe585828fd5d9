// Confidence evaluation
// Picks the top label of a frame's score vector

use crate::detection::types::{LabelScore, TopLabel};

/// Stable arg-max over an ordered score vector
/// Scans left to right with a strictly-greater comparison, so the earliest
/// label wins a tie. Returns `None` only for an empty vector.
pub fn top_label(scores: &[LabelScore]) -> Option<TopLabel> {
    let (first, rest) = scores.split_first()?;

    let mut best_index = 0;
    let mut best = first;
    for (offset, score) in rest.iter().enumerate() {
        if score.confidence > best.confidence {
            best_index = offset + 1;
            best = score;
        }
    }

    Some(TopLabel {
        index: best_index,
        label: best.label.clone(),
        confidence: best.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f32)]) -> Vec<LabelScore> {
        pairs.iter().map(|(l, c)| LabelScore::new(*l, *c)).collect()
    }

    #[test]
    fn test_empty_has_no_maximum() {
        assert!(top_label(&[]).is_none());
    }

    #[test]
    fn test_picks_largest_confidence() {
        let top = top_label(&scores(&[
            ("Background Noise", 0.05),
            ("Distress Screams", 0.15),
            ("Traffic Collision", 0.80),
        ]))
        .unwrap();

        assert_eq!(top.index, 2);
        assert_eq!(top.label, "Traffic Collision");
        assert_eq!(top.confidence, 0.80);
    }

    #[test]
    fn test_tie_goes_to_first_occurrence() {
        let top = top_label(&scores(&[("A", 0.1), ("B", 0.45), ("C", 0.45)])).unwrap();
        assert_eq!(top.index, 1);
        assert_eq!(top.label, "B");
    }

    #[test]
    fn test_all_zero_scores_pick_first() {
        let top = top_label(&scores(&[("A", 0.0), ("B", 0.0)])).unwrap();
        assert_eq!(top.index, 0);
    }

    #[test]
    fn test_single_entry() {
        let top = top_label(&scores(&[("Only", 0.3)])).unwrap();
        assert_eq!(top.label, "Only");
    }
}
