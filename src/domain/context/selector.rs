//! Threshold-with-fallback context selection

use serde::Serialize;

use super::config::ContextSelectionConfig;
use crate::domain::knowledge_base::RetrievalMatch;

/// Reference to a chunk that made it into the prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextChunk {
    pub id: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<u64>,
}

/// Context block assembled for a single request
#[derive(Debug, Clone, Serialize)]
pub struct SelectedContext {
    /// Chunks in prompt order
    pub chunks: Vec<ContextChunk>,
    /// Concatenated, budget-limited text
    pub text: String,
    /// Whether the concatenated text was cut to the character budget
    pub truncated: bool,
    /// Whether no match cleared the threshold and the top matches were used
    pub fell_back: bool,
}

impl SelectedContext {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Chooses which ranked matches are placed in the prompt
#[derive(Debug, Clone, Default)]
pub struct ContextSelector {
    config: ContextSelectionConfig,
}

impl ContextSelector {
    pub fn new(config: ContextSelectionConfig) -> Self {
        Self { config }
    }

    /// Pick at most `max_chunks` matches from a descending-score list.
    ///
    /// Matches scoring strictly above `min_score` win. If none do, the first
    /// `max_chunks` matches are taken regardless of score, so context is only
    /// ever empty when the index returned nothing. The flag reports fallback.
    pub fn select<'a>(&self, matches: &'a [RetrievalMatch]) -> (Vec<&'a RetrievalMatch>, bool) {
        let relevant: Vec<&RetrievalMatch> = matches
            .iter()
            .filter(|m| m.score > self.config.min_score)
            .take(self.config.max_chunks)
            .collect();

        if relevant.is_empty() {
            let top: Vec<&RetrievalMatch> = matches.iter().take(self.config.max_chunks).collect();
            let fell_back = !top.is_empty();
            return (top, fell_back);
        }

        (relevant, false)
    }

    /// Select matches and join their text into a bounded context block
    pub fn build(&self, matches: &[RetrievalMatch]) -> SelectedContext {
        let (selected, fell_back) = self.select(matches);

        let joined = selected
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.separator);

        let (text, truncated) =
            truncate_chars(&joined, self.config.max_chars, &self.config.truncation_marker);

        SelectedContext {
            chunks: selected
                .iter()
                .map(|m| ContextChunk {
                    id: m.id.clone(),
                    score: m.score,
                    chunk_id: m.chunk_id,
                })
                .collect(),
            text,
            truncated,
            fell_back,
        }
    }
}

/// Cut `text` to `max_chars` characters and append `marker` when cut
fn truncate_chars(text: &str, max_chars: usize, marker: &str) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut cut = String::with_capacity(byte_idx + marker.len());
            cut.push_str(&text[..byte_idx]);
            cut.push_str(marker);
            (cut, true)
        }
        None => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_with_scores(scores: &[f32]) -> Vec<RetrievalMatch> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| RetrievalMatch::new(format!("chunk-{}", i), format!("text {}", i), *score))
            .collect()
    }

    fn selected_scores(selector: &ContextSelector, matches: &[RetrievalMatch]) -> Vec<f32> {
        selector.select(matches).0.iter().map(|m| m.score).collect()
    }

    #[test]
    fn test_threshold_selects_relevant_matches() {
        let selector = ContextSelector::default();
        let matches = matches_with_scores(&[0.9, 0.8, 0.6, 0.5]);

        assert_eq!(selected_scores(&selector, &matches), vec![0.9, 0.8]);
        assert!(!selector.select(&matches).1);
    }

    #[test]
    fn test_fallback_when_nothing_clears_threshold() {
        let selector = ContextSelector::default();
        let matches = matches_with_scores(&[0.5, 0.4, 0.3]);

        let (selected, fell_back) = selector.select(&matches);
        let scores: Vec<f32> = selected.iter().map(|m| m.score).collect();

        assert_eq!(scores, vec![0.5, 0.4]);
        assert!(fell_back);
    }

    #[test]
    fn test_threshold_is_strict() {
        let selector = ContextSelector::default();
        let matches = matches_with_scores(&[0.75, 0.75, 0.2]);

        // 0.75 does not clear a 0.75 threshold, so the fallback path is taken
        let (selected, fell_back) = selector.select(&matches);
        assert_eq!(selected.len(), 2);
        assert!(fell_back);
    }

    #[test]
    fn test_single_relevant_match_is_not_padded() {
        let selector = ContextSelector::default();
        let matches = matches_with_scores(&[0.9, 0.5, 0.4]);

        assert_eq!(selected_scores(&selector, &matches), vec![0.9]);
    }

    #[test]
    fn test_empty_matches_give_empty_context() {
        let selector = ContextSelector::default();
        let context = selector.build(&[]);

        assert!(context.is_empty());
        assert_eq!(context.text, "");
        assert!(!context.fell_back);
        assert!(!context.truncated);
    }

    #[test]
    fn test_build_joins_with_separator() {
        let selector = ContextSelector::default();
        let matches = vec![
            RetrievalMatch::new("a", "TCP is reliable.", 0.9).with_chunk_id(3),
            RetrievalMatch::new("b", "UDP is not.", 0.85),
        ];

        let context = selector.build(&matches);

        assert_eq!(context.text, "TCP is reliable.\n\nUDP is not.");
        assert_eq!(context.chunks.len(), 2);
        assert_eq!(context.chunks[0].chunk_id, Some(3));
        assert!(!context.truncated);
    }

    #[test]
    fn test_truncation_after_concatenation() {
        let selector = ContextSelector::default();
        let matches = vec![
            RetrievalMatch::new("a", "x".repeat(1500), 0.9),
            RetrievalMatch::new("b", "y".repeat(1500), 0.8),
        ];

        let context = selector.build(&matches);

        assert!(context.truncated);
        assert_eq!(context.text.chars().count(), 2000 + "...".len());
        assert!(context.text.ends_with("..."));
        // First chunk intact, separator kept, second chunk cut
        assert!(context.text.starts_with(&"x".repeat(1500)));
        assert_eq!(context.text[1500..1502].to_string(), "\n\n");
    }

    #[test]
    fn test_exact_budget_is_not_truncated() {
        let selector = ContextSelector::new(ContextSelectionConfig::new().with_max_chars(10));
        let matches = vec![RetrievalMatch::new("a", "0123456789", 0.9)];

        let context = selector.build(&matches);

        assert_eq!(context.text, "0123456789");
        assert!(!context.truncated);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let (text, truncated) = truncate_chars("héllo wörld", 4, "...");

        assert!(truncated);
        assert_eq!(text, "héll...");
    }
}
