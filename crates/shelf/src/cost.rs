//! Size estimation for shelf entries and indexed items
//!
//! Capacity accounting is done in approximate token units. The default
//! [`CharRatioCost`] divides the character count by a fixed ratio, which is a
//! crude estimate for English text and NOT an exact token count.
//! Anything that needs real tokenizer fidelity can implement [`CostModel`]
//! and hand it to the shelf and index.

/// Default characters-per-token ratio for [`CharRatioCost`]
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Computes the approximate cost of a piece of content.
///
/// Implementations must return at least 1 for any input, including the
/// empty string, so every entry occupies some capacity.
pub trait CostModel: Send + Sync {
    fn estimate(&self, content: &str) -> usize;
}

/// Approximate cost: `max(1, char_count / chars_per_token)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRatioCost {
    chars_per_token: usize,
}

impl CharRatioCost {
    /// A ratio of 0 falls back to [`DEFAULT_CHARS_PER_TOKEN`]
    pub fn new(chars_per_token: usize) -> Self {
        let chars_per_token = if chars_per_token == 0 {
            DEFAULT_CHARS_PER_TOKEN
        } else {
            chars_per_token
        };
        Self { chars_per_token }
    }

    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }
}

impl Default for CharRatioCost {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl CostModel for CharRatioCost {
    fn estimate(&self, content: &str) -> usize {
        (content.chars().count() / self.chars_per_token).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_costs_one() {
        assert_eq!(CharRatioCost::default().estimate(""), 1);
    }

    #[test]
    fn test_short_content_costs_one() {
        assert_eq!(CharRatioCost::default().estimate("abc"), 1);
    }

    #[test]
    fn test_four_chars_per_token() {
        let cost = CharRatioCost::default();
        assert_eq!(cost.estimate(&"x".repeat(40)), 10);
        assert_eq!(cost.estimate(&"x".repeat(43)), 10);
        assert_eq!(cost.estimate(&"x".repeat(44)), 11);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 8 chars, 16 bytes
        let cost = CharRatioCost::default();
        assert_eq!(cost.estimate("éééééééé"), 2);
    }

    #[test]
    fn test_custom_ratio() {
        let cost = CharRatioCost::new(2);
        assert_eq!(cost.estimate("abcdef"), 3);
    }

    #[test]
    fn test_zero_ratio_falls_back_to_default() {
        assert_eq!(CharRatioCost::new(0).chars_per_token(), DEFAULT_CHARS_PER_TOKEN);
    }
}
