//! Produce quality analysis
//!
//! Scores a listing's image. Only a placeholder ships; a real model plugs in
//! behind the same trait.

use async_trait::async_trait;

#[async_trait]
pub trait QualityAnalyzer: Send + Sync {
    /// Score in 0..=100, or `None` when nothing can be judged
    async fn analyze(&self, image_ref: Option<&str>) -> Option<u8>;
}

/// Returns a configured fixed score for any listing with an image
#[derive(Debug, Clone)]
pub struct PlaceholderAnalyzer {
    score: u8,
}

impl PlaceholderAnalyzer {
    pub fn new(score: u8) -> Self {
        Self {
            score: score.min(100),
        }
    }
}

#[async_trait]
impl QualityAnalyzer for PlaceholderAnalyzer {
    async fn analyze(&self, image_ref: Option<&str>) -> Option<u8> {
        image_ref
            .filter(|r| !r.trim().is_empty())
            .map(|_| self.score)
    }
}

/// `score > threshold` approves on creation; anything else waits for review
pub fn auto_approves(score: Option<u8>, threshold: u8) -> bool {
    score.is_some_and(|s| s > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_scores_only_listings_with_images() {
        let analyzer = PlaceholderAnalyzer::new(80);
        assert_eq!(analyzer.analyze(Some("/uploads/abc.jpg")).await, Some(80));
        assert_eq!(analyzer.analyze(Some("  ")).await, None);
        assert_eq!(analyzer.analyze(None).await, None);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(auto_approves(Some(61), 60));
        assert!(!auto_approves(Some(60), 60));
        assert!(!auto_approves(None, 60));
    }
}
