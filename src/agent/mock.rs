//! Canned replies used when no live completion provider is configured.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed catalog of career advice replies.
pub const MOCK_RESPONSES: [&str; 8] = [
    "キャリア選択において重要なのは、自分の強みと情熱を理解することです。あなたの強みはどのような分野にありますか？",
    "転職を考える際は、現在のスキルセットと市場のニーズのギャップを分析することが大切です。具体的にどのようなスキルを身につけたいですか？",
    "キャリアパスを考える上で、短期目標と長期目標を明確にすることが重要です。5年後にはどのようなポジションを目指していますか？",
    "職場環境も重要な要素です。どのような企業文化や働き方があなたに合っていると思いますか？",
    "スキルアップのためには継続的な学習が欠かせません。最近取り組んでいる学習や興味のある分野はありますか？",
    "ワークライフバランスも大切な要素です。理想的な働き方について教えてください。",
    "キャリア開発には人脈も重要です。業界内でのネットワーキングはどのように行っていますか？",
    "自己分析は継続的に行うことが大切です。最近気づいた自分の強みや弱みはありますか？",
];

/// Uniform pseudo-random picker over [`MOCK_RESPONSES`].
#[derive(Debug)]
pub struct MockResponder {
    rng: Mutex<StdRng>,
}

impl MockResponder {
    /// Picker seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic picker.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick one reply.
    #[must_use]
    pub fn pick(&self) -> &'static str {
        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..MOCK_RESPONSES.len());
        MOCK_RESPONSES[index]
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_come_from_catalog() {
        let responder = MockResponder::new();
        for _ in 0..100 {
            assert!(MOCK_RESPONSES.contains(&responder.pick()));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = MockResponder::with_seed(7);
        let b = MockResponder::with_seed(7);
        let seq_a: Vec<&str> = (0..20).map(|_| a.pick()).collect();
        let seq_b: Vec<&str> = (0..20).map(|_| b.pick()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_selection_covers_catalog() {
        let responder = MockResponder::with_seed(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            seen.insert(responder.pick());
        }
        assert_eq!(seen.len(), MOCK_RESPONSES.len());
    }
}
