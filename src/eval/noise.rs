//! SYNTHETIC NOISE: presentation-only score flipping for demo output.
//!
//! Demo responses are canned, so every run would otherwise score the same
//! way for every inquiry. This hook randomly inverts outcomes to make demo
//! statistics look less uniform. The flipped values say nothing about any
//! model or about the scorers; live runs never construct one.

use super::record::Scores;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of inverting each outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipRates {
    pub intent_match_baseline: f64,
    pub intent_match_rag: f64,
    pub grounding_rag: f64,
}

impl Default for FlipRates {
    fn default() -> Self {
        Self {
            intent_match_baseline: 0.06,
            intent_match_rag: 0.05,
            grounding_rag: 0.07,
        }
    }
}

/// Seeded random score flipper. See the module docs before using.
#[derive(Debug)]
pub struct SyntheticNoise {
    rng: StdRng,
    rates: FlipRates,
}

impl SyntheticNoise {
    pub fn seeded(seed: u64, rates: FlipRates) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rates,
        }
    }

    fn flip(&mut self, value: bool, rate: f64) -> bool {
        if self.rng.gen_bool(rate.clamp(0.0, 1.0)) {
            !value
        } else {
            value
        }
    }

    /// Possibly invert each outcome.
    pub fn apply(&mut self, scores: Scores) -> Scores {
        Scores {
            intent_match_baseline: self
                .flip(scores.intent_match_baseline, self.rates.intent_match_baseline),
            intent_match_rag: self.flip(scores.intent_match_rag, self.rates.intent_match_rag),
            grounding_rag: self.flip(scores.grounding_rag, self.rates.grounding_rag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TRUE: Scores = Scores {
        intent_match_baseline: true,
        intent_match_rag: true,
        grounding_rag: true,
    };

    #[test]
    fn test_zero_rates_never_flip() {
        let rates = FlipRates {
            intent_match_baseline: 0.0,
            intent_match_rag: 0.0,
            grounding_rag: 0.0,
        };
        let mut noise = SyntheticNoise::seeded(42, rates);
        for _ in 0..100 {
            assert_eq!(noise.apply(ALL_TRUE), ALL_TRUE);
        }
    }

    #[test]
    fn test_full_rates_always_flip() {
        let rates = FlipRates {
            intent_match_baseline: 1.0,
            intent_match_rag: 1.0,
            grounding_rag: 1.0,
        };
        let flipped = SyntheticNoise::seeded(7, rates).apply(ALL_TRUE);
        assert!(!flipped.intent_match_baseline);
        assert!(!flipped.intent_match_rag);
        assert!(!flipped.grounding_rag);
    }

    #[test]
    fn test_same_seed_same_flips() {
        let run = |seed| {
            let mut noise = SyntheticNoise::seeded(seed, FlipRates::default());
            (0..200).map(|_| noise.apply(ALL_TRUE)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_default_rates_flip_a_minority() {
        let mut noise = SyntheticNoise::seeded(42, FlipRates::default());
        let flipped = (0..1000)
            .filter(|_| !noise.apply(ALL_TRUE).grounding_rag)
            .count();
        assert!(flipped > 0 && flipped < 200, "flipped {}", flipped);
    }
}
