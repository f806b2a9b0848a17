//! Strategy selection
//!
//! The selector scores every suitable strategy for the run at hand and picks
//! the highest. Hints narrow the candidate list before scoring.

use super::{HashingContext, HashingStrategy, ParallelStrategy, SequentialStrategy};
use serde::{Deserialize, Serialize};

/// Hints that can be provided to influence strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyHint {
    /// Always hash on the calling thread
    PreferSequential,
    /// Use one worker per algorithm whenever more than one is requested
    PreferParallel,
    /// Let the selector decide without bias
    #[default]
    Automatic,
}

/// Selector for choosing the hashing strategy
pub struct StrategySelector {
    strategies: Vec<Box<dyn HashingStrategy>>,
    hint: StrategyHint,
}

impl std::fmt::Debug for StrategySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("StrategySelector")
            .field("strategies", &names)
            .field("hint", &self.hint)
            .finish()
    }
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::with_hint(StrategyHint::Automatic)
    }

    pub fn with_hint(hint: StrategyHint) -> Self {
        let strategies: Vec<Box<dyn HashingStrategy>> = vec![
            Box::new(SequentialStrategy::new()),
            Box::new(ParallelStrategy::new()),
        ];

        Self { strategies, hint }
    }

    pub fn hint(&self) -> StrategyHint {
        self.hint
    }

    /// Select the best strategy for the given context
    ///
    /// Falls back to sequential processing when the hinted strategies are
    /// unsuitable, e.g. `PreferParallel` with a single algorithm.
    pub fn select(&self, context: &HashingContext<'_>) -> &dyn HashingStrategy {
        let preferred = match self.hint {
            StrategyHint::PreferSequential => Some("sequential"),
            StrategyHint::PreferParallel => Some("parallel"),
            StrategyHint::Automatic => None,
        };

        let hinted = self
            .strategies
            .iter()
            .filter(|s| preferred.is_none_or(|name| s.name() == name))
            .filter(|s| s.is_suitable(context))
            .max_by_key(|s| s.priority_score(context));

        let selected = hinted.or_else(|| {
            self.strategies
                .iter()
                .filter(|s| s.is_suitable(context))
                .max_by_key(|s| s.priority_score(context))
        });

        match selected {
            Some(strategy) => strategy.as_ref(),
            None => &SequentialStrategy,
        }
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::strategies::parallel::available_cores;
    use crate::hashing::{CancellationToken, HashAlgorithm, HashConfig};

    const TWO: [HashAlgorithm; 2] = [HashAlgorithm::Md5, HashAlgorithm::Sha256];

    fn select_name(hint: StrategyHint, payload: &[u8], algorithms: &[HashAlgorithm]) -> &'static str {
        let config = HashConfig::default();
        let cancel = CancellationToken::new();
        let context = HashingContext {
            payload,
            algorithms,
            config: &config,
            cancel: &cancel,
        };
        StrategySelector::with_hint(hint).select(&context).name()
    }

    #[test]
    fn test_selector_creation() {
        let selector = StrategySelector::new();
        assert_eq!(selector.hint(), StrategyHint::Automatic);
        assert_eq!(selector.strategies.len(), 2);
    }

    #[test]
    fn test_small_payload_is_sequential() {
        assert_eq!(select_name(StrategyHint::Automatic, &[0u8; 4096], &TWO), "sequential");
    }

    #[test]
    fn test_single_algorithm_is_sequential() {
        let payload = vec![0u8; 2 * 1024 * 1024];
        assert_eq!(
            select_name(StrategyHint::Automatic, &payload, &TWO[..1]),
            "sequential"
        );
        assert_eq!(
            select_name(StrategyHint::PreferParallel, &payload, &TWO[..1]),
            "sequential"
        );
    }

    #[test]
    fn test_large_multi_algorithm_payload() {
        let payload = vec![0u8; 2 * 1024 * 1024];
        let expected = if available_cores() >= 2 {
            "parallel"
        } else {
            "sequential"
        };
        assert_eq!(select_name(StrategyHint::Automatic, &payload, &TWO), expected);
    }

    #[test]
    fn test_hints_override_size() {
        assert_eq!(select_name(StrategyHint::PreferParallel, b"tiny", &TWO), "parallel");

        let payload = vec![0u8; 2 * 1024 * 1024];
        assert_eq!(
            select_name(StrategyHint::PreferSequential, &payload, &TWO),
            "sequential"
        );
    }
}
