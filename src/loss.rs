//! Injectable loss model for the simulated channel.
//!
//! Real networks drop packets; this simulator decides each drop explicitly
//! so the reliability mechanisms can be exercised without depending on
//! actual network conditions. Every transmission attempt — data frame or
//! ACK — asks a [`LossModel`] whether that one attempt is lost. Decisions
//! are independent across calls; the model only drops, it never reorders
//! or duplicates.
//!
//! Three implementations:
//!
//! | Model           | Use                                                |
//! |-----------------|----------------------------------------------------|
//! | [`NoLoss`]      | Transparent pass-through (perfect channel).        |
//! | [`RandomLoss`]  | Independent Bernoulli drop with probability `p`, seedable for reproducible runs. |
//! | [`ScriptedLoss`]| Exact per-attempt drop sequence for deterministic tests ("drop only frame 2, once"). |

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-attempt drop decision.
///
/// `decide_drop` is called exactly once per transmission attempt, in send
/// order, so stateful implementations can script precise loss patterns.
pub trait LossModel: Send {
    /// `true` means this attempt is lost and must not reach the peer.
    fn decide_drop(&mut self) -> bool;
}

/// A perfect channel: nothing is ever dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoss;

impl LossModel for NoLoss {
    fn decide_drop(&mut self) -> bool {
        false
    }
}

/// Independent Bernoulli loss with probability `p`.
#[derive(Debug)]
pub struct RandomLoss {
    probability: f64,
    rng: StdRng,
}

impl RandomLoss {
    /// Drop each attempt independently with probability `p ∈ [0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside `[0, 1]`.
    pub fn new(p: f64) -> Self {
        Self::from_rng(p, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) but seeded, so a lossy run replays exactly.
    pub fn with_seed(p: f64, seed: u64) -> Self {
        Self::from_rng(p, StdRng::seed_from_u64(seed))
    }

    fn from_rng(p: f64, rng: StdRng) -> Self {
        assert!(
            (0.0..=1.0).contains(&p),
            "loss probability must be in [0, 1], got {p}"
        );
        Self { probability: p, rng }
    }
}

impl LossModel for RandomLoss {
    fn decide_drop(&mut self) -> bool {
        self.rng.gen::<f64>() < self.probability
    }
}

/// A scripted drop sequence: the `n`-th call returns the `n`-th entry.
///
/// Once the script is exhausted every further attempt is delivered, so a
/// test only has to spell out the interesting prefix.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLoss {
    script: VecDeque<bool>,
}

impl ScriptedLoss {
    /// `true` entries are drops, in transmission order.
    pub fn new<I: IntoIterator<Item = bool>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Convenience: drop exactly the attempts at the given 0-based indices.
    pub fn drop_attempts(indices: &[usize]) -> Self {
        let len = indices.iter().max().map_or(0, |m| m + 1);
        let mut script = vec![false; len];
        for &i in indices {
            script[i] = true;
        }
        Self::new(script)
    }
}

impl LossModel for ScriptedLoss {
    fn decide_drop(&mut self) -> bool {
        self.script.pop_front().unwrap_or(false)
    }
}
