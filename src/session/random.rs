use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Source of the orderings and picks a session needs. Sessions only ever
/// talk to this trait so tests can script the outcome.
pub trait RandomSource {
    /// A permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;

    /// An index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RngSource<R = SmallRng> {
    rng: R,
}

impl RngSource<SmallRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Deterministic source: permutations keep input order (or reverse it) and
/// picks come from a script, falling back to 0.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    reverse: bool,
    picks: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn reversed() -> Self {
        Self {
            reverse: true,
            picks: VecDeque::new(),
        }
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl RandomSource for ScriptedSource {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        if self.reverse {
            (0..len).rev().collect()
        } else {
            (0..len).collect()
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }
}

/// Reorder `items` by a permutation drawn from `random`.
pub fn shuffled<T>(items: Vec<T>, random: &mut dyn RandomSource) -> Vec<T> {
    let order = random.permutation(items.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
