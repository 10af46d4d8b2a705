//! Random sources for the monthly pipeline.
//!
//! Every draw names the [`DiceStream`] it belongs to. Production sessions use
//! [`RngBundle`], which keeps one independent seeded stream per domain so a
//! change in one subsystem never shifts the draws of another. Tests use
//! [`ScriptedDice`] to pin individual outcomes.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::{HashMap, VecDeque};
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::constants::{PERCENT_ROLL_MAX, PERCENT_ROLL_MIN};

/// Simulation domain a draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceStream {
    /// Monthly regime roll.
    Market,
    /// Salary shifts, expense extras and side-hustle income.
    Ledger,
    /// Savings rates and investment outcomes.
    Action,
    /// Catalog permutation, trigger and avoidance rolls.
    Catalog,
    /// Lucky event gate and selection.
    Lucky,
}

impl DiceStream {
    pub const ALL: [Self; 5] = [
        Self::Market,
        Self::Ledger,
        Self::Action,
        Self::Catalog,
        Self::Lucky,
    ];

    const fn domain_tag(self) -> &'static [u8] {
        match self {
            Self::Market => b"market",
            Self::Ledger => b"ledger",
            Self::Action => b"action",
            Self::Catalog => b"catalog",
            Self::Lucky => b"lucky",
        }
    }
}

/// Injectable random source consumed by the turn engine.
pub trait Dice {
    /// Uniform integer in the inclusive range `[lo, hi]`.
    fn roll(&mut self, stream: DiceStream, lo: i64, hi: i64) -> i64;

    /// A visit order over `len` items.
    fn permutation(&mut self, stream: DiceStream, len: usize) -> Vec<usize>;

    /// Percent roll in `[1, 100]`, the gate used by every odds check.
    fn percent(&mut self, stream: DiceStream) -> i64 {
        self.roll(stream, PERCENT_ROLL_MIN, PERCENT_ROLL_MAX)
    }
}

impl<D: Dice + ?Sized> Dice for Box<D> {
    fn roll(&mut self, stream: DiceStream, lo: i64, hi: i64) -> i64 {
        (**self).roll(stream, lo, hi)
    }

    fn permutation(&mut self, stream: DiceStream, len: usize) -> Vec<usize> {
        (**self).permutation(stream, len)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R> CountingRng<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn roll_with<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    if lo >= hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

fn shuffled_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Any plain RNG can drive the engine directly; the stream tag is ignored.
#[derive(Debug, Clone)]
pub struct SingleStreamDice<R>(pub R);

impl<R: RngCore> Dice for SingleStreamDice<R> {
    fn roll(&mut self, _stream: DiceStream, lo: i64, hi: i64) -> i64 {
        roll_with(&mut self.0, lo, hi)
    }

    fn permutation(&mut self, _stream: DiceStream, len: usize) -> Vec<usize> {
        shuffled_with(&mut self.0, len)
    }
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    market: CountingRng<SmallRng>,
    ledger: CountingRng<SmallRng>,
    action: CountingRng<SmallRng>,
    catalog: CountingRng<SmallRng>,
    lucky: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let stream = |kind: DiceStream| {
            CountingRng::new(SmallRng::seed_from_u64(derive_stream_seed(
                seed,
                kind.domain_tag(),
            )))
        };
        Self {
            seed,
            market: stream(DiceStream::Market),
            ledger: stream(DiceStream::Ledger),
            action: stream(DiceStream::Action),
            catalog: stream(DiceStream::Catalog),
            lucky: stream(DiceStream::Lucky),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws made against one stream.
    #[must_use]
    pub const fn draws(&self, stream: DiceStream) -> u64 {
        match stream {
            DiceStream::Market => self.market.draws(),
            DiceStream::Ledger => self.ledger.draws(),
            DiceStream::Action => self.action.draws(),
            DiceStream::Catalog => self.catalog.draws(),
            DiceStream::Lucky => self.lucky.draws(),
        }
    }

    const fn stream_mut(&mut self, stream: DiceStream) -> &mut CountingRng<SmallRng> {
        match stream {
            DiceStream::Market => &mut self.market,
            DiceStream::Ledger => &mut self.ledger,
            DiceStream::Action => &mut self.action,
            DiceStream::Catalog => &mut self.catalog,
            DiceStream::Lucky => &mut self.lucky,
        }
    }
}

impl Dice for RngBundle {
    fn roll(&mut self, stream: DiceStream, lo: i64, hi: i64) -> i64 {
        roll_with(self.stream_mut(stream), lo, hi)
    }

    fn permutation(&mut self, stream: DiceStream, len: usize) -> Vec<usize> {
        shuffled_with(self.stream_mut(stream), len)
    }
}

/// Turn a user-facing seed token into a numeric seed. Decimal integers are
/// used as-is; any other text is hashed.
#[must_use]
pub fn seed_from_phrase(phrase: &str) -> u64 {
    let trimmed = phrase.trim();
    if let Ok(seed) = trimmed.parse::<u64>() {
        return seed;
    }
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(trimmed.as_bytes());
    hasher.finish()
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Scripted dice for deterministic tests.
///
/// Each stream owns a FIFO queue of rolls and permutations. An exhausted roll
/// queue answers with the upper bound of the requested range, so percent gates
/// stay closed for anything below 100. An exhausted permutation queue answers
/// with catalog order. Scripted values outside the requested range are clamped.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: HashMap<DiceStream, VecDeque<i64>>,
    permutations: HashMap<DiceStream, VecDeque<Vec<usize>>>,
}

impl ScriptedDice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rolls for one stream.
    #[must_use]
    pub fn with_rolls(mut self, stream: DiceStream, rolls: impl IntoIterator<Item = i64>) -> Self {
        self.push_rolls(stream, rolls);
        self
    }

    /// Queue a visit order for one stream.
    #[must_use]
    pub fn with_permutation(mut self, stream: DiceStream, order: Vec<usize>) -> Self {
        self.permutations.entry(stream).or_default().push_back(order);
        self
    }

    pub fn push_rolls(&mut self, stream: DiceStream, rolls: impl IntoIterator<Item = i64>) {
        self.rolls.entry(stream).or_default().extend(rolls);
    }

    /// Rolls still queued for a stream.
    #[must_use]
    pub fn remaining(&self, stream: DiceStream) -> usize {
        self.rolls.get(&stream).map_or(0, VecDeque::len)
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, stream: DiceStream, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.rolls
            .get_mut(&stream)
            .and_then(VecDeque::pop_front)
            .map_or(hi, |value| value.clamp(lo, hi))
    }

    fn permutation(&mut self, stream: DiceStream, len: usize) -> Vec<usize> {
        let scripted = self
            .permutations
            .get_mut(&stream)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(order) if is_permutation(&order, len) => order,
            _ => (0..len).collect(),
        }
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_streams_are_reproducible() {
        let mut a = RngBundle::from_user_seed(0x00C0_FFEE);
        let mut b = RngBundle::from_user_seed(0x00C0_FFEE);
        for stream in DiceStream::ALL {
            for _ in 0..32 {
                assert_eq!(a.roll(stream, 1, 100), b.roll(stream, 1, 100));
            }
        }
        assert_eq!(a.permutation(DiceStream::Catalog, 9), b.permutation(DiceStream::Catalog, 9));
    }

    #[test]
    fn bundle_streams_are_isolated() {
        let mut touched = RngBundle::from_user_seed(7);
        let mut pristine = RngBundle::from_user_seed(7);
        for _ in 0..10 {
            touched.roll(DiceStream::Market, 1, 100);
        }
        assert_eq!(touched.draws(DiceStream::Lucky), 0);
        assert!(touched.draws(DiceStream::Market) >= 10);
        for _ in 0..16 {
            assert_eq!(
                touched.roll(DiceStream::Lucky, 1, 100),
                pristine.roll(DiceStream::Lucky, 1, 100)
            );
        }
    }

    #[test]
    fn rolls_stay_inside_bounds() {
        let mut dice = RngBundle::from_user_seed(99);
        for _ in 0..2_000 {
            let value = dice.roll(DiceStream::Ledger, -15, 20);
            assert!((-15..=20).contains(&value));
        }
        assert_eq!(dice.roll(DiceStream::Ledger, 5, 5), 5);
    }

    #[test]
    fn bundle_permutations_cover_every_index() {
        let mut dice = RngBundle::from_user_seed(3);
        let mut order = dice.permutation(DiceStream::Catalog, 12);
        order.sort_unstable();
        assert_eq!(order, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn scripted_dice_replays_and_falls_back() {
        let mut dice = ScriptedDice::new()
            .with_rolls(DiceStream::Market, [50, 500])
            .with_permutation(DiceStream::Catalog, vec![2, 0, 1]);
        assert_eq!(dice.percent(DiceStream::Market), 50);
        assert_eq!(dice.percent(DiceStream::Market), 100);
        assert_eq!(dice.percent(DiceStream::Market), 100);
        assert_eq!(dice.roll(DiceStream::Ledger, 0, 1), 1);
        assert_eq!(dice.permutation(DiceStream::Catalog, 3), vec![2, 0, 1]);
        assert_eq!(dice.permutation(DiceStream::Catalog, 3), vec![0, 1, 2]);
    }

    #[test]
    fn scripted_dice_rejects_malformed_permutations() {
        let mut dice = ScriptedDice::new().with_permutation(DiceStream::Catalog, vec![0, 0, 1]);
        assert_eq!(dice.permutation(DiceStream::Catalog, 3), vec![0, 1, 2]);
    }

    #[test]
    fn phrases_map_to_stable_seeds() {
        assert_eq!(seed_from_phrase("42"), 42);
        assert_eq!(seed_from_phrase(" 42 "), 42);
        assert_eq!(seed_from_phrase("rainy day fund"), seed_from_phrase("rainy day fund"));
        assert_ne!(seed_from_phrase("rainy day fund"), seed_from_phrase("emergency fund"));
    }

    #[test]
    fn single_stream_dice_wraps_plain_rngs() {
        let mut dice = SingleStreamDice(SmallRng::seed_from_u64(11));
        let value = dice.roll(DiceStream::Action, 2, 4);
        assert!((2..=4).contains(&value));
        assert_eq!(dice.permutation(DiceStream::Catalog, 0), Vec::<usize>::new());
    }
}
