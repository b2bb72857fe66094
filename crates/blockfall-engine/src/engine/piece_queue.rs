use std::{collections::VecDeque, fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PieceKind, QueueUnderflow};

/// One refill's worth of pieces.
pub type PieceBatch = ArrayVec<PieceKind, { PieceKind::LEN }>;

/// Source of upcoming pieces.
///
/// The queue calls [`Self::next_batch`] whenever its lookahead runs low. An empty
/// batch means the generator has nothing left to give, which the queue reports
/// as [`QueueUnderflow`].
pub trait PieceGenerator: fmt::Debug + Send {
    fn next_batch(&mut self) -> PieceBatch;

    /// Called when the session is reset. Generators that replay a fixed
    /// sequence rewind here; random ones just keep going.
    fn restart(&mut self) {}
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator for piece generation. Using the same seed will produce the same
/// sequence of pieces, enabling reproducible sessions and deterministic tests.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed, SevenBag};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = SevenBag::with_seed(seed);
/// let mut b = SevenBag::with_seed(seed);
/// assert_eq!(a.next_batch(), b.next_batch());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// The 7-bag randomizer.
///
/// Each batch holds all seven shapes in shuffled order, which prevents long
/// droughts of any shape while keeping the sequence unpredictable.
#[derive(Debug, Clone)]
pub struct SevenBag {
    rng: Pcg32,
}

impl SevenBag {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl Default for SevenBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator for SevenBag {
    fn next_batch(&mut self) -> PieceBatch {
        let mut bag = PieceKind::ALL;
        bag.shuffle(&mut self.rng);
        PieceBatch::from(bag)
    }
}

/// Replays a fixed piece sequence.
///
/// Used for scripted sessions and tests. A cycling generator repeats the
/// sequence forever; a one-shot generator runs dry after a single pass.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    pieces: Vec<PieceKind>,
    cursor: usize,
    cycle: bool,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn cycling(pieces: Vec<PieceKind>) -> Self {
        Self {
            pieces,
            cursor: 0,
            cycle: true,
        }
    }

    #[must_use]
    pub fn once(pieces: Vec<PieceKind>) -> Self {
        Self {
            pieces,
            cursor: 0,
            cycle: false,
        }
    }
}

impl PieceGenerator for ScriptedGenerator {
    fn next_batch(&mut self) -> PieceBatch {
        let mut batch = PieceBatch::new();
        if self.pieces.is_empty() {
            return batch;
        }
        while !batch.is_full() {
            if self.cursor == self.pieces.len() {
                if !self.cycle {
                    break;
                }
                self.cursor = 0;
            }
            batch.push(self.pieces[self.cursor]);
            self.cursor += 1;
        }
        batch
    }

    fn restart(&mut self) {
        self.cursor = 0;
    }
}

/// Ordered sequence of upcoming pieces with a guaranteed minimum lookahead.
///
/// Pieces are appended at the tail by the [`PieceGenerator`] and consumed from
/// the head. Before every consume the queue is topped up so that at least
/// `min_lookahead` pieces remain visible afterwards.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, PieceQueue, ScriptedGenerator};
///
/// let generator = ScriptedGenerator::cycling(vec![PieceKind::I, PieceKind::O]);
/// let mut queue = PieceQueue::new(Box::new(generator), 3).unwrap();
///
/// assert_eq!(queue.consume().unwrap(), PieceKind::I);
/// assert_eq!(queue.peek(2).unwrap(), [PieceKind::O, PieceKind::I]);
/// ```
#[derive(Debug)]
pub struct PieceQueue {
    generator: Box<dyn PieceGenerator>,
    upcoming: VecDeque<PieceKind>,
    min_lookahead: usize,
}

impl PieceQueue {
    pub fn new(
        generator: Box<dyn PieceGenerator>,
        min_lookahead: usize,
    ) -> Result<Self, QueueUnderflow> {
        let mut queue = Self {
            generator,
            upcoming: VecDeque::with_capacity(min_lookahead + PieceKind::LEN),
            min_lookahead,
        };
        queue.fill_to(min_lookahead)?;
        Ok(queue)
    }

    #[must_use]
    pub fn min_lookahead(&self) -> usize {
        self.min_lookahead
    }

    fn fill_to(&mut self, len: usize) -> Result<(), QueueUnderflow> {
        while self.upcoming.len() < len {
            let batch = self.generator.next_batch();
            if batch.is_empty() {
                log::warn!(
                    "piece generator exhausted with {} of {len} pieces queued",
                    self.upcoming.len()
                );
                return Err(QueueUnderflow {
                    requested: len,
                    available: self.upcoming.len(),
                });
            }
            self.upcoming.extend(batch);
        }
        Ok(())
    }

    /// Returns the next `n` pieces without consuming them.
    pub fn peek(&mut self, n: usize) -> Result<Vec<PieceKind>, QueueUnderflow> {
        self.fill_to(n)?;
        Ok(self.upcoming.iter().take(n).copied().collect())
    }

    /// Returns the next piece without consuming it.
    pub fn peek_next(&mut self) -> Result<PieceKind, QueueUnderflow> {
        self.fill_to(1)?;
        Ok(self.upcoming[0])
    }

    /// Pops the head piece, keeping at least `min_lookahead` pieces queued.
    ///
    /// Nothing is consumed if the generator cannot supply enough lookahead.
    pub fn consume(&mut self) -> Result<PieceKind, QueueUnderflow> {
        self.fill_to(self.min_lookahead + 1)?;
        self.upcoming.pop_front().ok_or(QueueUnderflow {
            requested: 1,
            available: 0,
        })
    }

    /// Iterates over the pieces currently queued.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    /// Discards the queued pieces and refills from a restarted generator.
    pub fn reset(&mut self) -> Result<(), QueueUnderflow> {
        self.upcoming.clear();
        self.generator.restart();
        self.fill_to(self.min_lookahead)
    }
}
