use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TetriminoKind;

/// Lookahead queue of upcoming tetrimino kinds, fed by 7-bag randomization.
///
/// Kinds are drawn from shuffled bags that each hold every kind exactly once,
/// so any 7 consecutive draws aligned on a bag boundary are a permutation of
/// the catalog. The queue is refilled whenever 7 or fewer kinds remain, which
/// keeps at least one full bag visible for previews.
///
/// # Example
///
/// ```
/// use tetrimino_engine::PieceQueue;
///
/// let mut queue = PieceQueue::new();
/// let upcoming: Vec<_> = queue.next_kinds().take(3).collect();
/// assert_eq!(queue.pop_next(), upcoming[0]);
/// ```
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    bag: VecDeque<TetriminoKind>,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// 128-bit seed for deterministic piece sequences.
///
/// Written as a 32-digit hexadecimal string, both in configuration files and
/// on the command line.
///
/// # Example
///
/// ```
/// use tetrimino_engine::{PieceQueue, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
///
/// let mut a = PieceQueue::with_seed(seed);
/// let mut b = PieceQueue::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid hex: {text}")]
    InvalidDigit { text: String },
}

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

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength { len: s.len() });
        }
        // from_str_radix accepts a leading sign, a seed does not
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParsePieceSeedError::InvalidDigit { text: s.to_owned() });
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| ParsePieceSeedError::InvalidDigit { text: s.to_owned() })?;
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

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_prefix(seed, [])
    }

    /// Creates a seeded queue whose first draws are `prefix`, in order.
    ///
    /// Bags are appended after the prefix as usual.
    #[must_use]
    pub fn with_prefix(seed: PieceSeed, prefix: impl IntoIterator<Item = TetriminoKind>) -> Self {
        let mut bag = VecDeque::with_capacity(TetriminoKind::LEN * 2);
        bag.extend(prefix);
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag,
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= TetriminoKind::LEN {
            let mut new_bag = TetriminoKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    pub fn pop_next(&mut self) -> TetriminoKind {
        self.fill_bag();
        self.bag
            .pop_front()
            .expect("Piece bag should never be empty")
    }

    /// Returns the upcoming kinds, nearest first.
    pub fn next_kinds(&self) -> impl Iterator<Item = TetriminoKind> + '_ {
        self.bag.iter().copied()
    }
}
