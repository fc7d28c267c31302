//! Seeded, cursor-addressable random stream.
//!
//! Every random decision the engine makes (spawn cell, spawn value) is drawn
//! from a [`SeededPrng`] keyed by a string seed and a cursor counting the draws
//! consumed so far. The pair `(seed, cursor)` is all a caller needs to persist:
//! re-deriving a stream from it reproduces the exact next draw.
//!
//! # Determinism
//!
//! Two streams built from the same seed and cursor yield identical sequences.
//! Moving the cursor re-derives the generator from `(seed, 0)` and replays the
//! skipped steps, so resuming costs O(cursor).

use crate::error::{ErrorSeverity, GameError};

/// Errors raised by random stream operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RngError {
    #[error("max_exclusive must be > 0 (got {max_exclusive})")]
    NonPositiveBound { max_exclusive: usize },

    #[error("cursor {cursor} cannot advance by {steps} draws")]
    CursorOverflow { cursor: u64, steps: u64 },
}

impl GameError for RngError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveBound { .. } => "RNG_NON_POSITIVE_BOUND",
            Self::CursorOverflow { .. } => "RNG_CURSOR_OVERFLOW",
        }
    }
}

/// Source of uniform draws consumed by the move engine.
///
/// Implementations must be deterministic and must advance [`cursor`](Self::cursor)
/// by exactly one per call to [`next_f64`](Self::next_f64).
pub trait RngStream {
    /// Number of draws consumed so far.
    fn cursor(&self) -> u64;

    /// Returns the next draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Returns an integer in `[0, max_exclusive)` using a single draw.
    fn next_int(&mut self, max_exclusive: usize) -> Result<usize, RngError> {
        if max_exclusive == 0 {
            return Err(RngError::NonPositiveBound { max_exclusive });
        }
        let scaled = (self.next_f64() * max_exclusive as f64).floor() as usize;
        // Guards against float rounding at the very top of the range.
        Ok(scaled.min(max_exclusive - 1))
    }
}

/// Persistable position of a stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrngSnapshot {
    pub seed: String,
    pub cursor: u64,
}

/// A single draw recorded for replay verification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranscriptEntry {
    pub cursor: u64,
    pub value: f64,
}

/// Deterministic random stream anchored at `(seed, cursor)`.
///
/// Not cryptographically secure; gameplay only.
#[derive(Clone, Debug)]
pub struct SeededPrng {
    seed: String,
    cursor: u64,
    generator: Mulberry32,
    transcript: Vec<TranscriptEntry>,
}

impl SeededPrng {
    /// Creates a stream positioned after `cursor` draws of `seed`.
    pub fn new(seed: impl Into<String>, cursor: u64) -> Self {
        let seed = seed.into();
        let generator = Mulberry32::anchored(&seed, cursor);
        Self {
            seed,
            cursor,
            generator,
            transcript: Vec::new(),
        }
    }

    /// Rebuilds a stream from a persisted snapshot.
    pub fn restore(snapshot: &PrngSnapshot) -> Self {
        Self::new(snapshot.seed.clone(), snapshot.cursor)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Repositions the stream so the next draw is draw number `cursor`.
    ///
    /// The generator is re-derived from the seed and fast-forwarded.
    pub fn set_cursor(&mut self, cursor: u64) {
        self.generator = Mulberry32::anchored(&self.seed, cursor);
        self.cursor = cursor;
    }

    /// Creates an independent stream over the same seed.
    ///
    /// The fork starts at `cursor` when given, otherwise at the current
    /// position. Its transcript starts empty.
    pub fn fork(&self, cursor: Option<u64>) -> Self {
        Self::new(self.seed.clone(), cursor.unwrap_or(self.cursor))
    }

    pub fn to_snapshot(&self) -> PrngSnapshot {
        PrngSnapshot {
            seed: self.seed.clone(),
            cursor: self.cursor,
        }
    }

    /// Every draw produced by this stream instance, in order.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }
}

impl RngStream for SeededPrng {
    fn cursor(&self) -> u64 {
        self.cursor
    }

    fn next_f64(&mut self) -> f64 {
        let value = self.generator.next_f64();
        self.transcript.push(TranscriptEntry {
            cursor: self.cursor,
            value,
        });
        self.cursor += 1;
        value
    }
}

/// Returns a snapshot moved `steps` draws past `snapshot`.
pub fn advance_seed_cursor(snapshot: &PrngSnapshot, steps: u64) -> Result<PrngSnapshot, RngError> {
    let cursor = snapshot
        .cursor
        .checked_add(steps)
        .ok_or(RngError::CursorOverflow {
            cursor: snapshot.cursor,
            steps,
        })?;
    Ok(PrngSnapshot {
        seed: snapshot.seed.clone(),
        cursor,
    })
}

/// Forks `prng` at its current position plus `steps`.
pub fn fork_with_advance(prng: &SeededPrng, steps: u64) -> Result<SeededPrng, RngError> {
    let advanced = advance_seed_cursor(&prng.to_snapshot(), steps)?;
    Ok(prng.fork(Some(advanced.cursor)))
}

/// mulberry32 generator seeded by the xmur3 hash of the seed string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const INCREMENT: u32 = 0x6d2b_79f5;

    fn from_seed(seed: &str) -> Self {
        Self {
            state: xmur3(seed),
        }
    }

    /// Generator for `seed`, fast-forwarded past `cursor` draws.
    fn anchored(seed: &str, cursor: u64) -> Self {
        let mut generator = Self::from_seed(seed);
        for _ in 0..cursor {
            generator.next_u32();
        }
        generator
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// xmur3 string hash over UTF-16 code units, returning its first output.
fn xmur3(seed: &str) -> u32 {
    let units: Vec<u16> = seed.encode_utf16().collect();
    let mut h: u32 = 1_779_033_703 ^ (units.len() as u32);
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}
