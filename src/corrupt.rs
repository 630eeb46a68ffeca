//! Channel noise simulation.
//!
//! A [`Corruptor`] mutates a [`ChannelBuffer`] in place with one to three
//! randomly chosen [`OperatorKind`]s. The operators know nothing about the
//! redundancy scheme that protects the payload; they only model what a noisy
//! link does to a stream of symbols (flipped bits, replaced, lost or injected
//! characters, transpositions and bursts).
//!
//! # Determinism
//!
//! The generator is owned by the corruptor. Build it with
//! [`Corruptor::seeded`] and the same seed and input always yield the same
//! operators and the same corrupted bytes.

use crate::error::{NoisewireError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest payload the relay will hold (8 KiB line buffer less room for one
/// inserted byte and the terminator)
pub const DEFAULT_CAPACITY: usize = 8190;

/// Upper bound on operators applied by one [`Corruptor::corrupt`] call
pub const MAX_OPERATORS: usize = 3;

/// Printable ASCII range used for substituted and inserted characters
const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

/// Owned payload buffer with an explicit growth bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl ChannelBuffer {
    /// Wrap `bytes`, which must already fit within `capacity`
    pub fn new(bytes: Vec<u8>, capacity: usize) -> Result<Self> {
        if bytes.len() > capacity {
            return Err(NoisewireError::CapacityExceeded {
                len: bytes.len(),
                capacity,
            });
        }
        Ok(Self { bytes, capacity })
    }

    pub fn with_default_capacity(bytes: Vec<u8>) -> Result<Self> {
        Self::new(bytes, DEFAULT_CAPACITY)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn flip_bit(&mut self, index: usize, bit: u8) {
        self.bytes[index] ^= 1 << bit;
    }

    fn set(&mut self, index: usize, value: u8) {
        self.bytes[index] = value;
    }

    fn remove(&mut self, index: usize) {
        self.bytes.remove(index);
    }

    fn swap_with_next(&mut self, index: usize) {
        self.bytes.swap(index, index + 1);
    }

    /// Insert one byte, refusing to grow past the capacity bound
    pub fn insert(&mut self, index: usize, value: u8) -> Result<()> {
        if self.bytes.len() + 1 > self.capacity {
            return Err(NoisewireError::CapacityExceeded {
                len: self.bytes.len(),
                capacity: self.capacity,
            });
        }
        self.bytes.insert(index, value);
        Ok(())
    }
}

/// The seven noise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatorKind {
    /// Flip one random bit of one random byte
    BitFlip,
    /// Replace one byte with a random printable character
    Substitute,
    /// Drop one byte; the buffer shrinks by one
    Delete,
    /// Inject a random printable character; the buffer grows by one
    Insert,
    /// Swap a byte with its right neighbour
    SwapAdjacent,
    /// One to four independent bit flips
    MultiBitFlip,
    /// Overwrite a run of 3 to 8 bytes, wrapping around the end
    Burst,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 7] = [
        OperatorKind::BitFlip,
        OperatorKind::Substitute,
        OperatorKind::Delete,
        OperatorKind::Insert,
        OperatorKind::SwapAdjacent,
        OperatorKind::MultiBitFlip,
        OperatorKind::Burst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::BitFlip => "bit-flip",
            OperatorKind::Substitute => "substitute",
            OperatorKind::Delete => "delete",
            OperatorKind::Insert => "insert",
            OperatorKind::SwapAdjacent => "swap-adjacent",
            OperatorKind::MultiBitFlip => "multi-bit-flip",
            OperatorKind::Burst => "burst",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperatorKind {
    type Err = NoisewireError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "bit-flip" | "flip" => Ok(Self::BitFlip),
            "substitute" | "substitution" => Ok(Self::Substitute),
            "delete" | "deletion" => Ok(Self::Delete),
            "insert" | "insertion" => Ok(Self::Insert),
            "swap-adjacent" | "swap" => Ok(Self::SwapAdjacent),
            "multi-bit-flip" | "multi-flip" => Ok(Self::MultiBitFlip),
            "burst" => Ok(Self::Burst),
            _ => Err(NoisewireError::InvalidOperator(s.to_string())),
        }
    }
}

/// Why an operator left the buffer untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Empty,
    TooShort,
    CapacityExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOperator {
    pub kind: OperatorKind,
    pub outcome: Outcome,
}

/// What a corruption pass did to a buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionReport {
    pub original_len: usize,
    pub final_len: usize,
    pub operators: Vec<AppliedOperator>,
}

impl CorruptionReport {
    /// Number of operators that actually changed the buffer
    pub fn applied_count(&self) -> usize {
        self.operators
            .iter()
            .filter(|op| op.outcome == Outcome::Applied)
            .count()
    }

    /// One-line human summary, e.g. `bit-flip, insert (skipped)`
    pub fn summary(&self) -> String {
        if self.operators.is_empty() {
            return "none".to_string();
        }
        self.operators
            .iter()
            .map(|op| match op.outcome {
                Outcome::Applied => op.kind.to_string(),
                Outcome::Skipped(_) => format!("{} (skipped)", op.kind),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Noise injector owning its random source
#[derive(Debug)]
pub struct Corruptor<R = ChaCha8Rng> {
    rng: R,
}

impl Corruptor<ChaCha8Rng> {
    /// Reproducible corruptor
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Corruptor seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Corruptor<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Apply 1 to [`MAX_OPERATORS`] uniformly chosen operators in sequence
    pub fn corrupt(&mut self, buffer: &mut ChannelBuffer) -> CorruptionReport {
        let count = self.rng.gen_range(1..=MAX_OPERATORS);
        let kinds: Vec<OperatorKind> = (0..count)
            .map(|_| OperatorKind::ALL[self.rng.gen_range(0..OperatorKind::ALL.len())])
            .collect();
        self.apply(buffer, &kinds)
    }

    /// Apply an explicit operator sequence; an empty slice leaves the buffer as is
    pub fn apply(&mut self, buffer: &mut ChannelBuffer, kinds: &[OperatorKind]) -> CorruptionReport {
        let original_len = buffer.len();
        let operators = kinds
            .iter()
            .map(|&kind| {
                let outcome = self.apply_one(buffer, kind);
                match outcome {
                    Outcome::Applied => {
                        tracing::debug!(operator = %kind, len = buffer.len(), "applied")
                    }
                    Outcome::Skipped(reason) => {
                        tracing::debug!(operator = %kind, ?reason, "skipped")
                    }
                }
                AppliedOperator { kind, outcome }
            })
            .collect();

        CorruptionReport {
            original_len,
            final_len: buffer.len(),
            operators,
        }
    }

    /// Apply a single operator to the buffer's current contents
    pub fn apply_one(&mut self, buffer: &mut ChannelBuffer, kind: OperatorKind) -> Outcome {
        let len = buffer.len();
        match kind {
            OperatorKind::Insert => return self.insert(buffer),
            OperatorKind::SwapAdjacent if len < 2 => {
                return Outcome::Skipped(SkipReason::TooShort)
            }
            _ if len == 0 => return Outcome::Skipped(SkipReason::Empty),
            OperatorKind::BitFlip => self.flip_random_bit(buffer),
            OperatorKind::Substitute => {
                let index = self.rng.gen_range(0..len);
                let value = self.printable();
                buffer.set(index, value);
            }
            OperatorKind::Delete => {
                let index = self.rng.gen_range(0..len);
                buffer.remove(index);
            }
            OperatorKind::SwapAdjacent => {
                let index = self.rng.gen_range(0..len - 1);
                buffer.swap_with_next(index);
            }
            OperatorKind::MultiBitFlip => {
                let flips = self.rng.gen_range(1..=4);
                for _ in 0..flips {
                    self.flip_random_bit(buffer);
                }
            }
            OperatorKind::Burst => {
                let burst_len = self.rng.gen_range(3..=8);
                let start = self.rng.gen_range(0..len);
                for i in 0..burst_len {
                    let value = self.printable();
                    buffer.set((start + i) % len, value);
                }
            }
        }
        Outcome::Applied
    }

    fn insert(&mut self, buffer: &mut ChannelBuffer) -> Outcome {
        let index = self.rng.gen_range(0..=buffer.len());
        let value = self.printable();
        match buffer.insert(index, value) {
            Ok(()) => Outcome::Applied,
            Err(_) => Outcome::Skipped(SkipReason::CapacityExceeded),
        }
    }

    fn flip_random_bit(&mut self, buffer: &mut ChannelBuffer) {
        let index = self.rng.gen_range(0..buffer.len());
        let bit = self.rng.gen_range(0..8);
        buffer.flip_bit(index, bit);
    }

    fn printable(&mut self) -> u8 {
        self.rng.gen_range(PRINTABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &[u8]) -> ChannelBuffer {
        ChannelBuffer::with_default_capacity(text.to_vec()).unwrap()
    }

    fn bit_distance(a: &[u8], b: &[u8]) -> u32 {
        a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
    }

    #[test]
    fn test_no_operators_leaves_buffer_unchanged() {
        let mut corruptor = Corruptor::seeded(7);
        let mut buf = buffer(b"HELLO");
        let report = corruptor.apply(&mut buf, &[]);
        assert_eq!(buf.as_bytes(), b"HELLO");
        assert!(report.operators.is_empty());
        assert_eq!(report.summary(), "none");
    }

    #[test]
    fn test_corrupt_applies_one_to_three_operators() {
        let mut corruptor = Corruptor::seeded(42);
        for _ in 0..200 {
            let mut buf = buffer(b"The quick brown fox");
            let report = corruptor.corrupt(&mut buf);
            assert!((1..=MAX_OPERATORS).contains(&report.operators.len()));
            assert_eq!(report.final_len, buf.len());
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = Corruptor::seeded(1234);
        let mut b = Corruptor::seeded(1234);
        for _ in 0..50 {
            let mut buf_a = buffer(b"reproducible noise");
            let mut buf_b = buffer(b"reproducible noise");
            let report_a = a.corrupt(&mut buf_a);
            let report_b = b.corrupt(&mut buf_b);
            assert_eq!(report_a, report_b);
            assert_eq!(buf_a, buf_b);
        }
    }

    #[test]
    fn test_every_operator_is_eventually_chosen() {
        let mut corruptor = Corruptor::seeded(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let mut buf = buffer(b"coverage");
            for op in corruptor.corrupt(&mut buf).operators {
                seen.insert(op.kind);
            }
        }
        assert_eq!(seen.len(), OperatorKind::ALL.len());
    }

    #[test]
    fn test_bit_flip_changes_exactly_one_bit() {
        let mut corruptor = Corruptor::seeded(3);
        for _ in 0..100 {
            let mut buf = buffer(b"abcdef");
            let outcome = corruptor.apply_one(&mut buf, OperatorKind::BitFlip);
            assert_eq!(outcome, Outcome::Applied);
            assert_eq!(buf.len(), 6);
            assert_eq!(bit_distance(buf.as_bytes(), b"abcdef"), 1);
        }
    }

    #[test]
    fn test_multi_bit_flip_changes_at_most_four_bits() {
        let mut corruptor = Corruptor::seeded(4);
        for _ in 0..100 {
            let mut buf = buffer(b"abcdef");
            corruptor.apply_one(&mut buf, OperatorKind::MultiBitFlip);
            assert_eq!(buf.len(), 6);
            assert!(bit_distance(buf.as_bytes(), b"abcdef") <= 4);
        }
    }

    #[test]
    fn test_substitute_writes_printable() {
        let mut corruptor = Corruptor::seeded(5);
        for _ in 0..100 {
            let mut buf = buffer(&[0u8; 4]);
            corruptor.apply_one(&mut buf, OperatorKind::Substitute);
            let changed: Vec<u8> = buf.as_bytes().iter().copied().filter(|&b| b != 0).collect();
            assert_eq!(changed.len(), 1);
            assert!(PRINTABLE.contains(&changed[0]));
        }
    }

    #[test]
    fn test_delete_and_insert_change_length() {
        let mut corruptor = Corruptor::seeded(6);
        let mut buf = buffer(b"HELLO");
        corruptor.apply_one(&mut buf, OperatorKind::Delete);
        assert_eq!(buf.len(), 4);
        corruptor.apply_one(&mut buf, OperatorKind::Insert);
        corruptor.apply_one(&mut buf, OperatorKind::Insert);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_delete_keeps_order_of_survivors() {
        let mut corruptor = Corruptor::seeded(8);
        let mut buf = buffer(b"abcdefgh");
        corruptor.apply_one(&mut buf, OperatorKind::Delete);
        let remaining = buf.as_bytes();
        assert_eq!(remaining.len(), 7);
        assert!(remaining.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insert_on_empty_buffer() {
        let mut corruptor = Corruptor::seeded(9);
        let mut buf = buffer(b"");
        assert_eq!(corruptor.apply_one(&mut buf, OperatorKind::Insert), Outcome::Applied);
        assert_eq!(buf.len(), 1);
        assert!(PRINTABLE.contains(&buf.as_bytes()[0]));
    }

    #[test]
    fn test_insert_respects_capacity() {
        let mut corruptor = Corruptor::seeded(10);
        let mut buf = ChannelBuffer::new(b"full".to_vec(), 4).unwrap();
        let outcome = corruptor.apply_one(&mut buf, OperatorKind::Insert);
        assert_eq!(outcome, Outcome::Skipped(SkipReason::CapacityExceeded));
        assert_eq!(buf.as_bytes(), b"full");
    }

    #[test]
    fn test_buffer_insert_reports_capacity_exceeded() {
        let mut buf = ChannelBuffer::new(vec![1, 2], 2).unwrap();
        assert!(matches!(
            buf.insert(0, 9),
            Err(NoisewireError::CapacityExceeded { len: 2, capacity: 2 })
        ));
        let mut roomy = ChannelBuffer::new(vec![1, 2], 3).unwrap();
        roomy.insert(2, 9).unwrap();
        assert_eq!(roomy.as_bytes(), &[1, 2, 9]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut corruptor = Corruptor::seeded(11);
        let mut buf = ChannelBuffer::new(b"0123456789".to_vec(), 12).unwrap();
        for _ in 0..500 {
            corruptor.corrupt(&mut buf);
            assert!(buf.len() <= buf.capacity());
        }
        assert_eq!(buf.capacity(), 12);
    }

    #[test]
    fn test_new_rejects_oversize_bytes() {
        assert!(matches!(
            ChannelBuffer::new(vec![b'A'; 20], 8),
            Err(NoisewireError::CapacityExceeded { len: 20, capacity: 8 })
        ));
        let exact = ChannelBuffer::new(vec![b'A'; 8], 8).unwrap();
        assert_eq!(exact.len(), exact.capacity());
        assert!(ChannelBuffer::with_default_capacity(vec![0; DEFAULT_CAPACITY + 1]).is_err());
    }

    #[test]
    fn test_swap_adjacent() {
        let mut corruptor = Corruptor::seeded(12);
        let mut buf = buffer(b"ab");
        assert_eq!(corruptor.apply_one(&mut buf, OperatorKind::SwapAdjacent), Outcome::Applied);
        assert_eq!(buf.as_bytes(), b"ba");

        let mut single = buffer(b"a");
        assert_eq!(
            corruptor.apply_one(&mut single, OperatorKind::SwapAdjacent),
            Outcome::Skipped(SkipReason::TooShort)
        );
        assert_eq!(single.as_bytes(), b"a");
    }

    #[test]
    fn test_swap_preserves_multiset() {
        let mut corruptor = Corruptor::seeded(13);
        let mut buf = buffer(b"abcdefg");
        corruptor.apply_one(&mut buf, OperatorKind::SwapAdjacent);
        let mut sorted = buf.as_bytes().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, b"abcdefg");
        assert_ne!(buf.as_bytes(), b"abcdefg");
    }

    #[test]
    fn test_burst_wraps_short_buffers() {
        let mut corruptor = Corruptor::seeded(14);
        for _ in 0..50 {
            let mut buf = buffer(&[0u8, 0u8]);
            corruptor.apply_one(&mut buf, OperatorKind::Burst);
            // Burst length is at least 3, so both positions are overwritten
            assert_eq!(buf.len(), 2);
            assert!(buf.as_bytes().iter().all(|b| PRINTABLE.contains(b)));
        }
    }

    #[test]
    fn test_burst_touches_contiguous_run() {
        // Ten bytes: longer than any burst, short enough that runs often wrap
        const LEN: usize = 10;
        let mut corruptor = Corruptor::seeded(15);
        let mut wrapped = 0;
        for _ in 0..200 {
            let mut buf = buffer(&[0u8; LEN]);
            corruptor.apply_one(&mut buf, OperatorKind::Burst);
            let touched: Vec<bool> = buf.as_bytes().iter().map(|&b| b != 0).collect();
            assert!((3..=8).contains(&touched.iter().filter(|&&t| t).count()));

            // Exactly one touched index whose left neighbour (mod LEN) is untouched
            let run_starts = (0..LEN)
                .filter(|&i| touched[i] && !touched[(i + LEN - 1) % LEN])
                .count();
            assert_eq!(run_starts, 1, "{:?}", buf.as_bytes());

            if touched[0] && touched[LEN - 1] {
                wrapped += 1;
            }
        }
        assert!(wrapped > 0);
    }

    #[test]
    fn test_empty_buffer_operators_skip() {
        let mut corruptor = Corruptor::seeded(16);
        for kind in OperatorKind::ALL {
            if kind == OperatorKind::Insert {
                continue;
            }
            let mut buf = buffer(b"");
            let outcome = corruptor.apply_one(&mut buf, kind);
            assert!(matches!(outcome, Outcome::Skipped(_)), "{}", kind);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn test_operator_names_roundtrip() {
        for kind in OperatorKind::ALL {
            assert_eq!(kind.as_str().parse::<OperatorKind>().unwrap(), kind);
        }
        assert_eq!("BIT_FLIP".parse::<OperatorKind>().unwrap(), OperatorKind::BitFlip);
        assert!("scramble".parse::<OperatorKind>().is_err());
    }

    #[test]
    fn test_report_summary_marks_skips() {
        let mut corruptor = Corruptor::seeded(17);
        let mut buf = ChannelBuffer::new(b"x".to_vec(), 1).unwrap();
        let report = corruptor.apply(&mut buf, &[OperatorKind::Insert, OperatorKind::BitFlip]);
        assert_eq!(report.summary(), "insert (skipped), bit-flip");
        assert_eq!(report.applied_count(), 1);
    }
}
