use std::sync::Arc;

use crate::core::types::{reverse_complement, Orientation};

/// An imported read in one orientation
///
/// The sequence is shared with the [`ReadStore`](crate::core::read_store::ReadStore),
/// so copying a `Read` into a contig's matchlist never duplicates bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    sequence: Arc<[u8]>,
    orientation: Orientation,
}

impl Read {
    pub fn new(sequence: impl Into<Arc<[u8]>>, orientation: Orientation) -> Self {
        Self {
            sequence: sequence.into(),
            orientation,
        }
    }

    /// Forward read from a byte string, handy for seeding matchlists in tests
    pub fn forward(sequence: &[u8]) -> Self {
        Self::new(sequence, Orientation::Forward)
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The same read seen from the opposite strand
    ///
    /// Allocates a new sequence; only used when mapping placements between
    /// a contig and its reverse complement.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        Self::new(reverse_complement(&self.sequence), self.orientation.flip())
    }
}

/// A read placed against a contig's coordinate frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub read: Read,
    /// Contig-relative position of the read's first base, negative when the
    /// read overhangs the contig start
    pub start: i64,
}

impl AlignedRead {
    pub fn new(read: Read, start: i64) -> Self {
        Self { read, start }
    }

    /// One past the last contig-relative position covered by the read
    #[allow(clippy::cast_possible_wrap)] // read lengths are far below i64::MAX
    pub fn end(&self) -> i64 {
        self.start + self.read.len() as i64
    }

    pub fn covers(&self, pos: i64) -> bool {
        self.start <= pos && pos < self.end()
    }

    /// Base aligned to contig position `pos`, if the read spans it
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // pos - start >= 0 checked
    pub fn base_at(&self, pos: i64) -> Option<u8> {
        if self.covers(pos) {
            Some(self.read.sequence()[(pos - self.start) as usize])
        } else {
            None
        }
    }
}
