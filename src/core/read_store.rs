//! Read-only pool of candidate reads.
//!
//! Every read is kept in both orientations, each list sorted, so that the
//! reads beginning with a given short prefix form one contiguous range found
//! by binary search. Contigs use this to prune candidates before a full
//! comparison.

use std::ops::Range;
use std::sync::Arc;

use crate::core::read::Read;
use crate::core::types::{reverse_complement, Orientation};

#[derive(Debug, Default)]
pub struct ReadStore {
    forward: Vec<Arc<[u8]>>,
    reverse: Vec<Arc<[u8]>>,
}

impl ReadStore {
    /// Build a store from uppercase read sequences
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut forward: Vec<Arc<[u8]>> = Vec::new();
        let mut reverse: Vec<Arc<[u8]>> = Vec::new();

        for seq in sequences {
            let seq = seq.as_ref();
            if seq.is_empty() {
                continue;
            }
            reverse.push(reverse_complement(seq).into());
            forward.push(seq.into());
        }

        forward.sort_unstable();
        reverse.sort_unstable();

        Self { forward, reverse }
    }

    /// Number of imported reads (each counted once, not per orientation)
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    fn list(&self, orientation: Orientation) -> &[Arc<[u8]>] {
        match orientation {
            Orientation::Forward => &self.forward,
            Orientation::ReverseComplement => &self.reverse,
        }
    }

    /// Sequence at `index` of the sorted list for `orientation`
    pub fn sequence(&self, orientation: Orientation, index: usize) -> &[u8] {
        &self.list(orientation)[index]
    }

    /// Shareable handle to the read at `index`
    pub fn read(&self, orientation: Orientation, index: usize) -> Read {
        Read::new(Arc::clone(&self.list(orientation)[index]), orientation)
    }

    /// Range of indices whose sequences start with `prefix`
    ///
    /// Reads shorter than the prefix never match.
    pub fn prefix_range(&self, orientation: Orientation, prefix: &[u8]) -> Range<usize> {
        let list = self.list(orientation);
        let k = prefix.len();
        let lower = list.partition_point(|r| &r[..] < prefix);
        let upper = list.partition_point(|r| &r[..r.len().min(k)] <= prefix);
        lower..upper.max(lower)
    }

    /// Iterate every read in one orientation, in sorted order
    pub fn iter(&self, orientation: Orientation) -> impl Iterator<Item = &[u8]> {
        self.list(orientation).iter().map(|r| &r[..])
    }
}
