use std::collections::BTreeMap;
use std::ops::Range;

use tracing::debug;

use crate::assembly::config::ExtensionParams;
use crate::core::read::{AlignedRead, Read};
use crate::core::read_store::ReadStore;
use crate::core::types::{base_index, index_base, reverse_complement, End, Orientation, ALPHABET_SIZE};
use crate::utils::validation::normalize_sequence;

/// Why a consensus extension stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of bases was reached
    LengthReached,
    /// Fewer than `min_cov` reads cover the position
    LowCoverage,
    /// Two or more bases share the highest count
    Tie,
    /// The majority base is N
    Unresolved,
    /// Too many reads disagree with the majority base
    Disagreement,
    /// Cumulative agreement fell below `stop_ext`
    LowAgreement,
}

/// A contig under extension
///
/// Holds the consensus sequence and, transiently, the reads aligned against
/// it during one extension step. Coordinates of aligned reads are relative to
/// the current sequence, so the matchlist is cleared whenever the sequence
/// grows or is reoriented.
#[derive(Debug, Clone)]
pub struct Contig {
    name: String,
    sequence: Vec<u8>,
    matchlist: Vec<AlignedRead>,
    /// Start of the earliest-starting aligned read, if any
    first_read: Option<i64>,
    min_cov: usize,
    min_overlap: usize,
}

impl Contig {
    /// Create a contig from a seed sequence, copying the thresholds from `params`
    ///
    /// The sequence is uppercased and symbols outside `ACGTN` become `N`.
    pub fn new(name: impl Into<String>, sequence: &[u8], params: &ExtensionParams) -> Self {
        Self {
            name: name.into(),
            sequence: normalize_sequence(sequence),
            matchlist: Vec::new(),
            first_read: None,
            min_cov: params.min_cov,
            min_overlap: params.min_overlap,
        }
    }

    /// Override the minimum coverage for this contig only
    #[must_use]
    pub fn with_min_cov(mut self, min_cov: usize) -> Self {
        self.min_cov = min_cov;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn min_cov(&self) -> usize {
        self.min_cov
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    pub fn matches(&self) -> &[AlignedRead] {
        &self.matchlist
    }

    pub fn first_read(&self) -> Option<i64> {
        self.first_read
    }

    /// Record a candidate read at `start` in the current coordinate frame
    ///
    /// No validation is done here; see [`Contig::match_contig`].
    pub fn push_match(&mut self, read: Read, start: i64) {
        self.first_read = Some(self.first_read.map_or(start, |first| first.min(start)));
        self.matchlist.push(AlignedRead::new(read, start));
    }

    pub fn clear_matches(&mut self) {
        self.matchlist.clear();
        self.first_read = None;
    }

    /// Align candidate reads that start inside `window`
    ///
    /// Candidates are pruned by their first `max_sort_char` bases, then
    /// compared over the full overlap with the contig. A read is accepted if
    /// it overlaps by at least `min_overlap` bases with no more than
    /// `max_missed` mismatches. Each read keeps its best offset; a read with
    /// two equally good offsets is dropped. Returns the number of reads
    /// added to the matchlist.
    #[allow(clippy::cast_possible_wrap)]
    pub fn match_contig(
        &mut self,
        reads: &ReadStore,
        params: &ExtensionParams,
        window: Range<usize>,
    ) -> usize {
        let k = params.max_sort_char;
        let len = self.sequence.len();
        let min_overlap = self.min_overlap.max(k);
        if k == 0 || len < min_overlap {
            return 0;
        }

        let last_start = len - min_overlap;
        let mut best: BTreeMap<(Orientation, usize), Placement> = BTreeMap::new();

        for p in window.start..window.end.min(last_start + 1) {
            let prefix = &self.sequence[p..p + k];
            for orientation in [Orientation::Forward, Orientation::ReverseComplement] {
                for idx in reads.prefix_range(orientation, prefix) {
                    let read = reads.sequence(orientation, idx);
                    let overlap = (len - p).min(read.len());
                    if overlap < min_overlap {
                        continue;
                    }
                    let Some(missed) = count_mismatches(
                        &self.sequence[p + k..p + overlap],
                        &read[k..overlap],
                        params.max_missed,
                    ) else {
                        continue;
                    };
                    best.entry((orientation, idx))
                        .and_modify(|placement| placement.offer(p, missed))
                        .or_insert(Placement::new(p, missed));
                }
            }
        }

        let mut added = 0;
        for ((orientation, idx), placement) in best {
            if placement.ambiguous {
                continue;
            }
            self.push_match(reads.read(orientation, idx), placement.start as i64);
            added += 1;
        }
        added
    }

    /// Align reads that start before position 0 and run into the contig
    ///
    /// Such reads start inside the reverse complement of the contig, so they
    /// are found there among the last `sublen` bases and mapped back onto
    /// this strand with negative starts. Reads that also start inside this
    /// strand are left to [`Contig::match_contig`]. Returns the number of
    /// reads added to the matchlist.
    #[allow(clippy::cast_possible_wrap)]
    pub fn match_overhang(
        &mut self,
        reads: &ReadStore,
        params: &ExtensionParams,
        sublen: usize,
    ) -> usize {
        let mut mirror = Contig {
            name: self.name.clone(),
            sequence: reverse_complement(&self.sequence),
            matchlist: Vec::new(),
            first_read: None,
            min_cov: self.min_cov,
            min_overlap: self.min_overlap,
        };
        let len = mirror.sequence.len();
        mirror.match_contig(reads, params, len.saturating_sub(sublen)..len);

        let mut added = 0;
        for aligned in mirror.matchlist {
            let start = len as i64 - aligned.end();
            if start < 0 {
                self.push_match(aligned.read.reverse_complement(), start);
                added += 1;
            }
        }
        added
    }

    /// Number of aligned reads covering contig position `pos`
    pub fn check_cov(&self, pos: i64) -> usize {
        self.matchlist.iter().filter(|m| m.covers(pos)).count()
    }

    /// Consensus extension of up to `extend_len` bases past the 3' end
    pub fn check_match(&self, params: &ExtensionParams) -> Vec<u8> {
        self.check_match_len(params, params.extend_len)
    }

    /// Consensus extension of up to `len` bases past the 3' end
    ///
    /// Each position needs at least `min_cov` covering reads, a unique
    /// majority base, and a disagreeing fraction no larger than
    /// `mismatch_threshold`. The first position failing any test ends the
    /// extension.
    pub fn check_match_len(&self, params: &ExtensionParams, len: usize) -> Vec<u8> {
        self.consensus_extension(params, len).0
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    fn consensus_extension(&self, params: &ExtensionParams, len: usize) -> (Vec<u8>, StopReason) {
        let frontier = self.sequence.len() as i64;
        let mut extension = Vec::with_capacity(len);
        let mut agree_total = 0usize;
        let mut coverage_total = 0usize;

        for pos in frontier..frontier + len as i64 {
            let mut counts = [0usize; ALPHABET_SIZE];
            for base in self.matchlist.iter().filter_map(|m| m.base_at(pos)) {
                if let Some(i) = base_index(base) {
                    counts[i] += 1;
                }
            }

            let (base, agree, coverage) =
                match consensus(&counts, self.min_cov, params.mismatch_threshold) {
                    Ok(call) => call,
                    Err(reason) => return (extension, reason),
                };

            agree_total += agree;
            coverage_total += coverage;
            if (agree_total as f64 / coverage_total as f64) < params.stop_ext {
                return (extension, StopReason::LowAgreement);
            }

            extension.push(base);
        }

        (extension, StopReason::LengthReached)
    }

    /// One extension step on `end` using the configured lengths
    pub fn extend(&mut self, reads: &ReadStore, params: &ExtensionParams, end: End) -> usize {
        self.extend_with(
            reads,
            params,
            end,
            1,
            params.extend_len,
            params.contig_sub_len,
        )
    }

    /// Extend both ends once, 3' first; returns the number of bases added
    pub fn extend_both(&mut self, reads: &ReadStore, params: &ExtensionParams) -> usize {
        self.extend(reads, params, End::Three) + self.extend(reads, params, End::Five)
    }

    /// Run up to `loops` extension steps on `end`
    ///
    /// Every step aligns reads against the last `sublen` bases, appends the
    /// consensus extension of at most `len` bases and clears the matchlist.
    /// Stops early once a step adds nothing. Returns the number of bases
    /// added.
    pub fn extend_with(
        &mut self,
        reads: &ReadStore,
        params: &ExtensionParams,
        end: End,
        loops: usize,
        len: usize,
        sublen: usize,
    ) -> usize {
        if end.is_reverse() {
            self.reverse_complement_in_place();
        }

        let mut added = 0;
        for _ in 0..loops {
            self.clear_matches();
            let contig_len = self.sequence.len();
            self.match_contig(reads, params, contig_len.saturating_sub(sublen)..contig_len);

            let (extension, reason) = self.consensus_extension(params, len);
            debug!(
                contig = %self.name,
                end = %end,
                matches = self.matchlist.len(),
                added = extension.len(),
                stop = ?reason,
                "extension step"
            );
            if extension.is_empty() {
                break;
            }
            added += extension.len();
            self.sequence.extend_from_slice(&extension);
        }
        self.clear_matches();

        if end.is_reverse() {
            self.reverse_complement_in_place();
        }
        added
    }

    /// First position whose coverage reaches `min_cov`
    ///
    /// Scanning starts at the earliest aligned read; returns `None` when no
    /// position within the contig is sufficiently covered.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn find_start(&self) -> Option<usize> {
        let first = self.first_read?.max(0);
        (first..self.sequence.len() as i64)
            .find(|&pos| self.check_cov(pos) >= self.min_cov)
            .map(|pos| pos as usize)
    }

    /// Trim up to `initial_trim` poorly supported bases from each end
    ///
    /// For each end, reads are aligned against the first `contig_sub_len`
    /// bases, including reads overhanging the end, and everything before
    /// [`Contig::find_start`] is cut, capped at `initial_trim`. Returns the
    /// total number of bases removed.
    pub fn trim_low_coverage(&mut self, reads: &ReadStore, params: &ExtensionParams) -> usize {
        if params.initial_trim == 0 {
            return 0;
        }

        let mut trimmed = 0;
        for end in [End::Five, End::Three] {
            // Bring the end being trimmed to the front of the sequence
            let flip = !end.is_reverse();
            if flip {
                self.reverse_complement_in_place();
            }

            self.clear_matches();
            let window = 0..params.contig_sub_len.min(self.sequence.len());
            self.match_contig(reads, params, window);
            self.match_overhang(reads, params, params.contig_sub_len);
            let cut = self
                .find_start()
                .unwrap_or(params.initial_trim)
                .min(params.initial_trim)
                .min(self.sequence.len());
            self.sequence.drain(..cut);
            self.clear_matches();
            trimmed += cut;

            if flip {
                self.reverse_complement_in_place();
            }
        }

        if trimmed > 0 {
            debug!(contig = %self.name, trimmed, "trimmed low-coverage ends");
        }
        trimmed
    }

    /// Append bases taken from a contig being fused onto this one
    pub(crate) fn append_fused(&mut self, tail: &[u8]) {
        self.clear_matches();
        self.sequence.extend_from_slice(tail);
    }

    /// Replace the sequence with its reverse complement
    pub(crate) fn reverse_complement_in_place(&mut self) {
        self.clear_matches();
        self.sequence = reverse_complement(&self.sequence);
    }
}

/// Best offset seen so far for one candidate read
#[derive(Debug, Clone, Copy)]
struct Placement {
    start: usize,
    missed: usize,
    ambiguous: bool,
}

impl Placement {
    fn new(start: usize, missed: usize) -> Self {
        Self {
            start,
            missed,
            ambiguous: false,
        }
    }

    fn offer(&mut self, start: usize, missed: usize) {
        if missed < self.missed {
            *self = Self::new(start, missed);
        } else if missed == self.missed && start != self.start {
            self.ambiguous = true;
        }
    }
}

/// Count mismatches between two equal-length slices, giving up past `limit`
pub(crate) fn count_mismatches(a: &[u8], b: &[u8], limit: usize) -> Option<usize> {
    let mut missed = 0;
    for (x, y) in a.iter().zip(b) {
        if x != y {
            missed += 1;
            if missed > limit {
                return None;
            }
        }
    }
    Some(missed)
}

/// Call the consensus base from per-symbol counts
///
/// Returns the base, the number of reads agreeing with it and the coverage.
/// The disagreement bound is inclusive.
fn consensus(
    counts: &[usize; ALPHABET_SIZE],
    min_cov: usize,
    mismatch_threshold: f64,
) -> Result<(u8, usize, usize), StopReason> {
    let coverage: usize = counts.iter().sum();
    if coverage == 0 || coverage < min_cov {
        return Err(StopReason::LowCoverage);
    }

    let top = counts.iter().copied().max().unwrap_or(0);
    if counts.iter().filter(|&&c| c == top).count() > 1 {
        return Err(StopReason::Tie);
    }

    let index = counts.iter().position(|&c| c == top).unwrap_or(0);
    let base = index_base(index);
    if base == b'N' {
        return Err(StopReason::Unresolved);
    }

    #[allow(clippy::cast_precision_loss)]
    let disagreement = (coverage - top) as f64 / coverage as f64;
    if disagreement > mismatch_threshold {
        return Err(StopReason::Disagreement);
    }

    Ok((base, top, coverage))
}
