//! Fusion of contigs whose ends overlap.
//!
//! Runs serially with exclusive access to the [`ContigCollection`]. For every
//! contig the engine looks for the partner with the longest admissible
//! overlap, trying the partner in both orientations and the contig itself
//! reverse complemented. An overlap is admissible when it spans at least the
//! contig's `min_overlap` bases, the fraction of mismatched columns is no
//! larger than `mismatch_threshold`, and reads aligned across the junction
//! cover every overlapped position at least `min_cov` times. A partner found
//! verbatim inside the contig is absorbed outright.

use tracing::{debug, info};

use crate::assembly::collection::ContigCollection;
use crate::assembly::config::ExtensionParams;
use crate::core::contig::{count_mismatches, Contig};
use crate::core::read_store::ReadStore;
use crate::core::types::reverse_complement;

/// Suffix/prefix overlap between two sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// Overlap length in bases
    pub length: usize,
    /// Mismatched columns within the overlap
    pub mismatches: usize,
}

/// Chosen partner for one contig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusionCandidate {
    pub partner: usize,
    pub overlap: Overlap,
    /// The contig itself is used reverse complemented
    pub left_reversed: bool,
    /// The partner is used reverse complemented
    pub right_reversed: bool,
    /// The partner occurs verbatim inside the contig
    pub contained: bool,
}

/// Outcome of one fusion pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FusionReport {
    /// Suffix/prefix merges
    pub fusions: usize,
    /// Contigs dropped because another contig contains them
    pub contained: usize,
}

impl FusionReport {
    /// Contigs removed from the collection by this pass
    pub fn removed(&self) -> usize {
        self.fusions + self.contained
    }
}

pub struct FusionEngine<'a> {
    reads: &'a ReadStore,
    params: &'a ExtensionParams,
}

impl<'a> FusionEngine<'a> {
    pub fn new(reads: &'a ReadStore, params: &'a ExtensionParams) -> Self {
        Self { reads, params }
    }

    /// Longest admissible overlap of a suffix of `left` with a prefix of `right`
    ///
    /// Candidate lengths are pruned by requiring the first `max_sort_char`
    /// bases of `right` to match exactly.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn find_overlap(&self, left: &[u8], right: &[u8], min_overlap: usize) -> Option<Overlap> {
        let k = self.params.max_sort_char.max(1);
        let min_overlap = min_overlap.max(k);
        let longest = left.len().min(right.len());
        if min_overlap > longest {
            return None;
        }

        let seed = &right[..k];
        for length in (min_overlap..=longest).rev() {
            let start = left.len() - length;
            if &left[start..start + k] != seed {
                continue;
            }
            let limit = (self.params.mismatch_threshold * length as f64).ceil() as usize;
            let Some(mismatches) = count_mismatches(&left[start + k..], &right[k..length], limit)
            else {
                continue;
            };
            if mismatches as f64 / length as f64 <= self.params.mismatch_threshold {
                return Some(Overlap { length, mismatches });
            }
        }
        None
    }

    /// Whether reads support joining `left` and `right` over `overlap` bases
    ///
    /// Reads are aligned against the merged sequence around the overlap,
    /// flanked by up to `contig_sub_len` bases on either side, and every
    /// overlapped position must be covered by at least `min_cov` of them.
    #[allow(clippy::cast_possible_wrap)]
    pub fn junction_supported(
        &self,
        left: &[u8],
        right: &[u8],
        overlap: usize,
        min_cov: usize,
    ) -> bool {
        if min_cov == 0 {
            return true;
        }
        let flank = self.params.contig_sub_len;
        let overlap_start = left.len() - overlap;
        let from = overlap_start.saturating_sub(flank);
        let mut merged = left[from..].to_vec();
        merged.extend_from_slice(&right[overlap..right.len().min(overlap + flank)]);

        let mut junction = Contig::new("junction", &merged, self.params);
        let len = junction.len();
        junction.match_contig(self.reads, self.params, 0..len);
        junction.match_overhang(self.reads, self.params, len);

        let start = (overlap_start - from) as i64;
        let supported =
            (start..start + overlap as i64).all(|pos| junction.check_cov(pos) >= min_cov);
        if !supported {
            debug!(overlap, matches = junction.matches().len(), "junction lacks read support");
        }
        supported
    }

    /// Best fusion partner for the contig at `index`, if any
    pub fn best_partner(&self, contigs: &ContigCollection, index: usize) -> Option<FusionCandidate> {
        let left = contigs.get(index)?;
        let min_overlap = left.min_overlap();
        let min_cov = left.min_cov();
        let left_fwd = left.sequence();
        let left_rev = reverse_complement(left_fwd);

        let mut best: Option<FusionCandidate> = None;
        let mut offer = |candidate: FusionCandidate| {
            if best.map_or(true, |b| candidate.overlap.length > b.overlap.length) {
                best = Some(candidate);
            }
        };

        for (partner, right) in contigs.iter().enumerate() {
            if partner == index || right.is_empty() {
                continue;
            }
            let right_fwd = right.sequence();
            let right_rev = reverse_complement(right_fwd);

            if right_fwd.len() >= min_overlap
                && right_fwd.len() <= left_fwd.len()
                && (contains(left_fwd, right_fwd) || contains(left_fwd, &right_rev))
            {
                offer(FusionCandidate {
                    partner,
                    overlap: Overlap {
                        length: right_fwd.len(),
                        mismatches: 0,
                    },
                    left_reversed: false,
                    right_reversed: false,
                    contained: true,
                });
                continue;
            }

            let orientations: [(&[u8], &[u8], bool, bool); 3] = [
                (left_fwd, right_fwd, false, false),
                (left_fwd, &right_rev, false, true),
                (&left_rev, right_fwd, true, false),
            ];
            for (l, r, left_reversed, right_reversed) in orientations {
                let Some(overlap) = self.find_overlap(l, r, min_overlap) else {
                    continue;
                };
                if self.junction_supported(l, r, overlap.length, min_cov) {
                    offer(FusionCandidate {
                        partner,
                        overlap,
                        left_reversed,
                        right_reversed,
                        contained: false,
                    });
                }
            }
        }

        best
    }

    /// Merge overlapping contigs until no admissible pair remains
    pub fn run(&self, contigs: &mut ContigCollection) -> FusionReport {
        let mut report = FusionReport::default();

        loop {
            let before = report;
            let mut index = 0;
            while index < contigs.len() {
                let Some(candidate) = self.best_partner(contigs, index) else {
                    index += 1;
                    continue;
                };
                index = self.apply(contigs, index, candidate, &mut report);
            }
            if report == before {
                break;
            }
        }

        if report.removed() > 0 {
            info!(
                fusions = report.fusions,
                contained = report.contained,
                remaining = contigs.len(),
                "fusion pass complete"
            );
        }
        report
    }

    fn apply(
        &self,
        contigs: &mut ContigCollection,
        index: usize,
        candidate: FusionCandidate,
        report: &mut FusionReport,
    ) -> usize {
        let (kept_name, absorbed_name, tail) = {
            let left = contigs.get(index).map(Contig::name).unwrap_or_default();
            let Some(right) = contigs.get(candidate.partner) else {
                return index + 1;
            };
            let tail = if candidate.contained {
                Vec::new()
            } else if candidate.right_reversed {
                reverse_complement(right.sequence())[candidate.overlap.length..].to_vec()
            } else {
                right.sequence()[candidate.overlap.length..].to_vec()
            };
            (left.to_string(), right.name().to_string(), tail)
        };

        if candidate.left_reversed {
            if let Some(left) = contigs.get_mut(index) {
                left.reverse_complement_in_place();
            }
        }

        if candidate.contained {
            report.contained += 1;
            debug!(kept = %kept_name, absorbed = %absorbed_name, "absorbed contained contig");
        } else {
            report.fusions += 1;
            info!(
                kept = %kept_name,
                absorbed = %absorbed_name,
                overlap = candidate.overlap.length,
                mismatches = candidate.overlap.mismatches,
                "fused contigs"
            );
        }

        contigs.fuse(index, candidate.partner, &tail)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
