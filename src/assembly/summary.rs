use std::path::PathBuf;

use serde::Serialize;

use crate::assembly::config::ExtensionParams;

/// Length statistics for a set of sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub contigs: usize,
    pub total_length: usize,
    pub longest: usize,
    pub n50: usize,
}

impl AssemblyStats {
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut lengths: Vec<usize> = lengths.into_iter().collect();
        lengths.sort_unstable_by(|a, b| b.cmp(a));

        let total_length: usize = lengths.iter().sum();
        let mut running = 0;
        let n50 = lengths
            .iter()
            .find(|&&len| {
                running += len;
                running * 2 >= total_length
            })
            .copied()
            .unwrap_or(0);

        Self {
            contigs: lengths.len(),
            total_length,
            longest: lengths.first().copied().unwrap_or(0),
            n50,
        }
    }
}

/// Outcome of one sweep entry
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub iteration: usize,
    pub params: ExtensionParams,
    pub input_contigs: usize,
    pub input_length: usize,
    /// Bases removed by the initial trim
    pub trimmed: usize,
    /// Contigs removed by fusion or containment
    pub fused: usize,
    /// Bases appended by extension across all rounds
    pub bases_added: usize,
    pub stats: AssemblyStats,
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n50() {
        let stats = AssemblyStats::from_lengths([2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(stats.contigs, 9);
        assert_eq!(stats.total_length, 54);
        assert_eq!(stats.longest, 10);
        // 10 + 9 + 8 = 27 reaches half of 54
        assert_eq!(stats.n50, 8);
    }

    #[test]
    fn test_empty() {
        assert_eq!(AssemblyStats::from_lengths([]), AssemblyStats::default());
    }
}
