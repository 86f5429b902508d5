use serde::{Deserialize, Serialize};

/// Orientation of a read relative to how it was imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Forward,
    ReverseComplement,
}

impl Orientation {
    #[must_use]
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::ReverseComplement)
    }

    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Forward => Self::ReverseComplement,
            Self::ReverseComplement => Self::Forward,
        }
    }
}

/// Contig end being extended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum End {
    /// 5' end (start of the stored sequence)
    Five,
    /// 3' end (end of the stored sequence)
    Three,
}

impl End {
    /// Extension of this end runs on the reverse complement of the contig
    #[must_use]
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::Five)
    }
}

impl std::fmt::Display for End {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Five => write!(f, "5'"),
            Self::Three => write!(f, "3'"),
        }
    }
}

/// Number of distinct symbols tallied during consensus (A, C, G, T, N)
pub const ALPHABET_SIZE: usize = 5;

/// Slot of `base` in a per-position tally, `None` for anything outside the alphabet
#[must_use]
pub fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        b'N' => Some(4),
        _ => None,
    }
}

/// Inverse of [`base_index`]
#[must_use]
pub fn index_base(index: usize) -> u8 {
    b"ACGTN"[index]
}

#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        _ => b'N',
    }
}

/// Reverse complement of an uppercase nucleotide sequence
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ACGTN"), b"NACGT".to_vec());
        assert_eq!(reverse_complement(b"AAAACCCC"), b"GGGGTTTT".to_vec());
        assert_eq!(reverse_complement(b""), Vec::<u8>::new());
    }

    #[test]
    fn test_base_index_round_trips_alphabet() {
        for (i, &b) in b"ACGTN".iter().enumerate() {
            assert_eq!(base_index(b), Some(i));
            assert_eq!(index_base(i), b);
        }
        assert_eq!(base_index(b'a'), None);
        assert_eq!(base_index(b'-'), None);
    }

    #[test]
    fn test_end_direction() {
        assert!(End::Five.is_reverse());
        assert!(!End::Three.is_reverse());
        assert_eq!(End::Five.to_string(), "5'");
    }
}
