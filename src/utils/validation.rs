//! Centralized validation and helper functions for sequence input.

/// Validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid symbol '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("Empty sequence")]
    EmptySequence,
}

/// IUPAC nucleotide codes accepted on input (either case)
const IUPAC: &[u8] = b"ACGTUNRYSWKMBDHV";

/// Check whether `symbol` is an IUPAC nucleotide code.
///
/// # Examples
///
/// ```
/// use afin::utils::validation::is_nucleotide;
///
/// assert!(is_nucleotide(b'a'));
/// assert!(is_nucleotide(b'R'));
/// assert!(!is_nucleotide(b'*'));
/// ```
#[must_use]
pub fn is_nucleotide(symbol: u8) -> bool {
    IUPAC.contains(&symbol.to_ascii_uppercase())
}

/// Reject sequences that are empty or contain non-nucleotide symbols.
///
/// # Errors
///
/// Returns `ValidationError::EmptySequence` for an empty sequence, or
/// `ValidationError::InvalidSymbol` for the first symbol that is not an
/// IUPAC nucleotide code.
pub fn validate_sequence(seq: &[u8]) -> Result<(), ValidationError> {
    if seq.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    match seq.iter().position(|&b| !is_nucleotide(b)) {
        Some(position) => Err(ValidationError::InvalidSymbol {
            symbol: char::from(seq[position]),
            position,
        }),
        None => Ok(()),
    }
}

/// Uppercase a sequence and collapse every symbol outside `ACGT` to `N`.
///
/// `U` is read as `T`. Ambiguity codes become `N`, so the result is over the
/// five-letter alphabet used during consensus.
#[must_use]
pub fn normalize_sequence(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|b| match b.to_ascii_uppercase() {
            base @ (b'A' | b'C' | b'G' | b'T') => base,
            b'U' => b'T',
            _ => b'N',
        })
        .collect()
}
