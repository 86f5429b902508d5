//! Run configuration.
//!
//! [`ExtensionParams`] is the immutable set of tunables for one sweep entry.
//! [`SweepOptions`] holds the comma-separated value lists given on the command
//! line and selects the parameters for each entry; position `i` picks the
//! `i`-th value of every list, or its last value when the list is shorter.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for option {option}")]
    InvalidValue { option: String, value: String },

    #[error("Option {0} requires at least one value")]
    EmptyList(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Value {value} for option {option} is out of range: expected {expected}")]
    OutOfRange {
        option: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid run control: {0}")]
    InvalidRunControl(String),
}

pub const DEFAULT_MAX_SEARCH_LOOPS: usize = 10;
pub const DEFAULT_CONTIG_SUB_LEN: usize = 100;
pub const DEFAULT_EXTEND_LEN: usize = 40;
pub const DEFAULT_MAX_SORT_CHAR: usize = 4;
pub const DEFAULT_MIN_COV: usize = 3;
pub const DEFAULT_MIN_OVERLAP: usize = 20;
pub const DEFAULT_INITIAL_TRIM: usize = 0;
pub const DEFAULT_MAX_MISSED: usize = 5;
pub const DEFAULT_STOP_EXT: f64 = 0.5;
pub const DEFAULT_MISMATCH_THRESHOLD: f64 = 0.1;

/// Names of the options that can be swept, in reporting order
pub const SWEEP_OPTION_NAMES: [&str; 10] = [
    "max_search_loops",
    "contig_sub_len",
    "extend_len",
    "max_sort_char",
    "min_cov",
    "min_overlap",
    "initial_trim",
    "max_missed",
    "stop_ext",
    "mismatch_threshold",
];

/// Tunables for matching, extension and fusion during one sweep entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionParams {
    /// Extend/fuse rounds to run
    pub max_search_loops: usize,
    /// Bases from the contig end searched for candidate reads
    pub contig_sub_len: usize,
    /// Maximum bases appended to one end per extension
    pub extend_len: usize,
    /// Prefix length used to prune candidate reads before full comparison
    pub max_sort_char: usize,
    /// Minimum reads covering a position for it to be accepted
    pub min_cov: usize,
    /// Minimum overlap between a read and a contig, or two fused contigs
    pub min_overlap: usize,
    /// Maximum low-coverage bases trimmed from each contig end before extension
    pub initial_trim: usize,
    /// Maximum mismatches allowed between a read and the contig
    pub max_missed: usize,
    /// Floor on cumulative agreement across an extension
    pub stop_ext: f64,
    /// Maximum fraction of reads disagreeing with the consensus base
    pub mismatch_threshold: f64,
}

impl Default for ExtensionParams {
    fn default() -> Self {
        Self {
            max_search_loops: DEFAULT_MAX_SEARCH_LOOPS,
            contig_sub_len: DEFAULT_CONTIG_SUB_LEN,
            extend_len: DEFAULT_EXTEND_LEN,
            max_sort_char: DEFAULT_MAX_SORT_CHAR,
            min_cov: DEFAULT_MIN_COV,
            min_overlap: DEFAULT_MIN_OVERLAP,
            initial_trim: DEFAULT_INITIAL_TRIM,
            max_missed: DEFAULT_MAX_MISSED,
            stop_ext: DEFAULT_STOP_EXT,
            mismatch_threshold: DEFAULT_MISMATCH_THRESHOLD,
        }
    }
}

/// Non-empty list of values for one sweepable option
#[derive(Debug, Clone, PartialEq)]
pub struct SweepList<T>(Vec<T>);

impl<T: Copy + FromStr> SweepList<T> {
    fn single(value: T) -> Self {
        Self(vec![value])
    }

    /// Parse a comma-separated list such as `"5,10"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyList` if no values are given and
    /// `ConfigError::InvalidValue` if any value fails to parse.
    pub fn parse(option: &str, text: &str) -> Result<Self, ConfigError> {
        let values = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                    option: option.to_string(),
                    value: s.to_string(),
                })
            })
            .collect::<Result<Vec<T>, ConfigError>>()?;

        if values.is_empty() {
            return Err(ConfigError::EmptyList(option.to_string()));
        }

        Ok(Self(values))
    }

    /// Value for sweep entry `i`, repeating the last value past the end
    pub fn get(&self, i: usize) -> T {
        self.0[i.min(self.0.len() - 1)]
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }
}

/// Per-option value lists for a parameter sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOptions {
    pub max_search_loops: SweepList<usize>,
    pub contig_sub_len: SweepList<usize>,
    pub extend_len: SweepList<usize>,
    pub max_sort_char: SweepList<usize>,
    pub min_cov: SweepList<usize>,
    pub min_overlap: SweepList<usize>,
    pub initial_trim: SweepList<usize>,
    pub max_missed: SweepList<usize>,
    pub stop_ext: SweepList<f64>,
    pub mismatch_threshold: SweepList<f64>,
}

impl Default for SweepOptions {
    fn default() -> Self {
        let d = ExtensionParams::default();
        Self {
            max_search_loops: SweepList::single(d.max_search_loops),
            contig_sub_len: SweepList::single(d.contig_sub_len),
            extend_len: SweepList::single(d.extend_len),
            max_sort_char: SweepList::single(d.max_sort_char),
            min_cov: SweepList::single(d.min_cov),
            min_overlap: SweepList::single(d.min_overlap),
            initial_trim: SweepList::single(d.initial_trim),
            max_missed: SweepList::single(d.max_missed),
            stop_ext: SweepList::single(d.stop_ext),
            mismatch_threshold: SweepList::single(d.mismatch_threshold),
        }
    }
}

impl SweepOptions {
    /// Parse `text` as the value list for the option called `name`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the option is unknown, the list is empty, a
    /// value does not parse, or a value is outside its allowed range.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), ConfigError> {
        match name {
            "max_search_loops" => self.max_search_loops = SweepList::parse(name, text)?,
            "contig_sub_len" => self.contig_sub_len = SweepList::parse(name, text)?,
            "extend_len" => self.extend_len = SweepList::parse(name, text)?,
            "max_sort_char" => {
                self.max_sort_char = SweepList::parse(name, text)?;
                require_positive(name, self.max_sort_char.values())?;
            }
            "min_cov" => {
                self.min_cov = SweepList::parse(name, text)?;
                require_positive(name, self.min_cov.values())?;
            }
            "min_overlap" => self.min_overlap = SweepList::parse(name, text)?,
            "initial_trim" => self.initial_trim = SweepList::parse(name, text)?,
            "max_missed" => self.max_missed = SweepList::parse(name, text)?,
            "stop_ext" => {
                self.stop_ext = SweepList::parse(name, text)?;
                require_fraction(name, self.stop_ext.values())?;
            }
            "mismatch_threshold" => {
                self.mismatch_threshold = SweepList::parse(name, text)?;
                require_fraction(name, self.mismatch_threshold.values())?;
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    /// Parameters for sweep entry `i`
    pub fn params(&self, i: usize) -> ExtensionParams {
        ExtensionParams {
            max_search_loops: self.max_search_loops.get(i),
            contig_sub_len: self.contig_sub_len.get(i),
            extend_len: self.extend_len.get(i),
            max_sort_char: self.max_sort_char.get(i),
            min_cov: self.min_cov.get(i),
            min_overlap: self.min_overlap.get(i),
            initial_trim: self.initial_trim.get(i),
            max_missed: self.max_missed.get(i),
            stop_ext: self.stop_ext.get(i),
            mismatch_threshold: self.mismatch_threshold.get(i),
        }
    }
}

fn require_positive(option: &str, values: &[usize]) -> Result<(), ConfigError> {
    match values.iter().find(|&&v| v == 0) {
        Some(v) => Err(ConfigError::OutOfRange {
            option: option.to_string(),
            value: v.to_string(),
            expected: "a value of at least 1",
        }),
        None => Ok(()),
    }
}

fn require_fraction(option: &str, values: &[f64]) -> Result<(), ConfigError> {
    match values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        Some(v) => Err(ConfigError::OutOfRange {
            option: option.to_string(),
            value: v.to_string(),
            expected: "a fraction between 0 and 1",
        }),
        None => Ok(()),
    }
}

/// Run controls that stay fixed across the whole sweep
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Worker threads spawned per extension round
    pub max_threads: usize,
    /// Fuse overlapping contigs after every round
    pub fusion: bool,
    /// Write intermediate assemblies and extra diagnostics
    pub test_run: bool,
    /// Number of sweep entries to run
    pub max_iterations: usize,
    /// Prefix for every output file
    pub output_prefix: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_threads: 4,
            fusion: true,
            test_run: false,
            max_iterations: 1,
            output_prefix: PathBuf::from("afin_out"),
        }
    }
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRunControl` for a zero thread count or a
    /// zero iteration count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads == 0 {
            return Err(ConfigError::InvalidRunControl(
                "max_threads must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidRunControl(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_repeats_last_value() {
        let mut sweep = SweepOptions::default();
        sweep.set("max_search_loops", "5,10").unwrap();

        let loops: Vec<usize> = (0..3).map(|i| sweep.params(i).max_search_loops).collect();
        assert_eq!(loops, vec![5, 10, 10]);
    }

    #[test]
    fn test_defaults() {
        let params = SweepOptions::default().params(7);
        assert_eq!(params, ExtensionParams::default());
        assert_eq!(params.max_search_loops, 10);
        assert_eq!(params.contig_sub_len, 100);
        assert_eq!(params.extend_len, 40);
        assert_eq!(params.max_sort_char, 4);
        assert_eq!(params.min_cov, 3);
        assert_eq!(params.min_overlap, 20);
        assert_eq!(params.initial_trim, 0);
        assert_eq!(params.max_missed, 5);
        assert!((params.stop_ext - 0.5).abs() < f64::EPSILON);
        assert!((params.mismatch_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_float_lists() {
        let mut sweep = SweepOptions::default();
        sweep.set("mismatch_threshold", "0.05, 0.2").unwrap();
        assert!((sweep.params(0).mismatch_threshold - 0.05).abs() < f64::EPSILON);
        assert!((sweep.params(4).mismatch_threshold - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        let mut sweep = SweepOptions::default();
        let err = sweep.set("extend_len", "40,abc").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                option: "extend_len".to_string(),
                value: "abc".to_string()
            }
        );
        // Negative values do not parse as counts
        assert!(sweep.set("min_cov", "-1").is_err());
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let mut sweep = SweepOptions::default();
        assert_eq!(
            sweep.set("min_overlap", " , ").unwrap_err(),
            ConfigError::EmptyList("min_overlap".to_string())
        );
    }

    #[test]
    fn test_range_checks() {
        let mut sweep = SweepOptions::default();
        assert!(matches!(
            sweep.set("max_sort_char", "4,0"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            sweep.set("stop_ext", "1.5"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            sweep.set("no_such_option", "1"),
            Err(ConfigError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_run_config_validation() {
        assert!(RunConfig::default().validate().is_ok());
        let config = RunConfig {
            max_threads: 0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
