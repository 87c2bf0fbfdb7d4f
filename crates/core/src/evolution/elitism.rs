//! Elitism bookkeeping.

use serde::{Deserialize, Serialize};

/// Record of one elitism replacement during breeding.
///
/// When a new generation is bred, the best `n_elites` parents are carried
/// over unchanged, replacing bred offspring. Each replacement is recorded so
/// the generation's elitism table documents which candidates were displaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elitism {
    /// Position in the new population that was replaced.
    pub index: usize,
    /// Name of the bred offspring that was displaced.
    pub replaced: String,
    /// Name of the elite parent that took its place.
    pub replacement: String,
    /// The elite parent's chi-squared score.
    pub replacement_chi_squared: f64,
}
