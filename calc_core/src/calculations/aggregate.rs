//! # Aggregator
//!
//! Sums component measures (volume or area) in input order. Subtotals mirror
//! the order of the components so the display can line them up row by row.

use serde::{Deserialize, Serialize};

use super::geometry::Measured;

/// Total and per-component subtotals for one ordered list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Aggregate {
    /// Sum of all subtotals
    pub total: f64,
    /// One entry per input component, same order
    pub subtotals: Vec<f64>,
}

impl Aggregate {
    /// `true` when there was nothing to sum
    pub fn is_empty(&self) -> bool {
        self.subtotals.is_empty()
    }
}

/// Aggregate any list of measured components.
///
/// An empty slice yields a total of 0.
///
/// ```rust
/// use calc_core::calculations::aggregate::aggregate;
/// use calc_core::calculations::geometry::WallComponent;
///
/// let walls = vec![
///     WallComponent::new("Nord", 10.0, 2.5),
///     WallComponent::new("Sud", 8.0, 2.5),
/// ];
/// let agg = aggregate(&walls);
/// assert_eq!(agg.subtotals, vec![25.0, 20.0]);
/// assert_eq!(agg.total, 45.0);
/// ```
pub fn aggregate<T: Measured>(components: &[T]) -> Aggregate {
    let subtotals: Vec<f64> = components.iter().map(Measured::measure).collect();
    let total = subtotals.iter().sum();
    Aggregate { total, subtotals }
}

/// Sum of measures without keeping subtotals
pub fn total<T: Measured>(components: &[T]) -> f64 {
    components.iter().map(Measured::measure).sum()
}
