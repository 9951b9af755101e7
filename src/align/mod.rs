//! Series alignment.
//!
//! Daily, weekly, and monthly series are placed onto one ordered set of date
//! labels so they can be charted together. Matching is by exact date only:
//! a label with no observation on that day becomes a gap (`None`), which the
//! chart layer bridges.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AlignedPoint, Observation};

/// A series positioned on reference labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub points: Vec<AlignedPoint>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of labels that carry a value.
    pub fn present(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// Number of labels left as gaps.
    pub fn missing(&self) -> usize {
        self.len() - self.present()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// `(date, value)` pairs with gaps dropped, for line rendering.
    pub fn present_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
            .collect()
    }
}

/// Two series aligned onto the union of their dates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnionAlignment {
    pub dates: Vec<NaiveDate>,
    pub first: AlignedSeries,
    pub second: AlignedSeries,
}

/// Align `sparse` onto `reference` labels by exact date.
///
/// Duplicate dates in `sparse` resolve to the last one seen. If no date
/// intersects, every point is a gap.
pub fn align_to_reference(reference: &[NaiveDate], sparse: &[Observation]) -> AlignedSeries {
    let lookup: HashMap<NaiveDate, f64> = sparse.iter().map(|o| (o.date, o.value)).collect();

    let points = reference
        .iter()
        .map(|&date| AlignedPoint {
            date,
            value: lookup.get(&date).copied(),
        })
        .collect();

    AlignedSeries { points }
}

/// Align two sparse series onto the sorted union of their dates.
pub fn align_union(first: &[Observation], second: &[Observation]) -> UnionAlignment {
    let dates: Vec<NaiveDate> = first
        .iter()
        .chain(second.iter())
        .map(|o| o.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    UnionAlignment {
        first: align_to_reference(&dates, first),
        second: align_to_reference(&dates, second),
        dates,
    }
}
