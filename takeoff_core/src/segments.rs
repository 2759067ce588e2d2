//! # Segment Aggregator
//!
//! Walls and ceilings are measured as a list of axis-aligned rectangles so
//! that L-shapes, soffits and partial-height runs can be entered as a sum of
//! simple pieces. This module validates those rectangles and sums them into
//! the totals the quantity formulas consume:
//!
//! - total area (boards, finishing, ceiling framing)
//! - total width (wall studs and track)
//! - sum of width + length (ceiling angle trim)
//!
//! Invalid segments are skipped and reported; they never abort their siblings.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::segments::{aggregate, WallSegment};
//!
//! let segments = vec![WallSegment::new(3.0, 2.4), WallSegment::new(-1.0, 2.4)];
//! let totals = aggregate(&segments);
//!
//! assert_eq!(totals.measured.len(), 1);
//! assert_eq!(totals.total_width.0, 3.0);
//! assert_eq!(totals.issues.len(), 1);
//! assert_eq!(totals.issues[0].to_string(), "Segment 2: invalid dimensions");
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Meters, SquareMeters};
use crate::validation::ValidationIssue;

/// A rectangular measurement: a width along the run plus a second dimension.
pub trait Segment {
    /// Width along the wall run or across the ceiling
    fn width(&self) -> Meters;

    /// Height (walls) or length (ceilings)
    fn extent(&self) -> Meters;

    /// Both dimensions and their product finite and strictly positive
    fn is_valid(&self) -> bool {
        self.width().is_positive() && self.extent().is_positive() && self.area().is_positive()
    }

    fn area(&self) -> SquareMeters {
        self.width() * self.extent()
    }
}

/// One rectangle of a wall face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    /// Width along the wall (m)
    #[serde(default)]
    pub width_m: f64,
    /// Height (m)
    #[serde(default)]
    pub height_m: f64,
}

impl WallSegment {
    pub fn new(width_m: f64, height_m: f64) -> Self {
        WallSegment { width_m, height_m }
    }
}

impl Segment for WallSegment {
    fn width(&self) -> Meters {
        Meters(self.width_m)
    }

    fn extent(&self) -> Meters {
        Meters(self.height_m)
    }
}

/// One rectangle of a suspended ceiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeilingSegment {
    /// Width (m)
    #[serde(default)]
    pub width_m: f64,
    /// Length (m)
    #[serde(default)]
    pub length_m: f64,
}

impl CeilingSegment {
    pub fn new(width_m: f64, length_m: f64) -> Self {
        CeilingSegment { width_m, length_m }
    }
}

impl Segment for CeilingSegment {
    fn width(&self) -> Meters {
        Meters(self.width_m)
    }

    fn extent(&self) -> Meters {
        Meters(self.length_m)
    }
}

/// A segment that passed validation, echoed with its position and area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredSegment<S> {
    /// 1-based position within the item, counting invalid segments too
    pub number: usize,
    #[serde(flatten)]
    pub segment: S,
    pub area_m2: f64,
}

/// Totals over the valid segments of one item
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAggregate<S> {
    /// Valid segments in input order
    pub measured: Vec<MeasuredSegment<S>>,
    pub total_area: SquareMeters,
    pub total_width: Meters,
    /// Σ(width + extent), the trim-length proxy for ceilings
    pub perimeter_sum: Meters,
    /// Segment-level problems found while aggregating
    pub issues: Vec<ValidationIssue>,
}

impl<S> SegmentAggregate<S> {
    pub fn has_valid_segment(&self) -> bool {
        !self.measured.is_empty()
    }
}

/// Validate and sum a segment list.
///
/// An empty list and a list without a single valid segment are both reported
/// as item-level issues; the returned totals are then zero.
pub fn aggregate<S: Segment + Clone>(segments: &[S]) -> SegmentAggregate<S> {
    let mut result = SegmentAggregate {
        measured: Vec::with_capacity(segments.len()),
        total_area: SquareMeters(0.0),
        total_width: Meters(0.0),
        perimeter_sum: Meters(0.0),
        issues: Vec::new(),
    };

    if segments.is_empty() {
        result.issues.push(ValidationIssue::NoSegments);
        return result;
    }

    for (index, segment) in segments.iter().enumerate() {
        let number = index + 1;
        if !segment.is_valid() {
            result.issues.push(ValidationIssue::InvalidSegment { number });
            continue;
        }

        let area = segment.area();
        result.total_area = result.total_area + area;
        result.total_width = result.total_width + segment.width();
        result.perimeter_sum = result.perimeter_sum + segment.width() + segment.extent();
        result.measured.push(MeasuredSegment {
            number,
            segment: segment.clone(),
            area_m2: area.value(),
        });
    }

    if result.measured.is_empty() {
        result.issues.push(ValidationIssue::NoValidSegments);
    }

    result
}
