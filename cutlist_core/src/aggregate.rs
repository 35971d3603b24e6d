//! # Totals
//!
//! Summary figures shown under the cutting table: how many cabinets, how
//! many pieces to cut, and how much board that is. Totals are always
//! re-derived from the current rows and never stored.

use serde::{Deserialize, Serialize};

use crate::calculations::Part;
use crate::project::Cabinet;
use crate::units::{SquareCentimeters, SquareMeters};

/// Aggregate figures over cabinets and free-form rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Number of cabinets in the table
    pub cabinet_count: usize,

    /// Sum of all row quantities
    pub part_count: u64,

    /// Sum of width × length × quantity, in m²
    pub area: SquareMeters,
}

/// Compute totals over every cabinet's parts plus the extra rows.
///
/// # Example
///
/// ```rust
/// use cutlist_core::aggregate::aggregate;
/// use cutlist_core::calculations::Part;
///
/// let extras = vec![Part::custom("plinth", 1, 10.0, 100.0)];
/// let totals = aggregate(&[], &extras);
/// assert_eq!(totals.part_count, 1);
/// assert_eq!(totals.area.0, 0.1);
/// ```
pub fn aggregate(cabinets: &[Cabinet], extra_rows: &[Part]) -> Totals {
    let rows = || {
        cabinets
            .iter()
            .flat_map(|c| c.parts.iter())
            .chain(extra_rows.iter())
    };

    let part_count = rows().map(|p| u64::from(p.quantity)).sum();
    let area_cm2: SquareCentimeters = rows().map(Part::area).sum();

    Totals {
        cabinet_count: cabinets.len(),
        part_count,
        area: area_cm2.into(),
    }
}
