//! # Cabinet Specification
//!
//! The input to the part calculator: the cabinet kind and its outer
//! dimensions, in centimeters. A `CabinetSpec` is only ever built from a
//! validated form (see [`crate::validation`]) or from the constructors
//! below, and it is never mutated by a calculation.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "kind": "floor",
//!   "width_cm": 49.0,
//!   "height_cm": 77.1,
//!   "depth_cm": 55.0,
//!   "shelf_count": 1,
//!   "stretcher_quantity": 2,
//!   "stretcher_height_cm": 12.0
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Default stretcher strip height in centimeters
pub const DEFAULT_STRETCHER_HEIGHT_CM: f64 = 12.0;

/// Where the cabinet is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinetKind {
    /// Wall-mounted (aerial) cabinet, no floor contact
    Wall,
    /// Floor-standing (ground) cabinet with stretchers and a full bottom
    Floor,
}

impl CabinetKind {
    /// Short name used in table headings ("wall cabinet 2")
    pub fn display_name(&self) -> &'static str {
        match self {
            CabinetKind::Wall => "wall",
            CabinetKind::Floor => "floor",
        }
    }

    /// Highest shelf count the form accepts for this kind
    pub fn max_shelves(&self) -> u32 {
        match self {
            CabinetKind::Wall => 20,
            CabinetKind::Floor => 1,
        }
    }
}

impl Default for CabinetKind {
    fn default() -> Self {
        CabinetKind::Wall
    }
}

/// Validated cabinet dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CabinetSpec {
    /// Wall or floor cabinet
    pub kind: CabinetKind,

    /// Outer width (cm), 30..=200
    pub width_cm: f64,

    /// Outer height (cm), 30..=300
    pub height_cm: f64,

    /// Outer depth (cm), 30..=100
    pub depth_cm: f64,

    /// Requested shelves: 0..=20 for wall, 0..=1 for floor cabinets
    pub shelf_count: u32,

    /// Number of stretcher strips, 0..=10
    #[serde(default)]
    pub stretcher_quantity: u32,

    /// Stretcher strip height (cm), 8..=20
    #[serde(default = "default_stretcher_height")]
    pub stretcher_height_cm: f64,
}

fn default_stretcher_height() -> f64 {
    DEFAULT_STRETCHER_HEIGHT_CM
}

impl CabinetSpec {
    /// Wall cabinet without stretchers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cutlist_core::cabinet::{CabinetKind, CabinetSpec};
    ///
    /// let spec = CabinetSpec::wall(80.0, 120.0, 55.0, 2);
    /// assert_eq!(spec.kind, CabinetKind::Wall);
    /// assert_eq!(spec.stretcher_quantity, 0);
    /// ```
    pub fn wall(width_cm: f64, height_cm: f64, depth_cm: f64, shelf_count: u32) -> Self {
        CabinetSpec {
            kind: CabinetKind::Wall,
            width_cm,
            height_cm,
            depth_cm,
            shelf_count,
            stretcher_quantity: 0,
            stretcher_height_cm: DEFAULT_STRETCHER_HEIGHT_CM,
        }
    }

    /// Floor cabinet without stretchers.
    pub fn floor(width_cm: f64, height_cm: f64, depth_cm: f64, shelf_count: u32) -> Self {
        CabinetSpec {
            kind: CabinetKind::Floor,
            ..CabinetSpec::wall(width_cm, height_cm, depth_cm, shelf_count)
        }
    }

    /// Set the stretcher count and strip height.
    pub fn with_stretchers(mut self, quantity: u32, height_cm: f64) -> Self {
        self.stretcher_quantity = quantity;
        self.stretcher_height_cm = height_cm;
        self
    }

    /// "W × H × D cm" caption used under cabinet headings
    pub fn dimensions_caption(&self) -> String {
        format!(
            "{} × {} × {} cm",
            self.width_cm, self.height_cm, self.depth_cm
        )
    }
}
