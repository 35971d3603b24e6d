//! # Formula Tables
//!
//! The part calculator is driven by a table: for each cabinet kind, an
//! ordered list of rules, each producing zero or more rows. The order of
//! the rules is the row order of the cutting list.
//!
//! Two tables are built in:
//!
//! - [`FormulaVersion::Current`] - body, top/bottom (or bottom), shelves,
//!   stretchers and a back panel, with groove and edge-banding flags.
//!   This is the default and the reference for new cabinets.
//! - [`FormulaVersion::Legacy`] - the first version of the calculator:
//!   no back panel, a fixed stretcher pair on floor cabinets, and no
//!   groove or edge-banding flags.
//!
//! The back-panel height offsets differ between kinds (1.6 cm on wall
//! cabinets, 0.9 cm on floor cabinets). They are kept exactly as the
//! workshop uses them.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::calculations::formulas::{FormulaTable, FormulaVersion};
//! use cutlist_core::cabinet::CabinetKind;
//!
//! let table = FormulaTable::for_version(FormulaVersion::Current);
//! assert_eq!(table.board_thickness.0, 1.6);
//! assert_eq!(table.rules_for(CabinetKind::Wall).len(), 5);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cabinet::{CabinetKind, CabinetSpec};
use crate::calculations::parts::{EdgeBanding, Part};
use crate::units::Centimeters;

/// Board (carcass panel) thickness
pub const BOARD_THICKNESS_CM: f64 = 1.6;

/// Shelves are this much shallower than the cabinet
pub const SHELF_DEPTH_REDUCTION_CM: f64 = 2.0;

/// Back panel is this much shorter than a wall cabinet
pub const WALL_BACK_PANEL_OFFSET_CM: f64 = 1.6;

/// Back panel is this much shorter than a floor cabinet
pub const FLOOR_BACK_PANEL_OFFSET_CM: f64 = 0.9;

/// Note attached to every back panel row
pub const BACK_PANEL_NOTE: &str = "3mm nominal thickness";

/// Stretcher strip width in the legacy floor cabinet table
pub const LEGACY_STRETCHER_WIDTH_CM: f64 = 12.0;

/// Stretcher count in the legacy floor cabinet table
pub const LEGACY_STRETCHER_QUANTITY: u32 = 2;

static CURRENT: Lazy<FormulaTable> = Lazy::new(FormulaTable::current_table);
static LEGACY: Lazy<FormulaTable> = Lazy::new(FormulaTable::legacy_table);

/// Which built-in table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaVersion {
    Legacy,
    Current,
}

impl Default for FormulaVersion {
    fn default() -> Self {
        FormulaVersion::Current
    }
}

/// The row a rule produces.
///
/// In the formulas below `W`, `H`, `D` are the cabinet width, height and
/// depth, `t` is the board thickness and `r` the shelf depth reduction.
/// Every produced row lists `(panel width, panel length)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// "body": 2 × (D, H − height_offset)
    Body { height_offset: Centimeters },
    /// "top-and-bottom": 2 × (D, W − 2t)
    TopAndBottom,
    /// "bottom": 1 × (D, W)
    Bottom,
    /// One row per requested shelf, at most `max_rows`: (D − r, W − 2t).
    /// Numbered rows read "shelf N", otherwise "shelf".
    Shelves { max_rows: Option<u32>, numbered: bool },
    /// "stretcher": stretcher_quantity × (W − 2t, stretcher height), only
    /// when the spec asks for stretchers
    Stretchers,
    /// "stretcher": a fixed count of (width, W − 2t) strips, whatever the spec says
    FixedStretchers { quantity: u32, width: Centimeters },
    /// "back panel": 1 × (W − t, H − height_offset)
    BackPanel { height_offset: Centimeters },
}

/// A rule plus the flags it stamps on its rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartRule {
    pub kind: RuleKind,
    pub has_groove: bool,
    pub edge_banding: EdgeBanding,
}

impl PartRule {
    pub const fn new(kind: RuleKind, has_groove: bool, edge_banding: EdgeBanding) -> Self {
        PartRule {
            kind,
            has_groove,
            edge_banding,
        }
    }

    /// A rule with no groove and no edge banding
    pub const fn plain(kind: RuleKind) -> Self {
        PartRule::new(kind, false, EdgeBanding::None)
    }
}

/// Named constants plus the ordered rules for each cabinet kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaTable {
    pub version: FormulaVersion,
    pub board_thickness: Centimeters,
    pub shelf_depth_reduction: Centimeters,
    pub back_panel_note: String,
    pub wall: Vec<PartRule>,
    pub floor: Vec<PartRule>,
}

impl FormulaTable {
    /// Shared instance of a built-in table
    pub fn for_version(version: FormulaVersion) -> &'static FormulaTable {
        match version {
            FormulaVersion::Current => &*CURRENT,
            FormulaVersion::Legacy => &*LEGACY,
        }
    }

    /// Shared instance of the current table
    pub fn current() -> &'static FormulaTable {
        &*CURRENT
    }

    /// Rules for one kind, in row order
    pub fn rules_for(&self, kind: CabinetKind) -> &[PartRule] {
        match kind {
            CabinetKind::Wall => &self.wall,
            CabinetKind::Floor => &self.floor,
        }
    }

    fn current_table() -> Self {
        FormulaTable {
            version: FormulaVersion::Current,
            board_thickness: Centimeters(BOARD_THICKNESS_CM),
            shelf_depth_reduction: Centimeters(SHELF_DEPTH_REDUCTION_CM),
            back_panel_note: BACK_PANEL_NOTE.to_string(),
            wall: vec![
                PartRule::new(
                    RuleKind::Body { height_offset: Centimeters(0.0) },
                    true,
                    EdgeBanding::Both,
                ),
                PartRule::new(RuleKind::TopAndBottom, false, EdgeBanding::Both),
                PartRule::new(
                    RuleKind::Shelves { max_rows: None, numbered: true },
                    false,
                    EdgeBanding::FrontOnly,
                ),
                PartRule::new(RuleKind::Stretchers, false, EdgeBanding::Both),
                PartRule::plain(RuleKind::BackPanel {
                    height_offset: Centimeters(WALL_BACK_PANEL_OFFSET_CM),
                }),
            ],
            floor: vec![
                PartRule::new(
                    RuleKind::Body { height_offset: Centimeters(BOARD_THICKNESS_CM) },
                    true,
                    EdgeBanding::Both,
                ),
                PartRule::new(RuleKind::Bottom, false, EdgeBanding::Both),
                PartRule::new(RuleKind::Stretchers, false, EdgeBanding::Both),
                PartRule::new(
                    RuleKind::Shelves { max_rows: Some(1), numbered: false },
                    false,
                    EdgeBanding::FrontOnly,
                ),
                PartRule::plain(RuleKind::BackPanel {
                    height_offset: Centimeters(FLOOR_BACK_PANEL_OFFSET_CM),
                }),
            ],
        }
    }

    fn legacy_table() -> Self {
        FormulaTable {
            version: FormulaVersion::Legacy,
            board_thickness: Centimeters(BOARD_THICKNESS_CM),
            shelf_depth_reduction: Centimeters(SHELF_DEPTH_REDUCTION_CM),
            back_panel_note: String::new(),
            wall: vec![
                PartRule::plain(RuleKind::Body { height_offset: Centimeters(0.0) }),
                PartRule::plain(RuleKind::TopAndBottom),
                PartRule::plain(RuleKind::Shelves { max_rows: None, numbered: true }),
            ],
            floor: vec![
                PartRule::plain(RuleKind::Body {
                    height_offset: Centimeters(BOARD_THICKNESS_CM),
                }),
                PartRule::plain(RuleKind::Bottom),
                PartRule::plain(RuleKind::FixedStretchers {
                    quantity: LEGACY_STRETCHER_QUANTITY,
                    width: Centimeters(LEGACY_STRETCHER_WIDTH_CM),
                }),
                PartRule::plain(RuleKind::Shelves { max_rows: Some(1), numbered: false }),
            ],
        }
    }

    /// Append the rows one rule produces for `spec`.
    pub(crate) fn emit(&self, rule: &PartRule, spec: &CabinetSpec, out: &mut Vec<Part>) {
        let t = self.board_thickness;
        let width = Centimeters(spec.width_cm);
        let height = Centimeters(spec.height_cm);
        let depth = Centimeters(spec.depth_cm);
        let inner_width = (width - t * 2.0).value();
        let stamp = |part: Part| {
            part.with_groove(rule.has_groove)
                .with_edge_banding(rule.edge_banding)
        };

        match rule.kind {
            RuleKind::Body { height_offset } => {
                out.push(stamp(Part::new(
                    "body",
                    2,
                    depth.value(),
                    (height - height_offset).value(),
                )));
            }
            RuleKind::TopAndBottom => {
                out.push(stamp(Part::new("top-and-bottom", 2, depth.value(), inner_width)));
            }
            RuleKind::Bottom => {
                out.push(stamp(Part::new("bottom", 1, depth.value(), width.value())));
            }
            RuleKind::Shelves { max_rows, numbered } => {
                let rows = max_rows.map_or(spec.shelf_count, |max| spec.shelf_count.min(max));
                let shelf_width = (depth - self.shelf_depth_reduction).value();
                for i in 1..=rows {
                    let label = if numbered {
                        format!("shelf {}", i)
                    } else {
                        "shelf".to_string()
                    };
                    out.push(stamp(Part::new(label, 1, shelf_width, inner_width)));
                }
            }
            RuleKind::Stretchers => {
                if spec.stretcher_quantity > 0 {
                    out.push(stamp(Part::new(
                        "stretcher",
                        spec.stretcher_quantity,
                        inner_width,
                        spec.stretcher_height_cm,
                    )));
                }
            }
            RuleKind::FixedStretchers { quantity, width: strip_width } => {
                out.push(stamp(Part::new("stretcher", quantity, strip_width.value(), inner_width)));
            }
            RuleKind::BackPanel { height_offset } => {
                out.push(
                    stamp(Part::new(
                        "back panel",
                        1,
                        (width - t).value(),
                        (height - height_offset).value(),
                    ))
                    .with_note(self.back_panel_note.clone()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_shared() {
        let a = FormulaTable::for_version(FormulaVersion::Current);
        let b = FormulaTable::current();
        assert!(std::ptr::eq(a, b));
        assert_eq!(FormulaTable::for_version(FormulaVersion::Legacy).version, FormulaVersion::Legacy);
    }

    #[test]
    fn test_current_constants() {
        let table = FormulaTable::current();
        assert_eq!(table.board_thickness.0, BOARD_THICKNESS_CM);
        assert_eq!(table.back_panel_note, BACK_PANEL_NOTE);
        assert_eq!(
            table.wall.last().map(|r| r.kind),
            Some(RuleKind::BackPanel { height_offset: Centimeters(1.6) })
        );
        assert_eq!(
            table.floor.last().map(|r| r.kind),
            Some(RuleKind::BackPanel { height_offset: Centimeters(0.9) })
        );
    }

    #[test]
    fn test_shelf_rule_caps_rows() {
        let table = FormulaTable::current();
        let spec = CabinetSpec::floor(60.0, 80.0, 55.0, 3);
        let rule = PartRule::plain(RuleKind::Shelves { max_rows: Some(1), numbered: false });
        let mut out = Vec::new();
        table.emit(&rule, &spec, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, "shelf");
    }

    #[test]
    fn test_version_serialization() {
        assert_eq!(serde_json::to_string(&FormulaVersion::Legacy).unwrap(), "\"legacy\"");
        assert_eq!(FormulaVersion::default(), FormulaVersion::Current);
    }
}
