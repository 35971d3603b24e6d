//! # Part Calculation
//!
//! Maps a validated [`CabinetSpec`] to the ordered cutting list for that
//! cabinet. The calculation is pure:
//!
//! - the spec is borrowed and never changed
//! - the same spec always yields the same rows in the same order
//! - ids and timestamps are added by the caller when it wraps the rows in
//!   a [`Cabinet`](crate::project::Cabinet)
//!
//! There is no error path. The spec must already have passed
//! [`crate::validation`]; calling this with an unchecked spec is a caller bug.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::cabinet::CabinetSpec;
//! use cutlist_core::calculations::calculate;
//!
//! let parts = calculate(&CabinetSpec::wall(80.0, 120.0, 55.0, 2));
//!
//! let rows: Vec<_> = parts
//!     .iter()
//!     .map(|p| (p.description.as_str(), p.quantity, p.width_cm, p.length_cm))
//!     .collect();
//!
//! assert_eq!(rows, vec![
//!     ("body", 2, 55.0, 120.0),
//!     ("top-and-bottom", 2, 55.0, 76.8),
//!     ("shelf 1", 1, 53.0, 76.8),
//!     ("shelf 2", 1, 53.0, 76.8),
//!     ("back panel", 1, 78.4, 118.4),
//! ]);
//! ```

pub mod formulas;
pub mod parts;

pub use formulas::{FormulaTable, FormulaVersion, PartRule, RuleKind};
pub use parts::{EdgeBanding, Part, PartEdit};

use crate::cabinet::CabinetSpec;

/// Calculate the cutting list with the current formula table.
pub fn calculate(spec: &CabinetSpec) -> Vec<Part> {
    calculate_with(spec, FormulaTable::current())
}

/// Calculate the cutting list with a specific formula table.
pub fn calculate_with(spec: &CabinetSpec, table: &FormulaTable) -> Vec<Part> {
    let mut parts = Vec::new();
    for rule in table.rules_for(spec.kind) {
        table.emit(rule, spec, &mut parts);
    }

    tracing::debug!(
        kind = spec.kind.display_name(),
        version = ?table.version,
        rows = parts.len(),
        "calculated cutting list"
    );
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabinet::CabinetKind;
    use pretty_assertions::assert_eq;

    fn summary(parts: &[Part]) -> Vec<(String, u32, f64, f64)> {
        parts
            .iter()
            .map(|p| (p.description.clone(), p.quantity, p.width_cm, p.length_cm))
            .collect()
    }

    #[test]
    fn test_wall_cabinet_example() {
        let parts = calculate(&CabinetSpec::wall(80.0, 120.0, 55.0, 2));
        assert_eq!(
            summary(&parts),
            vec![
                ("body".to_string(), 2, 55.0, 120.0),
                ("top-and-bottom".to_string(), 2, 55.0, 76.8),
                ("shelf 1".to_string(), 1, 53.0, 76.8),
                ("shelf 2".to_string(), 1, 53.0, 76.8),
                ("back panel".to_string(), 1, 78.4, 118.4),
            ]
        );

        assert!(parts[0].has_groove);
        assert_eq!(parts[0].edge_banding, EdgeBanding::Both);
        assert!(!parts[1].has_groove);
        assert_eq!(parts[1].edge_banding, EdgeBanding::Both);
        assert_eq!(parts[2].edge_banding, EdgeBanding::FrontOnly);
        assert_eq!(parts[4].edge_banding, EdgeBanding::None);
        assert_eq!(parts[4].attachment_note, "3mm nominal thickness");
    }

    #[test]
    fn test_floor_cabinet_example() {
        let spec = CabinetSpec::floor(49.0, 77.1, 55.0, 1).with_stretchers(2, 12.0);
        let parts = calculate(&spec);
        assert_eq!(
            summary(&parts),
            vec![
                ("body".to_string(), 2, 55.0, 75.5),
                ("bottom".to_string(), 1, 55.0, 49.0),
                ("stretcher".to_string(), 2, 45.8, 12.0),
                ("shelf".to_string(), 1, 53.0, 45.8),
                ("back panel".to_string(), 1, 47.4, 76.2),
            ]
        );
        assert!(parts[0].has_groove);
        assert_eq!(parts[3].edge_banding, EdgeBanding::FrontOnly);
    }

    #[test]
    fn test_wall_row_counts() {
        for shelves in [0, 1, 5, 20] {
            let spec = CabinetSpec::wall(100.0, 200.0, 40.0, shelves);
            assert_eq!(calculate(&spec).len(), 3 + shelves as usize);

            let parts = calculate(&spec.with_stretchers(3, 10.0));
            assert_eq!(parts.len(), 4 + shelves as usize);
            assert_eq!(parts[0].description, "body");
            assert_eq!(parts[1].description, "top-and-bottom");
        }
    }

    #[test]
    fn test_floor_shelf_row_iff_requested() {
        let without = calculate(&CabinetSpec::floor(60.0, 80.0, 55.0, 0));
        assert!(without.iter().all(|p| p.description != "shelf"));

        let with = calculate(&CabinetSpec::floor(60.0, 80.0, 55.0, 1));
        assert_eq!(with.iter().filter(|p| p.description == "shelf").count(), 1);

        // Out-of-range counts never produce more than one shelf row
        let many = calculate(&CabinetSpec::floor(60.0, 80.0, 55.0, 4));
        assert_eq!(many.iter().filter(|p| p.description.starts_with("shelf")).count(), 1);
    }

    #[test]
    fn test_idempotent() {
        let spec = CabinetSpec::floor(49.0, 77.1, 55.0, 1).with_stretchers(2, 12.0);
        let before = spec;
        let first = calculate(&spec);
        let second = calculate(&spec);
        assert_eq!(first, second);
        assert_eq!(spec, before);
    }

    #[test]
    fn test_legacy_table() {
        let table = FormulaTable::for_version(FormulaVersion::Legacy);

        let wall = calculate_with(&CabinetSpec::wall(80.0, 120.0, 55.0, 1), table);
        assert_eq!(
            summary(&wall),
            vec![
                ("body".to_string(), 2, 55.0, 120.0),
                ("top-and-bottom".to_string(), 2, 55.0, 76.8),
                ("shelf 1".to_string(), 1, 53.0, 76.8),
            ]
        );
        assert!(wall.iter().all(|p| !p.has_groove && p.edge_banding == EdgeBanding::None));

        let floor = calculate_with(&CabinetSpec::floor(49.0, 77.1, 55.0, 1), table);
        assert_eq!(
            summary(&floor),
            vec![
                ("body".to_string(), 2, 55.0, 75.5),
                ("bottom".to_string(), 1, 55.0, 49.0),
                ("stretcher".to_string(), 2, 12.0, 45.8),
                ("shelf".to_string(), 1, 53.0, 45.8),
            ]
        );
    }

    #[test]
    fn test_kind_drives_rules() {
        let spec = CabinetSpec::wall(80.0, 120.0, 55.0, 0);
        let floor = CabinetSpec { kind: CabinetKind::Floor, ..spec };
        assert_ne!(calculate(&spec), calculate(&floor));
    }
}
