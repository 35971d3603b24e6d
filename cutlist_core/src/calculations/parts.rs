//! # Parts
//!
//! One row of the cutting list: a panel type, how many identical copies to
//! cut, and its finished size. After generation the presentation layer may
//! change the groove flag, the edge banding and the attachment note of an
//! existing row through [`PartEdit`]; size and quantity are fixed by the
//! calculator.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "description": "shelf 1",
//!   "quantity": 1,
//!   "width_cm": 53.0,
//!   "length_cm": 76.8,
//!   "has_groove": false,
//!   "edge_banding": "front_only",
//!   "attachment_note": ""
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{round_tenth, SquareCentimeters};

/// Which edges of a panel get PVC edge banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeBanding {
    None,
    FrontOnly,
    Both,
}

impl EdgeBanding {
    pub fn display_name(&self) -> &'static str {
        match self {
            EdgeBanding::None => "none",
            EdgeBanding::FrontOnly => "front only",
            EdgeBanding::Both => "both",
        }
    }
}

impl Default for EdgeBanding {
    fn default() -> Self {
        EdgeBanding::None
    }
}

/// A panel type in the cutting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Row label ("body", "shelf 2", "back panel", or free text)
    pub description: String,

    /// Number of identical copies, at least 1
    pub quantity: u32,

    /// Panel width (cm), rounded to one decimal
    pub width_cm: f64,

    /// Panel length (cm), rounded to one decimal
    pub length_cm: f64,

    /// A groove is routed into this panel
    #[serde(default)]
    pub has_groove: bool,

    /// Edge banding applied to this panel
    #[serde(default)]
    pub edge_banding: EdgeBanding,

    /// Free text, editable after generation
    #[serde(default)]
    pub attachment_note: String,
}

impl Part {
    /// Build a row with dimensions rounded to one decimal.
    pub fn new(description: impl Into<String>, quantity: u32, width_cm: f64, length_cm: f64) -> Self {
        Part {
            description: description.into(),
            quantity,
            width_cm: round_tenth(width_cm),
            length_cm: round_tenth(length_cm),
            has_groove: false,
            edge_banding: EdgeBanding::None,
            attachment_note: String::new(),
        }
    }

    /// Free-form row typed in by the user. Quantity is raised to at least 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cutlist_core::calculations::Part;
    ///
    /// let drawer_front = Part::custom("drawer front", 0, 19.94, 76.8);
    /// assert_eq!(drawer_front.quantity, 1);
    /// assert_eq!(drawer_front.width_cm, 19.9);
    /// ```
    pub fn custom(description: impl Into<String>, quantity: u32, width_cm: f64, length_cm: f64) -> Self {
        Part::new(description, quantity.max(1), width_cm, length_cm)
    }

    pub fn with_groove(mut self, has_groove: bool) -> Self {
        self.has_groove = has_groove;
        self
    }

    pub fn with_edge_banding(mut self, edge_banding: EdgeBanding) -> Self {
        self.edge_banding = edge_banding;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.attachment_note = note.into();
        self
    }

    /// Total surface of all copies: width × length × quantity
    pub fn area(&self) -> SquareCentimeters {
        SquareCentimeters(self.width_cm * self.length_cm * self.quantity as f64)
    }

    /// Apply an in-place edit from the table.
    pub fn apply(&mut self, edit: PartEdit) {
        match edit {
            PartEdit::Groove(value) => self.has_groove = value,
            PartEdit::EdgeBanding(value) => self.edge_banding = value,
            PartEdit::AttachmentNote(note) => self.attachment_note = note,
        }
    }
}

/// The edits the table allows on a generated row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PartEdit {
    Groove(bool),
    EdgeBanding(EdgeBanding),
    AttachmentNote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rounds_dimensions() {
        let part = Part::new("top-and-bottom", 2, 55.0, 80.0 - 3.2);
        assert_eq!(part.length_cm, 76.8);
        assert_eq!(part.width_cm, 55.0);
    }

    #[test]
    fn test_area() {
        let part = Part::new("body", 2, 55.0, 120.0);
        assert_eq!(part.area().0, 13_200.0);
    }

    #[test]
    fn test_edits_leave_dimensions_alone() {
        let mut part = Part::new("shelf 1", 1, 53.0, 76.8);
        let before = part.clone();

        part.apply(PartEdit::Groove(true));
        part.apply(PartEdit::EdgeBanding(EdgeBanding::Both));
        part.apply(PartEdit::AttachmentNote("hinge side".to_string()));

        assert!(part.has_groove);
        assert_eq!(part.edge_banding, EdgeBanding::Both);
        assert_eq!(part.attachment_note, "hinge side");
        assert_eq!(part.width_cm, before.width_cm);
        assert_eq!(part.length_cm, before.length_cm);
        assert_eq!(part.quantity, before.quantity);
    }

    #[test]
    fn test_part_edit_serialization() {
        let edit = PartEdit::EdgeBanding(EdgeBanding::FrontOnly);
        let json = serde_json::to_string(&edit).unwrap();
        assert_eq!(json, r#"{"field":"edge_banding","value":"front_only"}"#);
    }
}
