//! # Input Validation
//!
//! Gatekeeper between the form and the part calculator. The validator
//! takes the raw numbers as the form parsed them (unparseable text is
//! `NaN`), checks each field against its inclusive range, and reports:
//!
//! - a pass/fail flag per field, for field-level highlighting
//! - a single message for the FIRST failing field, in the fixed order
//!   width, height, depth, shelf count, stretcher quantity, stretcher height
//!
//! Validation never changes the input. Only a passing report can be turned
//! into a [`CabinetSpec`].
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::cabinet::CabinetKind;
//! use cutlist_core::validation::{validate, Field, RawCabinetInput};
//!
//! let raw = RawCabinetInput::from_form_text(CabinetKind::Wall, "250", "120", "abc", "2", "0", "12");
//! let report = validate(&raw);
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.first_failure(), Some(Field::Width));
//! assert!(!report.passed(Field::Depth));
//! assert!(report.passed(Field::Height));
//! ```

use serde::{Deserialize, Serialize};

use crate::cabinet::{CabinetKind, CabinetSpec};
use crate::errors::{CutlistError, CutlistResult};

/// Inclusive range for cabinet width (cm)
pub const WIDTH_RANGE_CM: (f64, f64) = (30.0, 200.0);
/// Inclusive range for cabinet height (cm)
pub const HEIGHT_RANGE_CM: (f64, f64) = (30.0, 300.0);
/// Inclusive range for cabinet depth (cm)
pub const DEPTH_RANGE_CM: (f64, f64) = (30.0, 100.0);
/// Inclusive range for stretcher quantity
pub const STRETCHER_QUANTITY_RANGE: (f64, f64) = (0.0, 10.0);
/// Inclusive range for stretcher height (cm)
pub const STRETCHER_HEIGHT_RANGE_CM: (f64, f64) = (8.0, 20.0);

/// Form fields, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Width,
    Height,
    Depth,
    ShelfCount,
    StretcherQuantity,
    StretcherHeight,
}

impl Field {
    /// All fields in the order they are checked
    pub const ORDER: [Field; 6] = [
        Field::Width,
        Field::Height,
        Field::Depth,
        Field::ShelfCount,
        Field::StretcherQuantity,
        Field::StretcherHeight,
    ];

    /// Stable field key (matches the `CabinetSpec` JSON naming)
    pub fn key(&self) -> &'static str {
        match self {
            Field::Width => "width_cm",
            Field::Height => "height_cm",
            Field::Depth => "depth_cm",
            Field::ShelfCount => "shelf_count",
            Field::StretcherQuantity => "stretcher_quantity",
            Field::StretcherHeight => "stretcher_height_cm",
        }
    }
}

/// Raw numbers read from the form. Any field may be `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCabinetInput {
    pub kind: CabinetKind,
    pub width_cm: f64,
    pub height_cm: f64,
    pub depth_cm: f64,
    pub shelf_count: f64,
    pub stretcher_quantity: f64,
    pub stretcher_height_cm: f64,
}

impl RawCabinetInput {
    /// Parse form text the way the form fields are read: decimal fields as
    /// floats, count fields as floats truncated toward zero. Anything that
    /// does not parse becomes `NaN`.
    pub fn from_form_text(
        kind: CabinetKind,
        width: &str,
        height: &str,
        depth: &str,
        shelf_count: &str,
        stretcher_quantity: &str,
        stretcher_height: &str,
    ) -> Self {
        RawCabinetInput {
            kind,
            width_cm: parse_decimal(width),
            height_cm: parse_decimal(height),
            depth_cm: parse_decimal(depth),
            shelf_count: parse_count(shelf_count),
            stretcher_quantity: parse_count(stretcher_quantity),
            stretcher_height_cm: parse_decimal(stretcher_height),
        }
    }

    fn value(&self, field: Field) -> f64 {
        match field {
            Field::Width => self.width_cm,
            Field::Height => self.height_cm,
            Field::Depth => self.depth_cm,
            Field::ShelfCount => self.shelf_count,
            Field::StretcherQuantity => self.stretcher_quantity,
            Field::StretcherHeight => self.stretcher_height_cm,
        }
    }
}

impl From<&CabinetSpec> for RawCabinetInput {
    fn from(spec: &CabinetSpec) -> Self {
        RawCabinetInput {
            kind: spec.kind,
            width_cm: spec.width_cm,
            height_cm: spec.height_cm,
            depth_cm: spec.depth_cm,
            shelf_count: spec.shelf_count as f64,
            stretcher_quantity: spec.stretcher_quantity as f64,
            stretcher_height_cm: spec.stretcher_height_cm,
        }
    }
}

/// Parse a decimal field; `NaN` when the text is not a number.
pub fn parse_decimal(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a count field; fractional input is truncated toward zero.
pub fn parse_count(text: &str) -> f64 {
    parse_decimal(text).trunc()
}

/// Outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: Field,
    pub passed: bool,
    /// User-facing message, present only when the check failed
    pub message: Option<String>,
}

/// Per-field results plus the message for the first failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub input: RawCabinetInput,
    /// One entry per field, in check order
    pub checks: Vec<FieldCheck>,
    /// Message of the first failing field, if any
    pub message: Option<String>,
}

impl ValidationReport {
    /// True when every field passed
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Whether a single field passed (drives highlighting)
    pub fn passed(&self, field: Field) -> bool {
        self.checks
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.passed)
            .unwrap_or(false)
    }

    /// First failing field in check order
    pub fn first_failure(&self) -> Option<Field> {
        self.checks.iter().find(|c| !c.passed).map(|c| c.field)
    }

    /// Fields that failed, in check order
    pub fn failed_fields(&self) -> Vec<Field> {
        self.checks.iter().filter(|c| !c.passed).map(|c| c.field).collect()
    }

    /// Convert a passing report into a `CabinetSpec`.
    ///
    /// # Returns
    ///
    /// * `Ok(CabinetSpec)` - every field passed
    /// * `Err(CutlistError::InvalidInput)` - describing the first failing field
    pub fn into_spec(self) -> CutlistResult<CabinetSpec> {
        if let Some(failed) = self.checks.iter().find(|c| !c.passed) {
            return Err(CutlistError::invalid_input(
                failed.field.key(),
                self.input.value(failed.field).to_string(),
                failed.message.clone().unwrap_or_default(),
            ));
        }

        let raw = self.input;
        Ok(CabinetSpec {
            kind: raw.kind,
            width_cm: raw.width_cm,
            height_cm: raw.height_cm,
            depth_cm: raw.depth_cm,
            shelf_count: raw.shelf_count as u32,
            stretcher_quantity: raw.stretcher_quantity as u32,
            stretcher_height_cm: raw.stretcher_height_cm,
        })
    }
}

/// Check every field of the raw input.
pub fn validate(input: &RawCabinetInput) -> ValidationReport {
    let checks: Vec<FieldCheck> = Field::ORDER
        .iter()
        .map(|&field| {
            let message = check_field(input, field);
            FieldCheck {
                field,
                passed: message.is_none(),
                message,
            }
        })
        .collect();

    let message = checks.iter().find_map(|c| c.message.clone());
    if let Some(msg) = &message {
        tracing::debug!(kind = ?input.kind, "cabinet input rejected: {}", msg);
    }

    ValidationReport {
        input: *input,
        checks,
        message,
    }
}

/// Validate and convert in one step.
pub fn validate_spec(input: &RawCabinetInput) -> CutlistResult<CabinetSpec> {
    validate(input).into_spec()
}

/// `None` when the field passes, otherwise the user-facing message.
fn check_field(input: &RawCabinetInput, field: Field) -> Option<String> {
    let value = input.value(field);
    let (passed, message) = match field {
        Field::Width => (
            in_range(value, WIDTH_RANGE_CM),
            "Cabinet width must be between 30 and 200 cm",
        ),
        Field::Height => (
            in_range(value, HEIGHT_RANGE_CM),
            "Cabinet height must be between 30 and 300 cm",
        ),
        Field::Depth => (
            in_range(value, DEPTH_RANGE_CM),
            "Cabinet depth must be between 30 and 100 cm",
        ),
        Field::ShelfCount => {
            let max = input.kind.max_shelves() as f64;
            let message = match input.kind {
                CabinetKind::Wall => "Shelf count must be between 0 and 20",
                CabinetKind::Floor => "Floor cabinets take 0 or 1 shelf",
            };
            (is_whole(value) && in_range(value, (0.0, max)), message)
        }
        Field::StretcherQuantity => (
            is_whole(value) && in_range(value, STRETCHER_QUANTITY_RANGE),
            "Stretcher quantity must be between 0 and 10",
        ),
        Field::StretcherHeight => (
            in_range(value, STRETCHER_HEIGHT_RANGE_CM),
            "Stretcher height must be between 8 and 20 cm",
        ),
    };

    (!passed).then(|| message.to_string())
}

/// NaN compares false against both bounds, so it never passes.
fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_input() -> RawCabinetInput {
        RawCabinetInput::from(&CabinetSpec::wall(80.0, 120.0, 55.0, 2))
    }

    #[test]
    fn test_valid_input_passes() {
        let report = validate(&wall_input());
        assert!(report.is_valid());
        assert!(report.message.is_none());
        let spec = report.into_spec().unwrap();
        assert_eq!(spec, CabinetSpec::wall(80.0, 120.0, 55.0, 2));
    }

    #[test]
    fn test_width_boundaries() {
        for (width, ok) in [(30.0, true), (200.0, true), (29.999, false), (200.001, false)] {
            let raw = RawCabinetInput { width_cm: width, ..wall_input() };
            assert_eq!(validate(&raw).passed(Field::Width), ok, "width {}", width);
        }
    }

    #[test]
    fn test_height_and_depth_boundaries() {
        for (height, ok) in [(30.0, true), (300.0, true), (29.999, false), (300.001, false)] {
            let raw = RawCabinetInput { height_cm: height, ..wall_input() };
            assert_eq!(validate(&raw).passed(Field::Height), ok, "height {}", height);
        }
        for (depth, ok) in [(30.0, true), (100.0, true), (29.999, false), (100.001, false)] {
            let raw = RawCabinetInput { depth_cm: depth, ..wall_input() };
            assert_eq!(validate(&raw).passed(Field::Depth), ok, "depth {}", depth);
        }
    }

    #[test]
    fn test_shelf_count_ranges_per_kind() {
        for (shelves, ok) in [(0.0, true), (20.0, true), (21.0, false), (-1.0, false), (2.5, false)] {
            let raw = RawCabinetInput { shelf_count: shelves, ..wall_input() };
            assert_eq!(validate(&raw).passed(Field::ShelfCount), ok, "wall shelves {}", shelves);
        }

        let floor = RawCabinetInput { kind: CabinetKind::Floor, ..wall_input() };
        for (shelves, ok) in [(0.0, true), (1.0, true), (2.0, false)] {
            let raw = RawCabinetInput { shelf_count: shelves, ..floor };
            assert_eq!(validate(&raw).passed(Field::ShelfCount), ok, "floor shelves {}", shelves);
        }
    }

    #[test]
    fn test_stretcher_ranges() {
        let raw = RawCabinetInput { stretcher_quantity: 11.0, ..wall_input() };
        assert_eq!(validate(&raw).first_failure(), Some(Field::StretcherQuantity));

        let raw = RawCabinetInput { stretcher_height_cm: 7.9, ..wall_input() };
        assert_eq!(validate(&raw).first_failure(), Some(Field::StretcherHeight));

        let raw = RawCabinetInput { stretcher_height_cm: 20.0, stretcher_quantity: 10.0, ..wall_input() };
        assert!(validate(&raw).is_valid());

        for (height, ok) in [(8.0, true), (20.0, true), (7.999, false), (20.001, false)] {
            let raw = RawCabinetInput { stretcher_height_cm: height, ..wall_input() };
            assert_eq!(validate(&raw).is_valid(), ok, "stretcher height {}", height);
        }

        for (quantity, ok) in [(0.0, true), (10.0, true), (11.0, false)] {
            let raw = RawCabinetInput { stretcher_quantity: quantity, ..wall_input() };
            let report = validate(&raw);
            assert_eq!(report.is_valid(), ok, "stretcher quantity {}", quantity);
            assert_eq!(report.passed(Field::StretcherQuantity), ok);
        }
    }

    #[test]
    fn test_nan_fails() {
        let raw = RawCabinetInput::from_form_text(CabinetKind::Wall, "", "120", "55", "x", "0", "12");
        let report = validate(&raw);
        assert_eq!(report.failed_fields(), vec![Field::Width, Field::ShelfCount]);
    }

    #[test]
    fn test_message_is_first_failing_field() {
        let raw = RawCabinetInput { width_cm: 10.0, depth_cm: 500.0, ..wall_input() };
        let report = validate(&raw);
        assert_eq!(
            report.message.as_deref(),
            Some("Cabinet width must be between 30 and 200 cm")
        );
        assert!(!report.passed(Field::Depth));

        let err = report.into_spec().unwrap_err();
        match err {
            CutlistError::InvalidInput { field, .. } => assert_eq!(field, "width_cm"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let raw = RawCabinetInput { width_cm: 500.0, ..wall_input() };
        let before = raw;
        let report = validate(&raw);
        assert_eq!(report.input, before);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_count_parsing_truncates() {
        assert_eq!(parse_count("2.7"), 2.0);
        assert!(parse_count("two").is_nan());
        assert_eq!(parse_decimal(" 77.1 "), 77.1);
    }
}
