//! # Session State
//!
//! Everything the running application knows, in one value owned by the
//! top-level controller: the form, the cabinet table, free-form rows, the
//! theme, and whether an export is running. There is no global state.
//!
//! All changes go through [`update`], which takes the session by value and
//! hands it back together with an [`Outcome`]. A rejected action returns
//! the session exactly as it came in.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::session::{update, Action, Outcome, Session};
//! use cutlist_core::validation::Field;
//!
//! let session = Session::default();
//!
//! // The default form is a valid 80 × 120 × 55 wall cabinet with 2 shelves
//! let (session, outcome) = update(session, Action::AddCabinet);
//! assert!(matches!(outcome, Outcome::CabinetAdded(_)));
//! assert_eq!(session.totals().part_count, 7);
//!
//! // Out-of-range input is reported, not calculated
//! let (session, _) = update(session, Action::EditForm(Field::Width, "250".into()));
//! let (session, outcome) = update(session, Action::AddCabinet);
//! match outcome {
//!     Outcome::Invalid(report) => assert!(!report.passed(Field::Width)),
//!     other => panic!("expected a validation failure, got {:?}", other),
//! }
//! assert_eq!(session.cabinets.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, Totals};
use crate::cabinet::{CabinetKind, CabinetSpec, DEFAULT_STRETCHER_HEIGHT_CM};
use crate::calculations::{FormulaVersion, Part, PartEdit};
use crate::errors::{CutlistError, CutlistResult};
use crate::project::{today, Cabinet, CabinetMetadata, Preferences, Project, Theme};
use crate::validation::{parse_count, validate, Field, RawCabinetInput, ValidationReport};

/// Form fields are the validated dimension fields
pub use crate::validation::Field as FormField;

// ============================================================================
// Form
// ============================================================================

/// Text of the input form, exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub kind: CabinetKind,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub shelf_count: String,
    pub stretcher_quantity: String,
    pub stretcher_height: String,
    pub craftsman: String,
    pub client: String,
    pub date: String,
}

impl Default for FormState {
    /// An 80 × 120 × 55 cm wall cabinet with two shelves, dated today.
    fn default() -> Self {
        FormState {
            kind: CabinetKind::Wall,
            width: "80".to_string(),
            height: "120".to_string(),
            depth: "55".to_string(),
            shelf_count: "2".to_string(),
            stretcher_quantity: "0".to_string(),
            stretcher_height: DEFAULT_STRETCHER_HEIGHT_CM.to_string(),
            craftsman: String::new(),
            client: String::new(),
            date: today(),
        }
    }
}

impl FormState {
    /// Parse the dimension fields.
    pub fn raw_input(&self) -> RawCabinetInput {
        RawCabinetInput::from_form_text(
            self.kind,
            &self.width,
            &self.height,
            &self.depth,
            &self.shelf_count,
            &self.stretcher_quantity,
            &self.stretcher_height,
        )
    }

    /// Text of one dimension field
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Width => &self.width,
            Field::Height => &self.height,
            Field::Depth => &self.depth,
            Field::ShelfCount => &self.shelf_count,
            Field::StretcherQuantity => &self.stretcher_quantity,
            Field::StretcherHeight => &self.stretcher_height,
        }
    }

    fn set(&mut self, field: Field, text: String) {
        match field {
            Field::Width => self.width = text,
            Field::Height => self.height = text,
            Field::Depth => self.depth = text,
            Field::ShelfCount => self.shelf_count = text,
            Field::StretcherQuantity => self.stretcher_quantity = text,
            Field::StretcherHeight => self.stretcher_height = text,
        }
    }

    /// Switching to a floor cabinet clamps the shelf count to 1.
    fn set_kind(&mut self, kind: CabinetKind) {
        self.kind = kind;
        let max = kind.max_shelves() as f64;
        if parse_count(&self.shelf_count) > max {
            self.shelf_count = kind.max_shelves().to_string();
        }
    }

    /// Fill the dimension fields from a saved spec.
    fn populate_from(&mut self, spec: &CabinetSpec) {
        self.kind = spec.kind;
        self.width = spec.width_cm.to_string();
        self.height = spec.height_cm.to_string();
        self.depth = spec.depth_cm.to_string();
        self.shelf_count = spec.shelf_count.to_string();
        self.stretcher_quantity = spec.stretcher_quantity.to_string();
        self.stretcher_height = spec.stretcher_height_cm.to_string();
    }
}

// ============================================================================
// Session
// ============================================================================

/// Application state for one running instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub form: FormState,
    /// Calculated cabinets, in the order they were added
    pub cabinets: Vec<Cabinet>,
    /// Free-form rows typed in by the user
    pub extra_rows: Vec<Part>,
    pub theme: Theme,
    pub sidebar_open: bool,
    /// Formula table used for new cabinets
    pub formula_version: FormulaVersion,
    /// Set while a document export runs; the export control stays disabled
    pub export_in_flight: bool,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Preferences::default())
    }
}

impl Session {
    /// Fresh session with stored preferences applied.
    pub fn new(preferences: Preferences) -> Self {
        Session {
            form: FormState::default(),
            cabinets: Vec::new(),
            extra_rows: Vec::new(),
            theme: preferences.theme,
            sidebar_open: false,
            formula_version: preferences.formula_version,
            export_in_flight: false,
        }
    }

    /// Preferences to persist
    pub fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.theme,
            formula_version: self.formula_version,
        }
    }

    /// True when there is nothing in the table
    pub fn is_empty(&self) -> bool {
        self.cabinets.is_empty() && self.extra_rows.is_empty()
    }

    /// Totals over the live table
    pub fn totals(&self) -> Totals {
        aggregate(&self.cabinets, &self.extra_rows)
    }

    /// Metadata for a new cabinet or project, from the form
    pub fn form_metadata(&self) -> CabinetMetadata {
        CabinetMetadata::new(
            self.form.craftsman.clone(),
            self.form.client.clone(),
            self.form.date.clone(),
        )
    }

    pub fn cabinet(&self, id: Uuid) -> Option<&Cabinet> {
        self.cabinets.iter().find(|c| c.id == id)
    }

    /// Apply one action. Checks run before any field is touched, so an
    /// `Err` leaves the session unchanged.
    fn apply(&mut self, action: Action) -> CutlistResult<Outcome> {
        match action {
            Action::EditForm(field, text) => self.form.set(field, text),
            Action::SetKind(kind) => self.form.set_kind(kind),
            Action::SetMetadata {
                craftsman,
                client,
                date,
            } => {
                self.form.craftsman = craftsman;
                self.form.client = client;
                self.form.date = date;
            }
            Action::ResetForm => self.form = FormState::default(),
            Action::AddCabinet => {
                let report = validate(&self.form.raw_input());
                if !report.is_valid() {
                    return Ok(Outcome::Invalid(report));
                }
                let spec = report.into_spec()?;
                let cabinet = Cabinet::calculate_with(spec, self.formula_version, self.form_metadata());
                let id = cabinet.id;
                self.cabinets.push(cabinet);
                return Ok(Outcome::CabinetAdded(id));
            }
            Action::RemoveCabinet(id) => {
                let index = self
                    .cabinets
                    .iter()
                    .position(|c| c.id == id)
                    .ok_or_else(|| CutlistError::cabinet_not_found(id))?;
                self.cabinets.remove(index);
            }
            Action::ClearTable => {
                if self.is_empty() {
                    return Err(CutlistError::EmptyTable);
                }
                self.cabinets.clear();
                self.extra_rows.clear();
            }
            Action::EditPart {
                cabinet_id,
                index,
                edit,
            } => {
                let cabinet = self
                    .cabinets
                    .iter_mut()
                    .find(|c| c.id == cabinet_id)
                    .ok_or_else(|| CutlistError::cabinet_not_found(cabinet_id))?;
                cabinet.edit_part(index, edit)?;
            }
            Action::AddCustomRow(part) => self.extra_rows.push(part),
            Action::EditCustomRow { index, edit } => {
                let part = self
                    .extra_rows
                    .get_mut(index)
                    .ok_or_else(|| CutlistError::part_not_found("custom rows", index))?;
                part.apply(edit);
            }
            Action::RemoveCustomRow(index) => {
                if index >= self.extra_rows.len() {
                    return Err(CutlistError::part_not_found("custom rows", index));
                }
                self.extra_rows.remove(index);
            }
            Action::LoadProject(project) => self.load_project(&project),
            Action::ToggleTheme => self.theme = self.theme.toggled(),
            Action::SetSidebar(open) => self.sidebar_open = open,
            Action::SetFormulaVersion(version) => self.formula_version = version,
            Action::BeginExport => {
                if self.export_in_flight {
                    return Err(CutlistError::ExportInProgress);
                }
                self.export_in_flight = true;
            }
            Action::FinishExport => self.export_in_flight = false,
        }
        Ok(Outcome::Updated)
    }

    /// Replace the table with copies of a saved project. Rows are taken as
    /// saved; nothing is recalculated.
    fn load_project(&mut self, project: &Project) {
        self.cabinets = project.cabinets.clone();
        self.extra_rows = project.extra_rows.clone();
        self.form.craftsman = project.meta.craftsman.clone();
        self.form.client = project.meta.client.clone();
        self.form.date = project.meta.date.clone();
        if let Some(first) = project.cabinets.first() {
            self.form.populate_from(&first.spec);
        }
    }
}

// ============================================================================
// Update
// ============================================================================

/// User actions the session understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the text of one dimension field
    EditForm(FormField, String),
    /// Switch between wall and floor cabinet
    SetKind(CabinetKind),
    SetMetadata {
        craftsman: String,
        client: String,
        date: String,
    },
    /// Restore the default form
    ResetForm,
    /// Validate the form, calculate, and append the cabinet
    AddCabinet,
    RemoveCabinet(Uuid),
    /// Empty the table (cabinets and free-form rows)
    ClearTable,
    /// Edit a generated row in place
    EditPart {
        cabinet_id: Uuid,
        index: usize,
        edit: PartEdit,
    },
    AddCustomRow(Part),
    EditCustomRow {
        index: usize,
        edit: PartEdit,
    },
    RemoveCustomRow(usize),
    /// Replace the table with a saved project
    LoadProject(Box<Project>),
    ToggleTheme,
    SetSidebar(bool),
    SetFormulaVersion(FormulaVersion),
    /// Disable the export control; rejected while an export runs
    BeginExport,
    /// Re-enable the export control
    FinishExport,
}

/// What an action did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The action was applied
    Updated,
    /// A cabinet was calculated and appended
    CabinetAdded(Uuid),
    /// The form failed validation; nothing was calculated
    Invalid(ValidationReport),
    /// The action was refused; the session is unchanged
    Rejected(CutlistError),
}

impl Outcome {
    /// True when the session changed
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Updated | Outcome::CabinetAdded(_))
    }
}

/// Apply an action and hand the session back.
pub fn update(mut session: Session, action: Action) -> (Session, Outcome) {
    match session.apply(action) {
        Ok(outcome) => (session, outcome),
        Err(error) => {
            tracing::debug!(code = error.error_code(), "action rejected: {}", error);
            (session, Outcome::Rejected(error))
        }
    }
}
