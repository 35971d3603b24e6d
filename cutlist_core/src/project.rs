//! # Project Data Structures
//!
//! A [`Cabinet`] is one successful calculation: the spec, the rows it
//! produced, and who it is for. A [`Project`] is a named snapshot of the
//! cabinet table plus any free-form rows, saved for later.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── id, name
//! ├── meta: ProjectMetadata (schema version, craftsman, client, date, created)
//! ├── cabinets: Vec<Cabinet> (deep copy of the session table, in order)
//! │   └── Cabinet: id, spec, formula_version, parts, meta
//! └── extra_rows: Vec<Part> (free-form rows typed in by the user)
//! ```
//!
//! A project owns its own copies: editing the live session after saving
//! never reaches back into a saved project. There is no update in place;
//! load, edit and save again.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::cabinet::CabinetSpec;
//! use cutlist_core::project::{Cabinet, CabinetMetadata, Project};
//!
//! let cabinet = Cabinet::calculate(
//!     CabinetSpec::wall(80.0, 120.0, 55.0, 2),
//!     CabinetMetadata::new("Reza", "Kitchen client", "2025-03-01"),
//! );
//!
//! let project = Project::new("", cabinet.meta.clone().into(), vec![cabinet], vec![]);
//! assert_eq!(project.name, "Project 2025-03-01");
//! assert_eq!(project.totals().part_count, 7);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! let back: Project = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, project);
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, Totals};
use crate::cabinet::CabinetSpec;
use crate::calculations::{calculate_with, FormulaTable, FormulaVersion, Part, PartEdit};
use crate::errors::{CutlistError, CutlistResult};

/// Current schema version for stored documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Shown when the craftsman or client field was left empty
pub const UNSPECIFIED: &str = "Not specified";

/// Today's date as the form shows it
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn or_unspecified(value: String) -> String {
    if value.trim().is_empty() {
        UNSPECIFIED.to_string()
    } else {
        value
    }
}

// ============================================================================
// Cabinet
// ============================================================================

/// Who and when, stamped on each calculated cabinet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabinetMetadata {
    pub craftsman: String,
    pub client: String,
    /// Free-form date string, as typed
    pub date: String,
    pub created: DateTime<Utc>,
}

impl CabinetMetadata {
    /// Empty names become [`UNSPECIFIED`], an empty date becomes today.
    pub fn new(craftsman: impl Into<String>, client: impl Into<String>, date: impl Into<String>) -> Self {
        let date = date.into();
        CabinetMetadata {
            craftsman: or_unspecified(craftsman.into()),
            client: or_unspecified(client.into()),
            date: if date.trim().is_empty() { today() } else { date },
            created: Utc::now(),
        }
    }
}

/// A calculated cabinet in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cabinet {
    pub id: Uuid,
    pub spec: CabinetSpec,
    /// Formula table the rows were produced with
    #[serde(default)]
    pub formula_version: FormulaVersion,
    /// Rows in table order
    pub parts: Vec<Part>,
    pub meta: CabinetMetadata,
}

impl Cabinet {
    /// Run the current formula table and wrap the result.
    pub fn calculate(spec: CabinetSpec, meta: CabinetMetadata) -> Self {
        Cabinet::calculate_with(spec, FormulaVersion::Current, meta)
    }

    /// Run a specific formula table and wrap the result.
    pub fn calculate_with(spec: CabinetSpec, version: FormulaVersion, meta: CabinetMetadata) -> Self {
        let parts = calculate_with(&spec, FormulaTable::for_version(version));
        Cabinet {
            id: Uuid::new_v4(),
            spec,
            formula_version: version,
            parts,
            meta,
        }
    }

    /// Edit one generated row in place.
    pub fn edit_part(&mut self, index: usize, edit: PartEdit) -> CutlistResult<()> {
        let id = self.id;
        let part = self
            .parts
            .get_mut(index)
            .ok_or_else(|| CutlistError::part_not_found(id, index))?;
        part.apply(edit);
        Ok(())
    }

    /// Sum of row quantities for this cabinet
    pub fn part_count(&self) -> u64 {
        self.parts.iter().map(|p| u64::from(p.quantity)).sum()
    }
}

// ============================================================================
// Project
// ============================================================================

/// Project header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub craftsman: String,
    pub client: String,
    pub date: String,
    /// When the project was saved
    pub created: DateTime<Utc>,
}

impl ProjectMetadata {
    pub fn new(craftsman: impl Into<String>, client: impl Into<String>, date: impl Into<String>) -> Self {
        CabinetMetadata::new(craftsman, client, date).into()
    }
}

impl From<CabinetMetadata> for ProjectMetadata {
    fn from(meta: CabinetMetadata) -> Self {
        ProjectMetadata {
            version: SCHEMA_VERSION.to_string(),
            craftsman: meta.craftsman,
            client: meta.client,
            date: meta.date,
            created: Utc::now(),
        }
    }
}

/// A saved snapshot of the cabinet table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub meta: ProjectMetadata,
    pub cabinets: Vec<Cabinet>,
    #[serde(default)]
    pub extra_rows: Vec<Part>,
}

impl Project {
    /// Create a project. An empty name becomes "Project <date>".
    pub fn new(
        name: impl Into<String>,
        meta: ProjectMetadata,
        cabinets: Vec<Cabinet>,
        extra_rows: Vec<Part>,
    ) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            format!("Project {}", meta.date)
        } else {
            name
        };
        Project {
            id: Uuid::new_v4(),
            name,
            meta,
            cabinets,
            extra_rows,
        }
    }

    /// Number of cabinets saved in this project
    pub fn cabinet_count(&self) -> usize {
        self.cabinets.len()
    }

    /// Totals over the saved rows
    pub fn totals(&self) -> Totals {
        aggregate(&self.cabinets, &self.extra_rows)
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Color theme of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// User preferences persisted next to the project list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    /// Formula table used for new cabinets
    #[serde(default)]
    pub formula_version: FormulaVersion,
}
