//! # Export
//!
//! Turns the cutting table into a document. Every format renders the same
//! [`CuttingSheet`]: section per cabinet (numbered per kind), an optional
//! custom-rows section, and the totals.
//!
//! [`export`] is the boundary the presentation layer calls. It marks the
//! session as exporting for the duration of the render, so the export
//! control can stay disabled, and always clears the mark again.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::export::{export, ExportFormat};
//! use cutlist_core::session::{update, Action, Session};
//!
//! let (session, _) = update(Session::default(), Action::AddCabinet);
//! let (session, artifact) = export(session, ExportFormat::Csv);
//!
//! let artifact = artifact?;
//! assert!(artifact.file_name.ends_with(".csv"));
//! assert!(!session.export_in_flight);
//! # Ok::<(), cutlist_core::errors::CutlistError>(())
//! ```

pub mod csv;
pub mod pdf;
pub mod sheet;

pub use self::csv::to_csv;
pub use self::pdf::render_pdf;
pub use self::sheet::{CuttingSheet, SheetSection};

use serde::{Deserialize, Serialize};

use crate::errors::{CutlistError, CutlistResult};
use crate::project::Project;
use crate::session::{update, Action, Outcome, Session};

/// Document formats the exporter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A rendered document, ready to be saved or handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    /// Suggested file name, e.g. `cutting-list-2025-03-01.pdf`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Render a sheet in the requested format.
pub fn render(sheet: &CuttingSheet, format: ExportFormat) -> CutlistResult<ExportArtifact> {
    if sheet.is_empty() {
        return Err(CutlistError::EmptyTable);
    }

    let bytes = match format {
        ExportFormat::Csv => to_csv(sheet).into_bytes(),
        ExportFormat::Pdf => render_pdf(sheet)?,
    };

    Ok(ExportArtifact {
        format,
        file_name: file_name(sheet, format),
        bytes,
    })
}

/// Export the live session.
///
/// Rejected with `EmptyTable` when there is nothing to export and with
/// `ExportInProgress` while another export runs. Render failures are
/// logged and returned; the session comes back with the export mark
/// cleared either way.
pub fn export(session: Session, format: ExportFormat) -> (Session, CutlistResult<ExportArtifact>) {
    if session.is_empty() {
        return (session, Err(CutlistError::EmptyTable));
    }

    let (session, outcome) = update(session, Action::BeginExport);
    if let Outcome::Rejected(e) = outcome {
        return (session, Err(e));
    }

    let result = render(&CuttingSheet::build(&session), format);
    let (session, _) = update(session, Action::FinishExport);

    match &result {
        Ok(artifact) => {
            tracing::debug!(file = %artifact.file_name, bytes = artifact.bytes.len(), "exported cutting list")
        }
        Err(e) => tracing::error!(format = format.extension(), code = e.error_code(), "export failed: {}", e),
    }
    (session, result)
}

/// Export a saved project without touching any session.
pub fn export_project(project: &Project, format: ExportFormat) -> CutlistResult<ExportArtifact> {
    render(&CuttingSheet::from_project(project), format).inspect_err(|e| {
        tracing::error!(format = format.extension(), code = e.error_code(), "export failed: {}", e)
    })
}

fn file_name(sheet: &CuttingSheet, format: ExportFormat) -> String {
    let stem = slug(&sheet.title);
    let stem = if stem.is_empty() { "cutting-list".to_string() } else { stem };
    let date = slug(&sheet.date);
    if date.is_empty() {
        format!("{}.{}", stem, format.extension())
    } else {
        format!("{}-{}.{}", stem, date, format.extension())
    }
}

/// Lowercase alphanumerics; everything else becomes `-`. Leading and
/// trailing dashes are dropped.
fn slug(text: &str) -> String {
    let slug: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectMetadata;

    fn session_with_cabinet() -> Session {
        let (session, _) = update(Session::default(), Action::SetMetadata {
            craftsman: "Reza".into(),
            client: "Kitchen client".into(),
            date: "2025-03-01".into(),
        });
        let (session, _) = update(session, Action::AddCabinet);
        session
    }

    #[test]
    fn test_csv_export() {
        let (session, result) = export(session_with_cabinet(), ExportFormat::Csv);
        let artifact = result.unwrap();

        assert_eq!(artifact.file_name, "cutting-list-2025-03-01.csv");
        assert_eq!(artifact.format.mime_type(), "text/csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(!session.export_in_flight);
    }

    #[test]
    fn test_empty_session_rejected() {
        let (session, result) = export(Session::default(), ExportFormat::Pdf);
        assert_eq!(result.unwrap_err(), CutlistError::EmptyTable);
        assert!(!session.export_in_flight);
    }

    #[test]
    fn test_export_while_in_flight_rejected() {
        let (session, _) = update(session_with_cabinet(), Action::BeginExport);
        let (session, result) = export(session, ExportFormat::Csv);

        assert_eq!(result.unwrap_err(), CutlistError::ExportInProgress);
        // The running export still owns the mark
        assert!(session.export_in_flight);
    }

    #[test]
    fn test_export_project() {
        let session = session_with_cabinet();
        let project = Project::new(
            "Kitchen & Co",
            ProjectMetadata::new("Reza", "", "2025-03-01"),
            session.cabinets.clone(),
            vec![],
        );
        let artifact = export_project(&project, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.file_name, "kitchen---co-2025-03-01.csv");

        let empty = Project::new("Empty", ProjectMetadata::new("", "", ""), vec![], vec![]);
        assert!(export_project(&empty, ExportFormat::Csv).is_err());
    }

    #[test]
    fn test_file_name_has_no_path_separators() {
        let (session, _) = update(session_with_cabinet(), Action::SetMetadata {
            craftsman: "Reza".into(),
            client: String::new(),
            date: "1404/07/25".into(),
        });
        let (_, result) = export(session, ExportFormat::Csv);
        assert_eq!(result.unwrap().file_name, "cutting-list-1404-07-25.csv");

        assert_eq!(slug("../etc\\passwd"), "etc-passwd");
        assert_eq!(slug(" / "), "");
    }
}
