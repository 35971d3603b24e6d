//! Read-only view of the cutting table, shared by every export format.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Totals};
use crate::cabinet::CabinetKind;
use crate::calculations::Part;
use crate::project::{Cabinet, Project, UNSPECIFIED};
use crate::session::Session;

/// Title of a sheet built from the live session
pub const SESSION_TITLE: &str = "Cutting list";

/// Label of the free-form rows section
pub const CUSTOM_ROWS_LABEL: &str = "Custom rows";

/// One block of rows under a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSection {
    /// "Wall cabinet 1", "Floor cabinet 2", "Custom rows"
    pub label: String,
    /// "80 × 120 × 55 cm" for cabinets
    pub caption: Option<String>,
    pub rows: Vec<Part>,
}

/// Everything a renderer needs, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingSheet {
    pub title: String,
    pub craftsman: String,
    pub client: String,
    pub date: String,
    pub sections: Vec<SheetSection>,
    pub totals: Totals,
}

impl CuttingSheet {
    /// Sheet for the live session. Metadata comes from the form.
    pub fn build(session: &Session) -> Self {
        let meta = session.form_metadata();
        CuttingSheet::assemble(
            SESSION_TITLE.to_string(),
            meta.craftsman,
            meta.client,
            meta.date,
            &session.cabinets,
            &session.extra_rows,
        )
    }

    /// Sheet for a saved project.
    pub fn from_project(project: &Project) -> Self {
        CuttingSheet::assemble(
            project.name.clone(),
            project.meta.craftsman.clone(),
            project.meta.client.clone(),
            project.meta.date.clone(),
            &project.cabinets,
            &project.extra_rows,
        )
    }

    fn assemble(
        title: String,
        craftsman: String,
        client: String,
        date: String,
        cabinets: &[Cabinet],
        extra_rows: &[Part],
    ) -> Self {
        let mut wall_count = 0;
        let mut floor_count = 0;

        let mut sections: Vec<SheetSection> = cabinets
            .iter()
            .map(|cabinet| {
                let number = match cabinet.spec.kind {
                    CabinetKind::Wall => {
                        wall_count += 1;
                        wall_count
                    }
                    CabinetKind::Floor => {
                        floor_count += 1;
                        floor_count
                    }
                };
                SheetSection {
                    label: section_label(cabinet.spec.kind, number),
                    caption: Some(cabinet.spec.dimensions_caption()),
                    rows: cabinet.parts.clone(),
                }
            })
            .collect();

        if !extra_rows.is_empty() {
            sections.push(SheetSection {
                label: CUSTOM_ROWS_LABEL.to_string(),
                caption: None,
                rows: extra_rows.to_vec(),
            });
        }

        CuttingSheet {
            title,
            craftsman: or_unspecified(craftsman),
            client: or_unspecified(client),
            date,
            sections,
            totals: aggregate(cabinets, extra_rows),
        }
    }

    /// Rows of every section, in order, with their section label
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter().map(move |p| (s.label.as_str(), p)))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn section_label(kind: CabinetKind, number: usize) -> String {
    let name = match kind {
        CabinetKind::Wall => "Wall",
        CabinetKind::Floor => "Floor",
    };
    format!("{} cabinet {}", name, number)
}

fn or_unspecified(value: String) -> String {
    if value.trim().is_empty() {
        UNSPECIFIED.to_string()
    } else {
        value
    }
}

/// Yes/no text for the groove column
pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabinet::CabinetSpec;
    use crate::project::{CabinetMetadata, ProjectMetadata};
    use crate::session::{update, Action};

    fn cabinet(spec: CabinetSpec) -> Cabinet {
        Cabinet::calculate(spec, CabinetMetadata::new("Reza", "", "2025-03-01"))
    }

    #[test]
    fn test_sections_numbered_per_kind() {
        let project = Project::new(
            "Kitchen",
            ProjectMetadata::new("Reza", "", "2025-03-01"),
            vec![
                cabinet(CabinetSpec::wall(80.0, 120.0, 55.0, 2)),
                cabinet(CabinetSpec::floor(49.0, 77.1, 55.0, 1)),
                cabinet(CabinetSpec::wall(60.0, 90.0, 35.0, 1)),
            ],
            vec![Part::custom("plinth", 1, 10.0, 180.0)],
        );
        let sheet = CuttingSheet::from_project(&project);

        let labels: Vec<&str> = sheet.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Wall cabinet 1", "Floor cabinet 1", "Wall cabinet 2", "Custom rows"]
        );
        assert_eq!(sheet.sections[1].caption.as_deref(), Some("49 × 77.1 × 55 cm"));
        assert_eq!(sheet.sections[3].caption, None);
        assert_eq!(sheet.title, "Kitchen");
        assert_eq!(sheet.client, UNSPECIFIED);
        assert_eq!(sheet.totals, project.totals());
    }

    #[test]
    fn test_build_from_session() {
        let (session, _) = update(Session::default(), Action::AddCabinet);
        let sheet = CuttingSheet::build(&session);

        assert_eq!(sheet.title, SESSION_TITLE);
        assert_eq!(sheet.sections.len(), 1);
        assert_eq!(sheet.rows().count(), 5);
        assert_eq!(sheet.totals.part_count, 7);
        assert_eq!(sheet.craftsman, UNSPECIFIED);
    }

    #[test]
    fn test_empty_session() {
        let sheet = CuttingSheet::build(&Session::default());
        assert!(sheet.is_empty());
        assert_eq!(sheet.totals, Totals::default());
    }
}
