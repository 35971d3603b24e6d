//! CSV rendering of a [`CuttingSheet`].

use super::sheet::{yes_no, CuttingSheet};

/// Column headings, in output order
pub const CSV_HEADER: [&str; 8] = [
    "section",
    "description",
    "quantity",
    "width_cm",
    "length_cm",
    "groove",
    "edge_banding",
    "attachment_note",
];

/// Render the sheet as CSV: a header row, then one row per part.
///
/// Fields are quoted only when they contain a comma, a quote or a line
/// break; quotes inside quoted fields are doubled.
///
/// # Example
///
/// ```rust
/// use cutlist_core::export::{to_csv, CuttingSheet};
/// use cutlist_core::session::{update, Action, Session};
///
/// let (session, _) = update(Session::default(), Action::AddCabinet);
/// let csv = to_csv(&CuttingSheet::build(&session));
///
/// let mut lines = csv.lines();
/// assert_eq!(lines.next(), Some("section,description,quantity,width_cm,length_cm,groove,edge_banding,attachment_note"));
/// assert_eq!(lines.next(), Some("Wall cabinet 1,body,2,55,120,yes,both,"));
/// ```
pub fn to_csv(sheet: &CuttingSheet) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    for (section, part) in sheet.rows() {
        push_record(
            &mut out,
            [
                section.to_string(),
                part.description.clone(),
                part.quantity.to_string(),
                part.width_cm.to_string(),
                part.length_cm.to_string(),
                yes_no(part.has_groove).to_string(),
                part.edge_banding.display_name().to_string(),
                part.attachment_note.clone(),
            ],
        );
    }
    out
}

fn push_record(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let record: Vec<String> = fields.into_iter().map(|f| escape_field(&f)).collect();
    out.push_str(&record.join(","));
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
