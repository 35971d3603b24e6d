//! # PDF Rendering
//!
//! Renders a [`CuttingSheet`] to a landscape A4 PDF using Typst.
//!
//! - The Typst template is embedded as a string constant
//! - Sheet data is escaped and formatted into the source before compilation
//! - Fonts come from `typst-assets`, so no system fonts are needed
//! - Output is raw PDF bytes (`Vec<u8>`)

use chrono::{Datelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use super::sheet::{yes_no, CuttingSheet, SheetSection};
use crate::errors::{CutlistError, CutlistResult};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// Template
// ============================================================================

/// Typst source for the whole sheet. Field text is escaped and inserted
/// once; it is never scanned for placeholders.
fn sheet_source(sheet: &CuttingSheet) -> String {
    let sections: String = sheet.sections.iter().map(render_section).collect();

    format!(
        r##"
#set page(
  paper: "a4",
  flipped: true,
  margin: (top: 1.5cm, bottom: 1.5cm, left: 1.5cm, right: 1.5cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(2pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[{title}]],
      align(right)[#text(size: 8pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 9pt)

#block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 4pt)[
  #text(size: 16pt, weight: "bold")[{title}]
  #v(4pt)
  #grid(
    columns: (auto, 1fr, auto, 1fr, auto, 1fr),
    column-gutter: 8pt,
    [Craftsman:], [{craftsman}],
    [Client:], [{client}],
    [Date:], [{date}],
  )
]

{sections}

#v(10pt)
#table(
  columns: (auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  table.header([*Totals*], []),
  [Cabinets], [{cabinets}],
  [Pieces], [{pieces}],
  [Board area], [{area} m#super[2]],
)
"##,
        title = escape_typst(&sheet.title),
        craftsman = escape_typst(&sheet.craftsman),
        client = escape_typst(&sheet.client),
        date = escape_typst(&sheet.date),
        sections = sections,
        cabinets = sheet.totals.cabinet_count,
        pieces = sheet.totals.part_count,
        area = format!("{:.2}", sheet.totals.area.value()),
    )
}

fn render_section(section: &SheetSection) -> String {
    let caption = section
        .caption
        .as_deref()
        .map(|c| format!(" #h(8pt) #text(fill: gray)[{}]", escape_typst(c)))
        .unwrap_or_default();

    let rows: String = section
        .rows
        .iter()
        .map(|p| {
            format!(
                "  [{}], [{}], [{}], [{}], [{}], [{}], [{}],\n",
                escape_typst(&p.description),
                p.quantity,
                p.width_cm,
                p.length_cm,
                yes_no(p.has_groove),
                p.edge_banding.display_name(),
                escape_typst(&p.attachment_note),
            )
        })
        .collect();

    format!(
        r##"
#v(8pt)
*{label}*{caption}
#table(
  columns: (2fr, auto, auto, auto, auto, auto, 2fr),
  inset: 5pt,
  stroke: 0.5pt,
  align: (left, right, right, right, center, center, left),
  table.header([*Part*], [*Qty*], [*Width (cm)*], [*Length (cm)*], [*Groove*], [*Edging*], [*Note*]),
{rows})
"##,
        label = escape_typst(&section.label),
        caption = caption,
        rows = rows,
    )
}

/// Render a cutting sheet to PDF bytes.
///
/// Typst compile or PDF errors are returned as `ExportFailed`.
///
/// # Example
///
/// ```rust,no_run
/// use cutlist_core::export::{render_pdf, CuttingSheet};
/// use cutlist_core::session::{update, Action, Session};
///
/// let (session, _) = update(Session::default(), Action::AddCabinet);
/// let pdf = render_pdf(&CuttingSheet::build(&session))?;
/// std::fs::write("cutting_list.pdf", pdf).unwrap();
/// # Ok::<(), cutlist_core::errors::CutlistError>(())
/// ```
pub fn render_pdf(sheet: &CuttingSheet) -> CutlistResult<Vec<u8>> {
    let world = PdfWorld::new(sheet_source(sheet));
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CutlistError::export_failed("pdf", format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CutlistError::export_failed("pdf", format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '/' => format!("\\{}", c),
            _ => c.to_string(),
        })
        .collect()
}
