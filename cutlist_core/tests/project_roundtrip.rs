//! End-to-end: fill the form, build a table, save it, reopen the store,
//! load it back and export it.

use cutlist_core::cabinet::CabinetKind;
use cutlist_core::calculations::{EdgeBanding, Part, PartEdit};
use cutlist_core::export::{export, ExportFormat};
use cutlist_core::session::{update, Action, FormField, Outcome, Session};
use cutlist_core::store::{DirectoryStore, KeyValueStore, ProjectLibrary, PROJECTS_KEY};
use pretty_assertions::assert_eq;

fn apply(session: Session, action: Action) -> Session {
    let (session, outcome) = update(session, action);
    assert!(outcome.is_applied(), "action not applied: {:?}", outcome);
    session
}

fn workshop_session() -> Session {
    let session = apply(
        Session::default(),
        Action::SetMetadata {
            craftsman: "Reza".into(),
            client: "Kitchen client".into(),
            date: "2025-03-01".into(),
        },
    );
    let session = apply(session, Action::AddCabinet);

    let session = apply(session, Action::SetKind(CabinetKind::Floor));
    let session = apply(session, Action::EditForm(FormField::Width, "49".into()));
    let session = apply(session, Action::EditForm(FormField::Height, "77.1".into()));
    let session = apply(session, Action::EditForm(FormField::StretcherQuantity, "2".into()));
    let session = apply(session, Action::AddCabinet);

    let floor_id = session.cabinets[1].id;
    let session = apply(
        session,
        Action::EditPart {
            cabinet_id: floor_id,
            index: 2,
            edit: PartEdit::EdgeBanding(EdgeBanding::FrontOnly),
        },
    );
    apply(session, Action::AddCustomRow(Part::custom("plinth", 1, 10.0, 129.0)))
}

#[test]
fn test_save_reopen_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let session = workshop_session();
    assert_eq!(session.totals().cabinet_count, 2);
    assert_eq!(session.totals().part_count, 7 + 7 + 1);

    let mut library = ProjectLibrary::open(DirectoryStore::open(dir.path(), "workshop").unwrap());
    let saved = library.save_session(&session, "Kitchen").unwrap();

    // Later edits to the live session stay out of the saved project
    let session = apply(session, Action::RemoveCustomRow(0));
    let session = apply(session, Action::ClearTable);
    assert!(session.is_empty());

    let library = ProjectLibrary::open(DirectoryStore::open(dir.path(), "workshop").unwrap());
    let stored = library.get(saved.id).unwrap();
    assert_eq!(stored, &saved);
    assert_eq!(stored.extra_rows.len(), 1);
    assert_eq!(stored.cabinets[1].parts[2].edge_banding, EdgeBanding::FrontOnly);

    let (session, outcome) = library.load_into(saved.id, session);
    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(session.cabinets, saved.cabinets);
    assert_eq!(session.extra_rows, saved.extra_rows);
    assert_eq!(session.form.kind, CabinetKind::Wall);
    assert_eq!(session.form.width, "80");
    assert_eq!(session.form.client, "Kitchen client");

    let (session, artifact) = export(session, ExportFormat::Csv);
    let csv = String::from_utf8(artifact.unwrap().bytes).unwrap();
    assert!(csv.contains("Floor cabinet 1,stretcher,2,45.8,12,no,front only,"));
    assert!(csv.contains("Custom rows,plinth,1,10,129,no,none,"));
    assert!(!session.export_in_flight);
}

#[test]
fn test_corrupted_store_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path(), "workshop").unwrap();
    store.set(PROJECTS_KEY, "{\"version\": \"0.1.0\", \"projects\": [{]").unwrap();

    let mut library = ProjectLibrary::open(store);
    assert!(library.projects().is_empty());

    // The next save replaces the damaged document
    let saved = library.save_session(&workshop_session(), "").unwrap();
    let reopened = ProjectLibrary::open(library.into_store());
    assert_eq!(reopened.projects(), &[saved]);
}
