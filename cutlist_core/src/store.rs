//! # Project Store
//!
//! Saved projects and preferences live in durable key-value storage: one
//! JSON document per key. The [`KeyValueStore`] trait is the storage seam;
//! [`MemoryStore`] backs tests and embedded use, [`DirectoryStore`] keeps
//! one `<key>.json` file per key on disk.
//!
//! [`ProjectLibrary`] owns the project list. It is read once when opened
//! and written back in full after every change:
//!
//! ```text
//! cutlist.projects     {"version": "0.1.0", "projects": [Project, ...]}
//! cutlist.preferences  {"theme": "dark", "formula_version": "current"}
//! ```
//!
//! Unreadable or incompatible documents are logged and treated as empty,
//! so a damaged store never blocks the application from starting.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::session::{update, Action, Session};
//! use cutlist_core::store::{MemoryStore, ProjectLibrary};
//!
//! let mut library = ProjectLibrary::open(MemoryStore::default());
//!
//! let (session, _) = update(Session::default(), Action::AddCabinet);
//! let saved = library.save_session(&session, "Kitchen")?;
//! assert_eq!(library.projects().len(), 1);
//!
//! let (restored, _) = library.load_into(saved.id, Session::default());
//! assert_eq!(restored.cabinets, session.cabinets);
//! # Ok::<(), cutlist_core::errors::CutlistError>(())
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CutlistError, CutlistResult};
use crate::file_io::validate_version;
use crate::project::{Preferences, Project, ProjectMetadata, SCHEMA_VERSION};
use crate::session::{update, Action, Outcome, Session};

/// Storage key of the project list
pub const PROJECTS_KEY: &str = "cutlist.projects";

/// Storage key of the user preferences
pub const PREFERENCES_KEY: &str = "cutlist.preferences";

// ============================================================================
// Storage backends
// ============================================================================

/// Durable string storage under named keys.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> CutlistResult<Option<String>>;

    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> CutlistResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> CutlistResult<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CutlistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CutlistResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CutlistResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use directory::DirectoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod directory {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;
    use crate::errors::{CutlistError, CutlistResult};
    use crate::file_io::{read_optional, remove_if_exists, write_atomic, FileLock};

    /// One `<key>.json` file per key under a directory.
    ///
    /// Writes are atomic and hold a [`FileLock`] on the target file, so a
    /// second instance writing the same key gets `FileLocked` instead of
    /// interleaving.
    #[derive(Debug, Clone)]
    pub struct DirectoryStore {
        root: PathBuf,
        owner: String,
    }

    impl DirectoryStore {
        /// Open (and create if needed) a store rooted at `root`.
        pub fn open(root: impl Into<PathBuf>, owner: impl Into<String>) -> CutlistResult<Self> {
            let root = root.into();
            fs::create_dir_all(&root)
                .map_err(|e| CutlistError::file_error("create directory", root.display().to_string(), e.to_string()))?;
            Ok(DirectoryStore {
                root,
                owner: owner.into(),
            })
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        /// File backing `key`
        pub fn path_for(&self, key: &str) -> PathBuf {
            self.root.join(format!("{}.json", key))
        }
    }

    impl KeyValueStore for DirectoryStore {
        fn get(&self, key: &str) -> CutlistResult<Option<String>> {
            read_optional(&self.path_for(key))
        }

        fn set(&mut self, key: &str, value: &str) -> CutlistResult<()> {
            let path = self.path_for(key);
            let _lock = FileLock::acquire(&path, self.owner.as_str())?;
            write_atomic(&path, value)
        }

        fn remove(&mut self, key: &str) -> CutlistResult<()> {
            let path = self.path_for(key);
            let _lock = FileLock::acquire(&path, self.owner.as_str())?;
            remove_if_exists(&path)
        }
    }
}

// ============================================================================
// Project library
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProjectDocument {
    version: String,
    projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
struct ProjectDocumentRef<'a> {
    version: &'a str,
    projects: &'a [Project],
}

fn parse_projects(text: &str) -> CutlistResult<Vec<Project>> {
    let document: ProjectDocument = serde_json::from_str(text).map_err(CutlistError::serialization)?;
    validate_version(&document.version)?;
    Ok(document.projects)
}

/// Saved projects plus the preferences entry of one store.
#[derive(Debug)]
pub struct ProjectLibrary<S: KeyValueStore> {
    store: S,
    projects: Vec<Project>,
}

impl<S: KeyValueStore> ProjectLibrary<S> {
    /// Read the project list from `store`. A missing list is empty; an
    /// unreadable or incompatible one is logged and treated as empty.
    pub fn open(store: S) -> Self {
        let projects = match store.get(PROJECTS_KEY).and_then(|text| text.map(|t| parse_projects(&t)).transpose()) {
            Ok(projects) => projects.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = PROJECTS_KEY, code = e.error_code(), "ignoring stored projects: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(count = projects.len(), "opened project library");
        ProjectLibrary { store, projects }
    }

    /// Saved projects, oldest first
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: Uuid) -> CutlistResult<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CutlistError::project_not_found(id))
    }

    /// Save the session's table as a new project.
    ///
    /// The project holds copies; later edits to the session do not reach it.
    /// An empty name becomes "Project <date>". Rejected with `EmptyTable`
    /// when the session has no cabinets.
    pub fn save_session(&mut self, session: &Session, name: &str) -> CutlistResult<Project> {
        if session.cabinets.is_empty() {
            return Err(CutlistError::EmptyTable);
        }

        let project = Project::new(
            name,
            ProjectMetadata::from(session.form_metadata()),
            session.cabinets.clone(),
            session.extra_rows.clone(),
        );

        self.projects.push(project.clone());
        if let Err(e) = self.persist() {
            self.projects.pop();
            return Err(e);
        }

        tracing::info!(id = %project.id, name = %project.name, cabinets = project.cabinet_count(), "saved project");
        Ok(project)
    }

    /// Delete a saved project and return it.
    pub fn delete(&mut self, id: Uuid) -> CutlistResult<Project> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CutlistError::project_not_found(id))?;

        let removed = self.projects.remove(index);
        if let Err(e) = self.persist() {
            self.projects.insert(index, removed);
            return Err(e);
        }

        tracing::info!(id = %removed.id, name = %removed.name, "deleted project");
        Ok(removed)
    }

    /// Replace the session's table with a saved project.
    pub fn load_into(&self, id: Uuid, session: Session) -> (Session, Outcome) {
        match self.get(id) {
            Ok(project) => {
                tracing::info!(id = %project.id, name = %project.name, "loaded project");
                update(session, Action::LoadProject(Box::new(project.clone())))
            }
            Err(e) => (session, Outcome::Rejected(e)),
        }
    }

    /// Stored preferences; missing or unreadable entries give the defaults.
    pub fn load_preferences(&self) -> Preferences {
        let parsed = self.store.get(PREFERENCES_KEY).and_then(|text| {
            text.map(|t| serde_json::from_str::<Preferences>(&t).map_err(CutlistError::serialization))
                .transpose()
        });
        match parsed {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = PREFERENCES_KEY, code = e.error_code(), "ignoring stored preferences: {}", e);
                Preferences::default()
            }
        }
    }

    pub fn save_preferences(&mut self, preferences: &Preferences) -> CutlistResult<()> {
        let json = serde_json::to_string_pretty(preferences).map_err(CutlistError::serialization)?;
        self.store.set(PREFERENCES_KEY, &json)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> CutlistResult<()> {
        let document = ProjectDocumentRef {
            version: SCHEMA_VERSION,
            projects: &self.projects,
        };
        let json = serde_json::to_string_pretty(&document).map_err(CutlistError::serialization)?;
        self.store.set(PROJECTS_KEY, &json)
    }
}
