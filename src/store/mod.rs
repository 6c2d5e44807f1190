//! Progress store
//!
//! Owns the child's display name and the progress mapping. It is the only
//! writer of persisted state: modules hand it proposed records and never
//! touch the mapping themselves.

mod backend;

pub use backend::{FileStorage, MemoryStorage, Storage};

use tracing::{debug, info, warn};

use crate::progress::{ModuleId, ModuleRecord, ProgressMap};

pub const NAME_KEY: &str = "child-name";
pub const PROGRESS_KEY: &str = "progress";

pub struct ProgressStore<S: Storage>
{
    storage: S,
    name: Option<String>,
    progress: ProgressMap,
    warning: Option<String>,
}

impl<S: Storage> ProgressStore<S>
{
    /// Open the store and load whatever is persisted.
    pub fn open(storage: S) -> Self
    {
        let mut store = Self {
            storage,
            name: None,
            progress: ProgressMap::default(),
            warning: None,
        };
        let (name, progress) = store.load();
        store.name = name;
        store.progress = progress;
        store
    }

    /// Read both entries. Missing or unreadable data yields defaults.
    pub fn load(&self) -> (Option<String>, ProgressMap)
    {
        let name = match self.storage.get(NAME_KEY) {
            Ok(name) => name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            Err(err) => {
                warn!("Failed to read child name, starting without one: {err}");
                None
            }
        };

        let progress = match self.storage.get(PROGRESS_KEY) {
            Ok(Some(raw)) => match ProgressMap::from_json(&raw) {
                Ok(progress) => progress,
                Err(err) => {
                    warn!("Stored progress is malformed, using defaults: {err}");
                    ProgressMap::default()
                }
            },
            Ok(None) => {
                debug!("No stored progress, using defaults");
                ProgressMap::default()
            }
            Err(err) => {
                warn!("Failed to read progress, using defaults: {err}");
                ProgressMap::default()
            }
        };

        (name, progress)
    }

    pub fn name(&self) -> Option<&str>
    {
        self.name.as_deref()
    }

    pub fn progress(&self) -> &ProgressMap
    {
        &self.progress
    }

    /// Copy of one module's record.
    pub fn record(&self, module: ModuleId) -> ModuleRecord
    {
        self.progress.record(module)
    }

    /// Replace the mapping and persist it.
    ///
    /// A write failure keeps the in-memory mapping, logs a warning and
    /// leaves a one-shot message for the menu.
    pub fn save(&mut self, progress: ProgressMap)
    {
        self.progress = progress;
        let written = self
            .progress
            .to_json()
            .map_err(|err| err.to_string())
            .and_then(|json| {
                self.storage
                    .set(PROGRESS_KEY, &json)
                    .map_err(|err| err.to_string())
            });
        match written {
            Ok(()) => debug!("Progress saved"),
            Err(err) => self.degrade(format!("Progress could not be saved: {err}")),
        }
    }

    /// Store a module's proposed record and persist the mapping.
    ///
    /// The record is expected to already satisfy the merge rules.
    pub fn update(&mut self, module: ModuleId, record: ModuleRecord)
    {
        let mut progress = self.progress.clone();
        match progress.replace(module, record) {
            Ok(()) => {
                info!(module = %module, "Module progress updated");
                self.save(progress);
            }
            Err(err) => warn!("Ignoring progress update: {err}"),
        }
    }

    /// Remember the child's name. Returns whether it reached storage; the
    /// in-memory name is set either way.
    pub fn set_name(&mut self, name: &str) -> bool
    {
        let name = name.trim().to_string();
        let saved = match self.storage.set(NAME_KEY, &name) {
            Ok(()) => {
                info!("Child name set");
                true
            }
            Err(err) => {
                self.degrade(format!("Name could not be saved: {err}"));
                false
            }
        };
        self.name = Some(name);
        saved
    }

    /// Wipe every persisted entry and return to defaults.
    pub fn reset(&mut self)
    {
        if let Err(err) = self.storage.clear() {
            self.degrade(format!("Stored progress could not be cleared: {err}"));
        }
        self.name = None;
        self.progress = ProgressMap::default();
        info!("Progress reset");
    }

    /// Pending storage warning, cleared once taken.
    pub fn take_warning(&mut self) -> Option<String>
    {
        self.warning.take()
    }

    pub fn storage(&self) -> &S
    {
        &self.storage
    }

    fn degrade(&mut self, message: String)
    {
        warn!("{message}");
        self.warning = Some(message);
    }
}
