pub mod config;
pub mod error;
pub mod games;
pub mod nav;
pub mod progress;
pub mod screens;
pub mod shell;
pub mod store;
pub mod term;

pub use config::AppConfig;
pub use error::{ConfigError, ProgressError, StorageError};
pub use nav::{Navigator, Screen};
pub use progress::{LearnRecord, ModuleId, ModuleRecord, ProgressMap, ScoredRecord};
pub use store::{FileStorage, MemoryStorage, ProgressStore, Storage};
