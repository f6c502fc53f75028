use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::{resolve_category, Task, FALLBACK_CATEGORY};

pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// On-disk shape of a task: a JSON object with the four string keys
/// `title`, `description`, `category`, `completed`. Defaulting of missing
/// fields happens here, at the parse boundary, so the rest of the crate
/// only ever sees fully populated tasks.
#[derive(Debug, Serialize, Deserialize)]
struct TaskRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    completed: bool,
}

fn default_category() -> String {
    FALLBACK_CATEGORY.to_string()
}

// Hand-edited files sometimes carry "true"/1 here; anything but a JSON
// `true` counts as pending.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            completed: task.completed,
        }
    }
}

/// Writes the full ordered collection to `path`, going through a named
/// temp file in the same directory so a failed write never truncates the
/// existing file. Not retried on failure.
pub fn save_tasks(store: &TaskStore, path: &Path) -> Result<()> {
    let records: Vec<TaskRecord> = store.tasks().iter().map(TaskRecord::from).collect();
    let json = serde_json::to_string_pretty(&records)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    fs::write(tmp.path(), json)?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), count = store.len(), "tasks saved");
    Ok(())
}

/// Loads the collection from `path`. A missing file is an empty store, not
/// an error; malformed JSON is. Surrogate ids are assigned fresh on load.
pub fn load_tasks(path: &Path) -> Result<TaskStore> {
    if !path.exists() {
        return Ok(TaskStore::new());
    }
    let data = fs::read_to_string(path)?;
    let records: Vec<TaskRecord> = serde_json::from_str(&data)?;

    let mut store = TaskStore::new();
    for record in records {
        store.restore(
            record.title,
            record.description,
            resolve_category(&record.category),
            record.completed,
        );
    }
    debug!(path = %path.display(), count = store.len(), "tasks loaded");
    Ok(store)
}
