use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{resolve_category, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// View filter applied to listings. Category matching is case-insensitive
/// exact match.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub category: Option<String>,
    pub status: StatusFilter,
}

impl Filter {
    fn matches(&self, task: &Task) -> bool {
        if let Some(category) = &self.category {
            if task.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        self.status.matches(task)
    }
}

/// Insertion-ordered task collection. Mutations address tasks by surrogate
/// id so that a selection stays valid while ordinals shift.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u32,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Appends a new pending task. Title must be non-empty after trimming.
    pub fn add(&mut self, title: &str, description: &str, category: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            title: title.to_string(),
            description: description.trim().to_string(),
            category: resolve_category(category),
            completed: false,
        });
        debug!(id, "task added");
        Ok(())
    }

    /// Rehydrates a task loaded from disk, assigning it a fresh id.
    pub fn restore(&mut self, title: String, description: String, category: String, completed: bool) {
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            title,
            description,
            category,
            completed,
        });
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ordered subsequence matching the filter. An empty result is a normal
    /// value, not an error.
    pub fn filtered(&self, filter: &Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Resolves a 1-based position in the filtered listing to a task id.
    pub fn select_by_ordinal(&self, input: &str, filter: &Filter) -> Result<u32> {
        let input = input.trim();
        let ordinal: usize = input
            .parse()
            .map_err(|_| Error::OutOfRange(input.to_string()))?;
        let visible = self.filtered(filter);
        if ordinal == 0 || ordinal > visible.len() {
            return Err(Error::OutOfRange(input.to_string()));
        }
        Ok(visible[ordinal - 1].id)
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Blank title or description keeps the current value; the category is
    /// overwritten with whatever the caller resolved (callers pass the
    /// existing category when the user declines to change it).
    pub fn edit(
        &mut self,
        id: u32,
        new_title: Option<&str>,
        new_description: Option<&str>,
        category: &str,
    ) -> Result<()> {
        let task = self.get_mut(id)?;
        if let Some(title) = new_title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = new_description {
            let description = description.trim();
            if !description.is_empty() {
                task.description = description.to_string();
            }
        }
        let category = category.trim();
        if !category.is_empty() {
            task.category = category.to_string();
        }
        debug!(id, "task edited");
        Ok(())
    }

    /// Idempotent.
    pub fn complete(&mut self, id: u32) -> Result<()> {
        self.get_mut(id)?.completed = true;
        debug!(id, "task completed");
        Ok(())
    }

    /// Removes the task, shifting ordinals of everything after it.
    pub fn delete(&mut self, id: u32) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        debug!(id, "task deleted");
        Ok(self.tasks.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_three() -> TaskStore {
        let mut store = TaskStore::new();
        store.add("Write report", "Quarterly numbers", "Work").unwrap();
        store.add("Buy milk", "", "Personal").unwrap();
        store.add("Call plumber", "Kitchen sink", "Urgent").unwrap();
        store
    }

    #[test]
    fn add_appends_pending_task() {
        let store = store_with_three();
        assert_eq!(store.len(), 3);
        assert!(store.tasks().iter().all(|t| !t.completed));
        assert_eq!(store.tasks()[1].title, "Buy milk");
    }

    #[test]
    fn add_rejects_empty_title() {
        let mut store = store_with_three();
        let err = store.add("   ", "whitespace only", "Work").unwrap_err();
        assert!(matches!(err, Error::EmptyTitle));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn add_trims_fields_and_defaults_category() {
        let mut store = TaskStore::new();
        store.add("  Water plants  ", "  balcony  ", "  ").unwrap();
        let task = &store.tasks()[0];
        assert_eq!(task.title, "Water plants");
        assert_eq!(task.description, "balcony");
        assert_eq!(task.category, "Other");
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let store = store_with_three();
        let filter = Filter {
            category: Some("wOrK".to_string()),
            status: StatusFilter::All,
        };
        let visible = store.filtered(&filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Write report");
    }

    #[test]
    fn status_filter_splits_completed_from_pending() {
        let mut store = store_with_three();
        let id = store
            .select_by_ordinal("2", &Filter::default())
            .unwrap();
        store.complete(id).unwrap();

        let completed = store.filtered(&Filter {
            category: None,
            status: StatusFilter::Completed,
        });
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "Buy milk");

        let pending = store.filtered(&Filter {
            category: None,
            status: StatusFilter::Pending,
        });
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn filter_with_no_matches_is_empty_not_error() {
        let store = store_with_three();
        let filter = Filter {
            category: Some("Errands".to_string()),
            status: StatusFilter::All,
        };
        assert!(store.filtered(&filter).is_empty());
    }

    #[test]
    fn select_by_ordinal_rejects_bad_input() {
        let store = store_with_three();
        let filter = Filter::default();
        assert!(matches!(
            store.select_by_ordinal("abc", &filter),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            store.select_by_ordinal("0", &filter),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            store.select_by_ordinal("4", &filter),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn select_by_ordinal_respects_active_filter() {
        let mut store = store_with_three();
        let id = store.select_by_ordinal("3", &Filter::default()).unwrap();
        store.complete(id).unwrap();

        // In the completed-only view the sole task is ordinal 1.
        let filter = Filter {
            category: None,
            status: StatusFilter::Completed,
        };
        let selected = store.select_by_ordinal("1", &filter).unwrap();
        assert_eq!(store.get(selected).unwrap().title, "Call plumber");
    }

    #[test]
    fn delete_shifts_later_ordinals() {
        let mut store = store_with_three();
        let filter = Filter::default();
        let id = store.select_by_ordinal("2", &filter).unwrap();
        let removed = store.delete(id).unwrap();
        assert_eq!(removed.title, "Buy milk");

        let now_second = store.select_by_ordinal("2", &filter).unwrap();
        assert_eq!(store.get(now_second).unwrap().title, "Call plumber");
    }

    #[test]
    fn delete_keeps_remaining_ids_stable() {
        let mut store = store_with_three();
        let filter = Filter::default();
        let third = store.select_by_ordinal("3", &filter).unwrap();
        let first = store.select_by_ordinal("1", &filter).unwrap();
        store.delete(first).unwrap();
        // The selection made before the delete still addresses the same task.
        assert_eq!(store.get(third).unwrap().title, "Call plumber");
    }

    #[test]
    fn complete_is_idempotent() {
        let mut store = store_with_three();
        let id = store.select_by_ordinal("1", &Filter::default()).unwrap();
        store.complete(id).unwrap();
        store.complete(id).unwrap();
        assert!(store.get(id).unwrap().completed);
    }

    #[test]
    fn edit_keeps_blank_fields_and_overwrites_category() {
        let mut store = store_with_three();
        let id = store.select_by_ordinal("1", &Filter::default()).unwrap();
        store.edit(id, Some(""), Some("  "), "Personal").unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.category, "Personal");

        store.edit(id, Some("Write annual report"), None, "Personal").unwrap();
        assert_eq!(store.get(id).unwrap().title, "Write annual report");
    }

    #[test]
    fn edit_of_stale_id_is_not_found() {
        let mut store = store_with_three();
        let id = store.select_by_ordinal("2", &Filter::default()).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(
            store.edit(id, Some("x"), None, "Work"),
            Err(Error::TaskNotFound(_))
        ));
    }
}
