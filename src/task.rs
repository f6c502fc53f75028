/// Category assigned when the user leaves the field blank or a loaded
/// record carries none.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Presets offered in the category menu; free-text categories are also
/// accepted, so this list is a convenience, not a validation set.
pub const DEFAULT_CATEGORIES: &str = "Work,Personal,Urgent,Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Surrogate key, assigned by the store at creation and never persisted.
    /// Ordinals shown in listings are computed fresh per listing.
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: bool,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Done"
        } else {
            "Pending"
        }
    }
}

/// Blank categories resolve to [`FALLBACK_CATEGORY`].
pub fn resolve_category(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}
