use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reopened_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Task {
    /// Overlay the fields present in `patch` onto this task.
    /// Omitted fields keep their current values.
    pub fn merge(mut self, patch: TaskPatch) -> Self {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self
    }
}

/// Body of a create request. Only `text` is read; the store fills in the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub text: String,
}

/// Body of an update request. Any `id` or store-managed field sent by the
/// client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}
