use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{NewTask, Task, TaskPatch};
use crate::repo::TaskRepository;

/// Operations exposed to the HTTP layer.
pub trait TaskService: Send + Sync {
    fn list_tasks(&self) -> Result<Vec<Task>>;
    fn get_task(&self, id: i64) -> Result<Option<Task>>;
    /// Create a task and return it as stored, timestamps included.
    fn create_task(&self, task: NewTask) -> Result<Task>;
    /// Merge `patch` over the stored task and persist the result.
    fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task>;
    fn delete_task(&self, id: i64) -> Result<()>;
}

pub struct TaskManager {
    repo: Arc<dyn TaskRepository>,
}

impl TaskManager {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }
}

impl TaskService for TaskManager {
    fn list_tasks(&self) -> Result<Vec<Task>> {
        self.repo.get_all()
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.repo.get_by_id(id)
    }

    fn create_task(&self, task: NewTask) -> Result<Task> {
        let id = self.repo.create(&task)?;
        self.repo.get_by_id(id)?.ok_or(Error::NotFound(id))
    }

    fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let current = self.repo.get_by_id(id)?.ok_or(Error::NotFound(id))?;
        self.repo.update(&current.merge(patch))
    }

    fn delete_task(&self, id: i64) -> Result<()> {
        self.repo.delete(id)
    }
}
