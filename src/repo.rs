use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::model::{NewTask, Task};

/// Persistence contract for tasks. All SQL lives behind this trait.
pub trait TaskRepository: Send + Sync {
    /// Every task, newest first.
    fn get_all(&self) -> Result<Vec<Task>>;
    fn get_by_id(&self, id: i64) -> Result<Option<Task>>;
    /// Insert a task and return the id the store assigned.
    fn create(&self, task: &NewTask) -> Result<i64>;
    /// Overwrite the mutable fields of `task.id` and return the re-read row.
    fn update(&self, task: &Task) -> Result<Task>;
    /// Deleting an id that does not exist is not an error.
    fn delete(&self, id: i64) -> Result<()>;
}

const TASK_COLUMNS: &str =
    "id, text, completed, created_at, completed_at, reopened_at, updated_at, user_id";

const INSERT_TASK: &str = "INSERT INTO tasks (text) VALUES (?1)";

// Column references on the right-hand side see the pre-update row, so the
// CASE arms compare the requested state against the stored one.
const UPDATE_TASK: &str = "
UPDATE tasks
SET text = ?1,
    completed = ?2,
    completed_at = CASE
        WHEN ?2 = 1 AND completed = 0 THEN strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
        WHEN ?2 = 0 THEN NULL
        ELSE completed_at
    END,
    reopened_at = CASE
        WHEN ?2 = 0 AND completed = 1 THEN strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
        ELSE reopened_at
    END,
    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
WHERE id = ?3
";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

fn read_task_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get::<_, i64>(2)? != 0,
        created_at: row.get(3)?,
        completed_at: row.get(4)?,
        reopened_at: row.get(5)?,
        updated_at: row.get(6)?,
        user_id: row.get(7)?,
    })
}

/// SQLite-backed repository owning the process-wide connection.
pub struct SqliteTaskRepository {
    conn: Mutex<Connection>,
}

impl SqliteTaskRepository {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Give the connection back so the caller can close it at shutdown.
    pub fn into_inner(self) -> Connection {
        self.conn.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // A panic while the guard was held leaves the connection itself intact,
    // so poisoning is ignored rather than failing every later request.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn select_by_id(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            [id],
            read_task_row,
        )
        .optional()?;
    Ok(task)
}

impl TaskRepository for SqliteTaskRepository {
    fn get_all(&self) -> Result<Vec<Task>> {
        let conn = self.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], read_task_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn();
        select_by_id(&conn, id)
    }

    fn create(&self, task: &NewTask) -> Result<i64> {
        let conn = self.conn();
        conn.execute(INSERT_TASK, [&task.text])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, task: &Task) -> Result<Task> {
        let conn = self.conn();
        let changed = conn.execute(
            UPDATE_TASK,
            rusqlite::params![task.text, task.completed, task.id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(task.id));
        }
        select_by_id(&conn, task.id)?.ok_or(Error::NotFound(task.id))
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute(DELETE_TASK, [id])?;
        Ok(())
    }
}
