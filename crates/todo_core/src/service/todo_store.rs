//! Observable todo store.
//!
//! # Responsibility
//! - Own the current list snapshot and publish it to subscribers.
//! - Translate add/update/delete intents into repository writes, each
//!   followed by a full re-read of storage.
//! - Track the single item selected for edit.
//!
//! # Invariants
//! - The snapshot only ever holds the result of the last successful
//!   `list_todos` read; a failed write or read leaves it untouched.
//! - Every operation writes first and re-reads second. `&mut self` keeps
//!   operations strictly sequential; shared hosts wrap the store in a lock.
//! - The selection is cleared after every successful `add` and changed by
//!   nothing else except `select`/`submit`.
//! - Log lines carry ids and counts only, never user text.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// `update` was called without a prior `select`.
    NothingSelected,
    /// Persistence operation failed.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingSelected => write!(f, "no todo is selected for edit"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NothingSelected => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Which item, if any, a pending edit form targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSelection {
    #[default]
    Empty,
    Holding(Todo),
}

/// Explicit routing for an edit-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// Submission inserts a new row.
    Create,
    /// Submission revises this existing row.
    Edit(Todo),
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&[Todo]) + Send>;

/// Observable list of todos backed by a repository.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
    todos: Vec<Todo>,
    selection: EditSelection,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    revision: u64,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Creates a store with an empty snapshot.
    ///
    /// Callers trigger the first load with `refresh` once the view is shown.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            todos: Vec::new(),
            selection: EditSelection::Empty,
            listeners: Vec::new(),
            next_subscription: 0,
            revision: 0,
        }
    }

    /// Current snapshot in repository order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Number of successful refreshes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> &EditSelection {
        &self.selection
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Re-reads every todo and republishes the snapshot.
    ///
    /// # Side effects
    /// - Replaces the snapshot wholesale, no diffing.
    /// - Notifies every subscriber synchronously, in subscription order.
    pub fn refresh(&mut self) -> StoreResult<&[Todo]> {
        let todos = self.repo.list_todos().map_err(|err| {
            error!("event=todo_refresh module=store status=error error={err}");
            err
        })?;

        self.todos = todos;
        self.revision += 1;
        debug!(
            "event=todo_refresh module=store status=ok count={} revision={} listeners={}",
            self.todos.len(),
            self.revision,
            self.listeners.len()
        );

        for (_, listener) in &self.listeners {
            listener(&self.todos);
        }
        Ok(&self.todos)
    }

    /// Inserts a new todo with default status, then refreshes.
    ///
    /// An empty title is accepted and stored as-is. Clears the selection once
    /// the insert succeeded.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<TodoId> {
        let draft = Todo::new(title, description);
        let id = self.repo.insert_todo(&draft).map_err(|err| {
            error!("event=todo_add module=store status=error error={err}");
            err
        })?;
        self.selection = EditSelection::Empty;
        info!("event=todo_add module=store status=ok todo_id={id}");

        self.refresh()?;
        Ok(id)
    }

    /// Records `todo` as the target of the next `update`. No I/O.
    pub fn select(&mut self, todo: &Todo) {
        debug!("event=todo_select module=store status=ok todo_id={}", todo.id);
        self.selection = EditSelection::Holding(todo.clone());
    }

    /// Whether an item is currently selected for edit.
    pub fn is_editing(&self) -> bool {
        matches!(self.selection, EditSelection::Holding(_))
    }

    /// Revises the selected todo's text, keeping id and status, then
    /// refreshes.
    ///
    /// # Errors
    /// - `NothingSelected` when `select` was never called; storage is not
    ///   touched in that case.
    /// - `Repo(NotFound)` when the selected row no longer exists.
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<()> {
        let EditSelection::Holding(selected) = &self.selection else {
            warn!("event=todo_update module=store status=error error_code=nothing_selected");
            return Err(StoreError::NothingSelected);
        };

        let revised = selected.revised(title, description);
        self.repo.update_todo(&revised).map_err(|err| {
            error!(
                "event=todo_update module=store status=error todo_id={} error={err}",
                revised.id
            );
            err
        })?;
        info!("event=todo_update module=store status=ok todo_id={}", revised.id);
        self.selection = EditSelection::Holding(revised);

        self.refresh()?;
        Ok(())
    }

    /// Removes `todo` by id, then refreshes.
    ///
    /// Leaves the selection as is, even when it points at the removed row.
    pub fn delete(&mut self, todo: &Todo) -> StoreResult<()> {
        self.repo.delete_todo(todo.id).map_err(|err| {
            error!(
                "event=todo_delete module=store status=error todo_id={} error={err}",
                todo.id
            );
            err
        })?;
        info!("event=todo_delete module=store status=ok todo_id={}", todo.id);

        self.refresh()?;
        Ok(())
    }

    /// Mode an edit form opened right now should submit with.
    pub fn edit_mode(&self) -> EditMode {
        match &self.selection {
            EditSelection::Empty => EditMode::Create,
            EditSelection::Holding(todo) => EditMode::Edit(todo.clone()),
        }
    }

    /// Routes an edit-form submission by its explicit mode.
    ///
    /// Returns the id of the inserted or revised todo.
    pub fn submit(
        &mut self,
        mode: EditMode,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<TodoId> {
        match mode {
            EditMode::Create => self.add(title, description),
            EditMode::Edit(todo) => {
                let id = todo.id;
                self.selection = EditSelection::Holding(todo);
                self.update(title, description)?;
                Ok(id)
            }
        }
    }

    /// Registers a listener called with the new snapshot after every
    /// successful refresh.
    pub fn subscribe(&mut self, listener: impl Fn(&[Todo]) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{EditMode, EditSelection, StoreError, TodoStore};
    use crate::model::todo::{Todo, TodoId, TodoStatus};
    use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
    use std::cell::{Cell, RefCell};
    use std::sync::{Arc, Mutex};

    /// In-memory repository recording call order.
    #[derive(Default)]
    struct FakeRepo {
        rows: RefCell<Vec<Todo>>,
        next_id: Cell<TodoId>,
        calls: RefCell<Vec<&'static str>>,
        fail_list: Cell<bool>,
    }

    impl TodoRepository for FakeRepo {
        fn insert_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
            self.calls.borrow_mut().push("insert");
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            let mut row = todo.clone();
            row.id = id;
            self.rows.borrow_mut().push(row);
            Ok(id)
        }

        fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
            self.calls.borrow_mut().push("update");
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|row| row.id == todo.id)
                .ok_or(RepoError::NotFound(todo.id))?;
            *row = todo.clone();
            Ok(())
        }

        fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
            self.calls.borrow_mut().push("delete");
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|row| row.id != id);
            if rows.len() == before {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        }

        fn list_todos(&self) -> RepoResult<Vec<Todo>> {
            self.calls.borrow_mut().push("list");
            if self.fail_list.get() {
                return Err(RepoError::InvalidData("list failed".to_string()));
            }
            Ok(self.rows.borrow().clone())
        }

        fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
            Ok(self.rows.borrow().iter().find(|row| row.id == id).cloned())
        }
    }

    #[test]
    fn every_mutation_writes_before_rereading() {
        let mut store = TodoStore::new(FakeRepo::default());
        let id = store.add("a", "").unwrap();
        let todo = store.todos()[0].clone();
        store.select(&todo);
        store.update("b", "").unwrap();
        store.delete(&todo).unwrap();

        assert_eq!(id, todo.id);
        assert_eq!(
            *store.repository().calls.borrow(),
            vec!["insert", "list", "update", "list", "delete", "list"]
        );
    }

    #[test]
    fn update_without_selection_fails_without_touching_storage() {
        let mut store = TodoStore::new(FakeRepo::default());

        let err = store.update("x", "y").unwrap_err();
        assert!(matches!(err, StoreError::NothingSelected));
        assert!(store.repository().calls.borrow().is_empty());
    }

    #[test]
    fn add_clears_stale_selection() {
        let mut store = TodoStore::new(FakeRepo::default());
        store.add("first", "").unwrap();
        let first = store.todos()[0].clone();
        store.select(&first);
        assert!(store.is_editing());

        store.add("second", "").unwrap();
        assert!(!store.is_editing());
        assert_eq!(store.selection(), &EditSelection::Empty);
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let mut store = TodoStore::new(FakeRepo::default());
        store.add("kept", "").unwrap();
        let revision = store.revision();

        store.repository().fail_list.set(true);
        let err = store.add("lost from view", "").unwrap_err();

        assert!(matches!(err, StoreError::Repo(RepoError::InvalidData(_))));
        assert_eq!(store.todos().len(), 1);
        assert_eq!(store.todos()[0].title, "kept");
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn subscribers_receive_each_refresh_until_unsubscribed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = TodoStore::new(FakeRepo::default());
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |todos| {
            sink.lock().unwrap().push(todos.len());
        });

        store.refresh().unwrap();
        store.add("one", "").unwrap();
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.add("two", "").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn submit_routes_by_explicit_mode() {
        let mut store = TodoStore::new(FakeRepo::default());
        assert_eq!(store.edit_mode(), EditMode::Create);

        let id = store.submit(EditMode::Create, "draft", "").unwrap();
        let mut created = store.todos()[0].clone();
        created.status = TodoStatus::Done;
        store.repository().update_todo(&created).unwrap();
        store.refresh().unwrap();
        let created = store.todos()[0].clone();

        let edited = store
            .submit(EditMode::Edit(created.clone()), "final", "details")
            .unwrap();
        assert_eq!(edited, id);
        assert_eq!(store.edit_mode(), EditMode::Edit(store.todos()[0].clone()));

        let todo = &store.todos()[0];
        assert_eq!(todo.title, "final");
        assert_eq!(todo.description, "details");
        assert_eq!(todo.status, TodoStatus::Done);
    }
}
