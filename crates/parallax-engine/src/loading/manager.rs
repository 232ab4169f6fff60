use std::collections::HashMap;
use std::fmt;

use crate::error::InvalidTaskError;

/// Identifier of a load request. Unique per manager, never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of asset a task fetches. Bookkeeping only.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LoadKind {
    Texture,
    Font,
    Geometry,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TaskStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTask {
    pub id: TaskId,
    pub kind: LoadKind,
    pub source: String,
    pub status: TaskStatus,
}

/// Aggregate counts at one instant.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LoadStatus {
    /// Tasks requested since the manager was created.
    pub started: usize,
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

impl LoadStatus {
    #[inline]
    pub fn completed(&self) -> usize {
        self.loaded + self.failed
    }
}

/// Callbacks fired synchronously at task transitions.
///
/// Hooks must not call back into the manager that is running them.
#[derive(Default)]
pub struct LoadHooks {
    pub on_batch_start: Option<Box<dyn FnMut()>>,
    pub on_batch_complete: Option<Box<dyn FnMut()>>,
    pub on_progress: Option<Box<dyn FnMut(usize, usize)>>,
    pub on_task_error: Option<Box<dyn FnMut(TaskId)>>,
}

/// In-memory bookkeeping for outstanding asset loads.
///
/// The manager never fetches anything itself; a loader reports back through
/// `complete`. Terminal tasks leave the active set immediately.
#[derive(Default)]
pub struct ResourceLoadManager {
    next_id: u64,
    active: HashMap<TaskId, LoadTask>,
    status: LoadStatus,
    hooks: LoadHooks,
}

impl ResourceLoadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_batch_start(&mut self, f: impl FnMut() + 'static) {
        self.hooks.on_batch_start = Some(Box::new(f));
    }

    pub fn on_batch_complete(&mut self, f: impl FnMut() + 'static) {
        self.hooks.on_batch_complete = Some(Box::new(f));
    }

    /// `f(completed, total)`; both counts are cumulative.
    pub fn on_progress(&mut self, f: impl FnMut(usize, usize) + 'static) {
        self.hooks.on_progress = Some(Box::new(f));
    }

    pub fn on_task_error(&mut self, f: impl FnMut(TaskId) + 'static) {
        self.hooks.on_task_error = Some(Box::new(f));
    }

    /// Registers a pending task and returns its id.
    pub fn request(&mut self, kind: LoadKind, source: impl Into<String>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let starts_batch = self.status.pending == 0;

        self.active.insert(
            id,
            LoadTask {
                id,
                kind,
                source: source.into(),
                status: TaskStatus::Pending,
            },
        );
        self.status.started += 1;
        self.status.pending += 1;

        if starts_batch {
            log::info!("loading started");
            if let Some(f) = self.hooks.on_batch_start.as_mut() {
                f();
            }
        }

        id
    }

    /// Moves a pending task to `Loaded` (or `Failed` when `success` is false).
    pub fn complete(&mut self, id: TaskId, success: bool) -> Result<LoadTask, InvalidTaskError> {
        let Some(mut task) = self.active.remove(&id) else {
            return Err(if id.0 < self.next_id {
                InvalidTaskError::AlreadyFinished(id)
            } else {
                InvalidTaskError::Unknown(id)
            });
        };

        self.status.pending -= 1;
        if success {
            task.status = TaskStatus::Loaded;
            self.status.loaded += 1;
        } else {
            task.status = TaskStatus::Failed;
            self.status.failed += 1;
            log::warn!("failed to load {:?} {} ({})", task.kind, task.source, id);
            if let Some(f) = self.hooks.on_task_error.as_mut() {
                f(id);
            }
        }

        let (completed, total) = (self.status.completed(), self.status.started);
        if let Some(f) = self.hooks.on_progress.as_mut() {
            f(completed, total);
        }

        if self.status.pending == 0 {
            log::info!("loading finished ({completed}/{total}, {} failed)", self.status.failed);
            if let Some(f) = self.hooks.on_batch_complete.as_mut() {
                f();
            }
        }

        Ok(task)
    }

    #[inline]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Pending task by id, if it is still in flight.
    pub fn task(&self, id: TaskId) -> Option<&LoadTask> {
        self.active.get(&id)
    }

    pub fn is_idle(&self) -> bool {
        self.status.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn request_increments_pending() {
        let mut m = ResourceLoadManager::new();
        let before = m.status();
        let id = m.request(LoadKind::Texture, "/textures/door/color.jpg");
        let after = m.status();

        assert_eq!(after.pending, before.pending + 1);
        assert_eq!(after.started, 1);
        assert_eq!(m.task(id).map(|t| t.status), Some(TaskStatus::Pending));
    }

    #[test]
    fn successful_completion_moves_pending_to_loaded() {
        let mut m = ResourceLoadManager::new();
        let id = m.request(LoadKind::Font, "/fonts/helvetiker_regular.typeface.json");
        let task = m.complete(id, true).unwrap();

        assert_eq!(task.status, TaskStatus::Loaded);
        assert_eq!(
            m.status(),
            LoadStatus { started: 1, pending: 0, loaded: 1, failed: 0 }
        );
        assert!(m.task(id).is_none());
    }

    #[test]
    fn second_completion_is_rejected() {
        let mut m = ResourceLoadManager::new();
        let id = m.request(LoadKind::Texture, "a.png");
        m.complete(id, true).unwrap();

        assert_eq!(m.complete(id, true), Err(InvalidTaskError::AlreadyFinished(id)));
        assert_eq!(m.complete(id, false), Err(InvalidTaskError::AlreadyFinished(id)));
        assert_eq!(m.status().loaded, 1);
    }

    #[test]
    fn unknown_task_is_rejected() {
        let mut m = ResourceLoadManager::new();
        let bogus = TaskId(42);
        assert_eq!(m.complete(bogus, true), Err(InvalidTaskError::Unknown(bogus)));
    }

    #[test]
    fn failure_is_counted_separately() {
        let mut m = ResourceLoadManager::new();
        let id = m.request(LoadKind::Geometry, "missing.bin");
        let task = m.complete(id, false).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(m.status().failed, 1);
        assert_eq!(m.status().loaded, 0);
    }

    // ── hooks ─────────────────────────────────────────────────────────────

    fn recorded() -> (ResourceLoadManager, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut m = ResourceLoadManager::new();

        let l = log.clone();
        m.on_batch_start(move || l.borrow_mut().push("start".into()));
        let l = log.clone();
        m.on_progress(move |done, total| l.borrow_mut().push(format!("progress {done}/{total}")));
        let l = log.clone();
        m.on_task_error(move |id| l.borrow_mut().push(format!("error {id}")));
        let l = log.clone();
        m.on_batch_complete(move || l.borrow_mut().push("complete".into()));

        (m, log)
    }

    #[test]
    fn batch_hooks_fire_at_transitions() {
        let (mut m, log) = recorded();

        let a = m.request(LoadKind::Texture, "a.png");
        let b = m.request(LoadKind::Texture, "b.png");
        m.complete(b, false).unwrap();
        m.complete(a, true).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["start", "error #1", "progress 1/2", "progress 2/2", "complete"]
        );
    }

    #[test]
    fn new_batch_starts_after_previous_completes() {
        let (mut m, log) = recorded();

        let a = m.request(LoadKind::Texture, "a.png");
        m.complete(a, true).unwrap();
        let b = m.request(LoadKind::Texture, "b.png");
        m.complete(b, true).unwrap();

        let starts = log.borrow().iter().filter(|e| *e == "start").count();
        let completes = log.borrow().iter().filter(|e| *e == "complete").count();
        assert_eq!((starts, completes), (2, 2));
        assert_eq!(log.borrow().last().map(String::as_str), Some("complete"));
    }
}
