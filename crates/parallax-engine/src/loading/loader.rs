use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::LoadError;

use super::manager::{LoadKind, LoadStatus, ResourceLoadManager, TaskId};

/// Raw bytes of a fetched asset. Decoding belongs to whoever requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub kind: LoadKind,
    pub source: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub task: TaskId,
    pub kind: LoadKind,
    pub source: String,
}

pub type LoadResult = Result<Asset, LoadError>;

/// Asynchronous fetch capability.
///
/// `start` must return immediately. Finished fetches are handed back from
/// `poll_completed`, which the loop calls between frames.
pub trait AssetLoader {
    fn start(&mut self, request: LoadRequest);

    fn poll_completed(&mut self) -> Vec<(TaskId, LoadResult)>;
}

/// Reads files relative to `root` on background threads.
pub struct FileLoader {
    root: PathBuf,
    tx: Sender<(TaskId, LoadResult)>,
    rx: Receiver<(TaskId, LoadResult)>,
    in_flight: HashMap<TaskId, String>,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx,
            in_flight: HashMap::new(),
        }
    }
}

impl AssetLoader for FileLoader {
    fn start(&mut self, request: LoadRequest) {
        let path = self.root.join(request.source.trim_start_matches('/'));
        let tx = self.tx.clone();
        self.in_flight.insert(request.task, request.source.clone());

        std::thread::spawn(move || {
            let result = std::fs::read(&path)
                .map(|bytes| Asset {
                    kind: request.kind,
                    source: request.source.clone(),
                    bytes,
                })
                .map_err(|source| LoadError::Io {
                    source_id: request.source.clone(),
                    source,
                });
            // The receiver only disappears with the loader itself.
            let _ = tx.send((request.task, result));
        });
    }

    fn poll_completed(&mut self) -> Vec<(TaskId, LoadResult)> {
        let mut done = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok((task, result)) => {
                    self.in_flight.remove(&task);
                    done.push((task, result));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // We hold a sender, so this only happens if every worker
                    // panicked mid-send. Fail whatever is still outstanding.
                    for (task, source) in self.in_flight.drain() {
                        done.push((task, Err(LoadError::Disconnected(source))));
                    }
                    break;
                }
            }
        }
        done
    }
}

/// Handler run on the loop thread once a load finishes.
pub type LoadHandler<S> = Box<dyn FnOnce(&mut S, LoadResult)>;

/// Ties an `AssetLoader` to `ResourceLoadManager` bookkeeping.
///
/// Completion handlers receive the scene so they can swap in the loaded
/// material or geometry. A failed load keeps whatever the scene already
/// showed unless the handler decides otherwise.
pub struct Resources<S> {
    manager: ResourceLoadManager,
    loader: Box<dyn AssetLoader>,
    handlers: HashMap<TaskId, LoadHandler<S>>,
}

impl<S> Resources<S> {
    pub fn new(loader: Box<dyn AssetLoader>) -> Self {
        Self {
            manager: ResourceLoadManager::new(),
            loader,
            handlers: HashMap::new(),
        }
    }

    /// Requests `source` and runs `handler` when it arrives.
    pub fn load(
        &mut self,
        kind: LoadKind,
        source: impl Into<String>,
        handler: impl FnOnce(&mut S, LoadResult) + 'static,
    ) -> TaskId {
        let source = source.into();
        let task = self.manager.request(kind, source.clone());
        self.handlers.insert(task, Box::new(handler));
        self.loader.start(LoadRequest { task, kind, source });
        task
    }

    /// Delivers finished loads. Returns the number of tasks that completed.
    pub fn pump(&mut self, scene: &mut S) -> usize {
        let finished = self.loader.poll_completed();
        let count = finished.len();

        for (task, result) in finished {
            if let Err(e) = self.manager.complete(task, result.is_ok()) {
                // Loader reported a task twice or one it never got.
                log::error!("loader reported an invalid task: {e}");
                continue;
            }
            if let Err(e) = &result {
                log::warn!("{e:#}");
            }
            if let Some(handler) = self.handlers.remove(&task) {
                handler(scene, result);
            }
        }

        count
    }

    #[inline]
    pub fn status(&self) -> LoadStatus {
        self.manager.status()
    }

    /// Access to the manager for installing hooks.
    pub fn manager_mut(&mut self) -> &mut ResourceLoadManager {
        &mut self.manager
    }
}
