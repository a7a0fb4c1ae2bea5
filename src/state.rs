use crate::storage::FileStore;
use crate::store::HabitStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the single habit store. Holding the lock across a whole
/// mutation keeps store writes from interleaving.
#[derive(Clone)]
pub struct AppState {
    pub habits: Arc<Mutex<HabitStore<FileStore>>>,
}

impl AppState {
    pub fn new(habits: HabitStore<FileStore>) -> Self {
        Self {
            habits: Arc::new(Mutex::new(habits)),
        }
    }
}
