use crate::errors::HabitError;
use crate::models::{Habit, HabitId};
use crate::storage::KeyValueStore;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const HABITS_KEY: &str = "habits";

/// Reads the persisted collection. A missing entry is an empty collection.
pub async fn load_habits<S: KeyValueStore>(backend: &S) -> Result<Vec<Habit>, HabitError> {
    match backend.get(HABITS_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub async fn persist_habits<S: KeyValueStore>(
    backend: &mut S,
    habits: &[Habit],
) -> Result<(), HabitError> {
    let payload = serde_json::to_string_pretty(habits)?;
    backend.set(HABITS_KEY, &payload).await?;
    Ok(())
}

/// Owns the habit collection. Every mutation writes the whole collection
/// before it becomes visible in memory.
pub struct HabitStore<S> {
    backend: S,
    habits: Vec<Habit>,
    last_id: u64,
    load_warning: Option<HabitError>,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub async fn open(backend: S) -> Self {
        let (habits, load_warning) = match load_habits(&backend).await {
            Ok(habits) => (habits, None),
            Err(err) => {
                warn!("stored habits unreadable, starting empty: {err}");
                (Vec::new(), Some(err))
            }
        };
        let last_id = habits.iter().map(|habit| habit.id.0).max().unwrap_or(0);
        info!(count = habits.len(), "loaded habits");

        Self {
            backend,
            habits,
            last_id,
            load_warning,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn find(&self, id: HabitId) -> Result<&Habit, HabitError> {
        self.get(id)
            .ok_or_else(|| HabitError::NotFound(id.to_string()))
    }

    pub fn load_warning(&self) -> Option<&HabitError> {
        self.load_warning.as_ref()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub async fn create(&mut self, name: &str) -> Result<Habit, HabitError> {
        if name.trim().is_empty() {
            return Err(HabitError::Validation("habit name must not be empty".into()));
        }

        let now = Utc::now();
        let id = next_id(self.last_id, now.timestamp_millis()).ok_or_else(|| {
            HabitError::Persistence(format!("no habit id left after {}", self.last_id))
        })?;
        let habit = Habit {
            id: HabitId(id),
            name: name.to_string(),
            completed: BTreeMap::new(),
            created_at: Some(now),
        };

        let mut next = self.habits.clone();
        next.push(habit.clone());
        self.commit(next).await?;
        self.last_id = id;

        info!(id = %habit.id, name = %habit.name, "created habit");
        Ok(habit)
    }

    /// Removes the habit if present. Unknown ids are ignored.
    pub async fn delete(&mut self, id: HabitId) -> Result<(), HabitError> {
        if self.get(id).is_none() {
            debug!(%id, "delete of unknown habit ignored");
            return Ok(());
        }

        let next = self
            .habits
            .iter()
            .filter(|habit| habit.id != id)
            .cloned()
            .collect();
        self.commit(next).await?;

        info!(%id, "deleted habit");
        Ok(())
    }

    pub async fn toggle_complete(
        &mut self,
        id: HabitId,
        date: NaiveDate,
    ) -> Result<Habit, HabitError> {
        let pos = self
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| HabitError::NotFound(id.to_string()))?;

        let mut next = self.habits.clone();
        let done = next[pos].toggle(date);
        let updated = next[pos].clone();
        self.commit(next).await?;

        debug!(%id, %date, done, "toggled completion");
        Ok(updated)
    }

    async fn commit(&mut self, next: Vec<Habit>) -> Result<(), HabitError> {
        persist_habits(&mut self.backend, &next).await?;
        self.habits = next;
        Ok(())
    }
}

/// Millisecond timestamp, bumped past the last allocated id when the clock
/// has not advanced. `None` once the id space is used up.
fn next_id(last_id: u64, now_millis: i64) -> Option<u64> {
    let now = u64::try_from(now_millis).unwrap_or(0);
    last_id.checked_add(1).map(|bumped| now.max(bumped))
}
