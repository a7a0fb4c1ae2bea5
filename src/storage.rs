use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::env;
use tokio::fs;

/// String key-value store backing the habit collection.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = io::Result<Option<String>>> + Send;
    fn set(&mut self, key: &str, value: &str) -> impl Future<Output = io::Result<()>> + Send;
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        // Readers only ever see the old file or the complete new one.
        fs::write(&staging, value).await?;
        fs::rename(&staging, &target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("habit_tracker_store_{}_{}", std::process::id(), nanos))
    }

    #[tokio::test]
    async fn memory_store_returns_last_write() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("habits").await.unwrap(), None);

        store.set("habits", "[]").await.unwrap();
        store.set("habits", "[1]").await.unwrap();
        assert_eq!(store.get("habits").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn file_store_missing_key_is_none() {
        let store = FileStore::new(unique_dir());
        assert_eq!(store.get("habits").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_overwrites_whole_value() {
        let dir = unique_dir();
        let mut store = FileStore::new(&dir);

        store.set("habits", r#"[{"id":1}]"#).await.unwrap();
        store.set("habits", "[]").await.unwrap();

        assert_eq!(store.get("habits").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.join("habits.json").exists());
        assert!(!dir.join(".habits.json.tmp").exists());

        fs::remove_dir_all(dir).await.unwrap();
    }
}
