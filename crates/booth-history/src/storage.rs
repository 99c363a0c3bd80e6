use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Durable string values addressed by key.
///
/// A missing key reads as `Ok(None)`; removing a missing key succeeds.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> io::Result<()>;

    async fn remove_item(&self, key: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root).await?;

        // Write a sibling file and rename it over the old value so a crash
        // mid-write never leaves a truncated history behind
        let target = self.path_for(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &target).await
    }

    async fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-process storage with switchable read/write failures
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw value
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.put_raw(key, value);
        storage
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(io::Error::new(io::ErrorKind::Other, "storage is read-only"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        // Suspend like real I/O would, so unserialized callers can interleave
        tokio::task::yield_now().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "storage unavailable"));
        }
        Ok(self.raw(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        tokio::task::yield_now().await;
        self.check_writable()?;
        self.put_raw(key, value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> io::Result<()> {
        tokio::task::yield_now().await;
        self.check_writable()?;
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}
