//! In-memory registry of finished conversions.
//!
//! Each conversion gets a random id that the preview and download
//! endpoints key on. Artifacts live in the temp directory; the
//! registry only remembers where.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

const ID_LENGTH: usize = 16;

/// One finished conversion.
#[derive(Debug, Clone)]
pub struct Job {
    /// Path to the final container file (TIFF or BMP).
    pub final_path: PathBuf,
    /// Path to the preview PNG.
    pub preview_path: PathBuf,
    /// Download filename offered to the client.
    pub filename: String,
}

/// Thread-safe job registry.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job under a fresh random id and return the id.
    pub fn insert(&self, job: Job) -> String {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect();

        self.jobs
            .write()
            .expect("job store lock poisoned")
            .insert(id.clone(), job);
        id
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs
            .read()
            .expect("job store lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().expect("job store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
