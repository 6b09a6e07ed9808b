//! Extension state persistence
//!
//! Holds the state the controller keeps across sessions:
//! - the last repository the user looked at
//! - opaque per-repository UI state written by the rendering surface
//! - open code-review sessions, keyed by repository and review id
//!
//! `FileStateStore` writes through to a JSON file on every mutation. A store
//! without a path keeps everything in memory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const STATE_VERSION: u32 = 1;

/// An in-progress code review of a commit (or of a commit comparison)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeReview {
    pub id: String,
    pub last_active: DateTime<Utc>,
    pub last_viewed_file: Option<String>,
    pub remaining_files: Vec<String>,
}

/// Extension-wide state the controller reads and writes
///
/// Implementations must be `Send + Sync`; the controller shares one store
/// between concurrently running request handlers.
pub trait ExtensionStateStore: Send + Sync {
    fn last_active_repo(&self) -> Option<String>;

    fn set_last_active_repo(&self, repo: Option<&str>) -> Result<()>;

    fn repo_state(&self, repo: &str) -> Option<Value>;

    fn set_repo_state(&self, repo: &str, state: Value) -> Result<()>;

    /// The open review with the given id, if any
    fn code_review(&self, repo: &str, id: &str) -> Option<CodeReview>;

    fn start_code_review(
        &self,
        repo: &str,
        id: &str,
        files: Vec<String>,
        last_viewed_file: Option<String>,
    ) -> Result<CodeReview>;

    /// Mark a file as reviewed. Reviewing the last remaining file ends the review.
    fn update_code_review(&self, repo: &str, id: &str, file_path: &str) -> Result<()>;

    fn end_code_review(&self, repo: &str, id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateMeta {
    last_modified: DateTime<Utc>,
    version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateData {
    last_active_repo: Option<String>,
    #[serde(default)]
    repo_states: HashMap<String, Value>,
    #[serde(default)]
    code_reviews: HashMap<String, HashMap<String, CodeReview>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFile {
    meta: StateMeta,
    #[serde(default)]
    state: StateData,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            meta: StateMeta {
                last_modified: Utc::now(),
                version: STATE_VERSION,
            },
            state: StateData::default(),
        }
    }
}

/// JSON-file backed extension state
pub struct FileStateStore {
    path: Option<PathBuf>,
    data: Mutex<StateFile>,
}

impl FileStateStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StateFile::default()),
        }
    }

    /// Load from `path`, starting empty when the file is missing or unreadable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = if path.exists() {
            match Self::read(&path) {
                Ok(data) => {
                    log::info!("Loaded extension state from {:?}", path);
                    data
                }
                Err(e) => {
                    log::warn!("Discarding unreadable extension state: {:#}", e);
                    StateFile::default()
                }
            }
        } else {
            log::info!("No extension state found at {:?}, using defaults", path);
            StateFile::default()
        };

        Self {
            path: Some(path),
            data: Mutex::new(data),
        }
    }

    /// Load from the default location in the config directory
    pub fn load_default() -> Result<Self> {
        Ok(Self::load(crate::paths::state_path()?))
    }

    fn read(path: &Path) -> Result<StateFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {:?}", path))
    }

    fn lock(&self) -> MutexGuard<'_, StateFile> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `f` to a copy of the state and keep it only once it is on disk
    fn mutate<T>(&self, f: impl FnOnce(&mut StateData) -> Result<T>) -> Result<T> {
        let mut file = self.lock();
        let mut next = file.clone();
        let result = f(&mut next.state)?;
        next.meta.last_modified = Utc::now();

        if let Some(path) = &self.path {
            let content =
                serde_json::to_string_pretty(&next).context("Failed to serialize state")?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write state file: {:?}", path))?;
        }

        *file = next;
        Ok(result)
    }
}

impl ExtensionStateStore for FileStateStore {
    fn last_active_repo(&self) -> Option<String> {
        self.lock().state.last_active_repo.clone()
    }

    fn set_last_active_repo(&self, repo: Option<&str>) -> Result<()> {
        self.mutate(|state| {
            state.last_active_repo = repo.map(str::to_string);
            Ok(())
        })
    }

    fn repo_state(&self, repo: &str) -> Option<Value> {
        self.lock().state.repo_states.get(repo).cloned()
    }

    fn set_repo_state(&self, repo: &str, value: Value) -> Result<()> {
        self.mutate(|state| {
            state.repo_states.insert(repo.to_string(), value);
            Ok(())
        })
    }

    fn code_review(&self, repo: &str, id: &str) -> Option<CodeReview> {
        self.lock()
            .state
            .code_reviews
            .get(repo)
            .and_then(|reviews| reviews.get(id))
            .cloned()
    }

    fn start_code_review(
        &self,
        repo: &str,
        id: &str,
        files: Vec<String>,
        last_viewed_file: Option<String>,
    ) -> Result<CodeReview> {
        self.mutate(|state| {
            let review = CodeReview {
                id: id.to_string(),
                last_active: Utc::now(),
                last_viewed_file,
                remaining_files: files,
            };
            state
                .code_reviews
                .entry(repo.to_string())
                .or_default()
                .insert(id.to_string(), review.clone());
            Ok(review)
        })
    }

    fn update_code_review(&self, repo: &str, id: &str, file_path: &str) -> Result<()> {
        self.mutate(|state| {
            let reviews = state
                .code_reviews
                .get_mut(repo)
                .with_context(|| format!("No code reviews are open in {}", repo))?;
            let review = reviews
                .get_mut(id)
                .with_context(|| format!("The code review {} is not open", id))?;

            review.remaining_files.retain(|f| f != file_path);
            review.last_viewed_file = Some(file_path.to_string());
            review.last_active = Utc::now();

            if review.remaining_files.is_empty() {
                reviews.remove(id);
                if reviews.is_empty() {
                    state.code_reviews.remove(repo);
                }
            }
            Ok(())
        })
    }

    fn end_code_review(&self, repo: &str, id: &str) -> Result<()> {
        self.mutate(|state| {
            let removed = state
                .code_reviews
                .get_mut(repo)
                .and_then(|reviews| reviews.remove(id));
            if removed.is_none() {
                anyhow::bail!("The code review {} is not open", id);
            }
            if state.code_reviews.get(repo).is_some_and(|r| r.is_empty()) {
                state.code_reviews.remove(repo);
            }
            Ok(())
        })
    }
}
