//! Record store: one JSON document per post, addressed by `(container, created_utc, id)`.

use crate::error::{Result, ScrapeError};
use crate::models::{Post, PostKey};
use crate::util::write_file_atomic;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key-value persistence of post records. `read` returns `Ok(None)` when the
/// key has never been written; `write` overwrites.
pub trait RecordStore {
    fn read(&self, key: &PostKey) -> Result<Option<Post>>;
    fn write(&self, post: &Post) -> Result<()>;
}

/// Files-per-post under `<root>/<container>/<created_utc>-<id>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &PostKey) -> PathBuf {
        self.root
            .join(&key.container)
            .join(format!("{}-{}.json", key.created_utc, key.post_id))
    }
}

impl RecordStore for FileStore {
    fn read(&self, key: &PostKey) -> Result<Option<Post>> {
        let path = self.path_for(key);
        tracing::debug!(path = %path.display(), "reading post");
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ScrapeError::persistence(&path, e)),
        };
        let post = serde_json::from_slice(&bytes).map_err(|e| ScrapeError::persistence(&path, e))?;
        Ok(Some(post))
    }

    fn write(&self, post: &Post) -> Result<()> {
        let path = self.path_for(&post.key());
        tracing::debug!(post_id = %post.data.id, path = %path.display(), "saving post");
        let body = serde_json::to_vec_pretty(post).map_err(|e| ScrapeError::persistence(&path, e))?;
        write_file_atomic(&path, &body).map_err(|e| ScrapeError::persistence(&path, e))
    }
}

/// In-memory store with a write counter; same contract as [`FileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RefCell<BTreeMap<PostKey, Post>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.borrow().is_empty()
    }

    /// Number of `write` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn get(&self, key: &PostKey) -> Option<Post> {
        self.posts.borrow().get(key).cloned()
    }

    pub fn insert(&self, post: Post) {
        self.posts.borrow_mut().insert(post.key(), post);
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &PostKey) -> Result<Option<Post>> {
        Ok(self.get(key))
    }

    fn write(&self, post: &Post) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.insert(post.clone());
        Ok(())
    }
}
