//! A host that "inserts" slides by writing them into a directory.
//!
//! Each inserted deck becomes `insert-NNN.pptx` next to an `insert-NNN.json`
//! sidecar holding the insertion options. Numbers already taken in the
//! directory are skipped, so earlier decks are never overwritten. Nothing
//! touches the disk until the context is synced.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use tokio::io::AsyncWriteExt;

use super::{HostContext, HostEnvironment, InsertOptions, SlideHost};
use crate::error::HostApiError;

pub struct DirectoryHost {
    dir: PathBuf,
    written: Arc<AtomicUsize>,
    next: Arc<AtomicUsize>,
}

impl DirectoryHost {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Arc::new(AtomicUsize::new(0)),
            next: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of decks written by this host so far.
    pub fn inserted(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostEnvironment for DirectoryHost {
    async fn when_ready(&self) -> Result<(), HostApiError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tracing::debug!(dir = %self.dir.display(), "directory host ready");
        Ok(())
    }
}

#[async_trait]
impl SlideHost for DirectoryHost {
    async fn begin(&self) -> Result<Box<dyn HostContext>, HostApiError> {
        if !self.dir.is_dir() {
            return Err(HostApiError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        Ok(Box::new(DirectoryContext {
            dir: self.dir.clone(),
            written: Arc::clone(&self.written),
            next: Arc::clone(&self.next),
            queued: Vec::new(),
        }))
    }
}

struct DirectoryContext {
    dir: PathBuf,
    written: Arc<AtomicUsize>,
    next: Arc<AtomicUsize>,
    queued: Vec<(Vec<u8>, InsertOptions)>,
}

#[async_trait]
impl HostContext for DirectoryContext {
    async fn insert_slides_from_base64(
        &mut self,
        payload: &str,
        options: &InsertOptions,
    ) -> Result<(), HostApiError> {
        let deck = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| HostApiError::Rejected(format!("payload is not valid base64: {e}")))?;

        self.queued.push((deck, options.clone()));
        Ok(())
    }

    async fn sync(self: Box<Self>) -> Result<(), HostApiError> {
        let Self {
            dir,
            written,
            next,
            queued,
        } = *self;

        for (deck, options) in queued {
            let sidecar = serde_json::to_vec_pretty(&options)
                .map_err(|e| HostApiError::Rejected(format!("options not serializable: {e}")))?;

            let (stem, mut file) = create_deck_file(&dir, &next).await?;
            file.write_all(&deck).await?;
            file.flush().await?;
            tokio::fs::write(dir.join(format!("{stem}.json")), sidecar).await?;

            written.fetch_add(1, Ordering::SeqCst);
            tracing::info!(file = %stem, bytes = deck.len(), "slide deck written");
        }
        Ok(())
    }
}

/// Claim the next free `insert-NNN.pptx` in `dir`.
async fn create_deck_file(
    dir: &Path,
    next: &AtomicUsize,
) -> Result<(String, tokio::fs::File), HostApiError> {
    loop {
        let n = next.fetch_add(1, Ordering::SeqCst) + 1;
        let stem = format!("insert-{n:03}");

        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(format!("{stem}.pptx")))
            .await;

        match opened {
            Ok(file) => return Ok((stem, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }
}
