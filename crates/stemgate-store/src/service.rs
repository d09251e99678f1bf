//! Artifact directory management and stem discovery.
//!
//! # Design
//! - The store owns the directory layout under the configured data root:
//!   `uploads/` (scratch), `downloads/` (fetched media), `separated/` (stem
//!   output, nested `<model>/<job>/` by the separator itself).
//! - Stored inputs are named `<job>.<ext>` so the separator's output
//!   directory, which it derives from the input file stem, equals the job
//!   name.
//! - Listings are sorted (`BTreeMap`) to keep responses deterministic.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use stemgate_config::AppConfig;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::job::{JobName, sanitize_file_name};

/// Filesystem layout and URL builder for pipeline artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    uploads_dir: PathBuf,
    downloads_dir: PathBuf,
    separated_root: PathBuf,
    demucs_model: String,
    public_url: String,
}

impl ArtifactStore {
    /// Open the store, creating the artifact directories when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory cannot be created.
    pub fn open(config: &AppConfig) -> StoreResult<Self> {
        let data_dir = &config.storage.data_dir;
        let store = Self {
            uploads_dir: data_dir.join("uploads"),
            downloads_dir: data_dir.join("downloads"),
            separated_root: data_dir.join("separated"),
            demucs_model: config.tools.demucs_model.clone(),
            public_url: config.http.public_url.clone(),
        };
        for dir in [
            &store.uploads_dir,
            &store.downloads_dir,
            &store.separated_root,
        ] {
            std::fs::create_dir_all(dir)
                .map_err(|source| StoreError::io("store.create_dirs", dir, source))?;
        }
        Ok(store)
    }

    /// Directory holding fetched media, for static mounting.
    #[must_use]
    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Root of the separated-output tree; the separator nests `<model>/<job>/`
    /// beneath it.
    #[must_use]
    pub fn separated_root(&self) -> &Path {
        &self.separated_root
    }

    /// Directory served under `/audio`: the model subtree, so public paths
    /// are `/audio/<job>/<stem>.mp3`.
    #[must_use]
    pub fn audio_mount_dir(&self) -> PathBuf {
        self.separated_root.join(&self.demucs_model)
    }

    /// Target path for a fetched media file.
    #[must_use]
    pub fn download_target(&self, job: &JobName) -> PathBuf {
        self.downloads_dir.join(format!("{job}.mp3"))
    }

    /// Public URL for a fetched media file.
    #[must_use]
    pub fn download_url(&self, job: &JobName) -> String {
        format!("{}/downloads/{job}.mp3", self.public_url)
    }

    /// Directory the separator writes stems into for the given job.
    #[must_use]
    pub fn separated_dir(&self, job: &JobName) -> PathBuf {
        self.separated_root
            .join(&self.demucs_model)
            .join(job.as_str())
    }

    /// Persist an uploaded file into the scratch directory.
    ///
    /// The stored name is `<job>.<ext>` with the job derived from the
    /// sanitized original name, so separation output lands under the job.
    ///
    /// # Errors
    ///
    /// Returns an error when the original name is empty after sanitisation
    /// fallback or the write fails.
    pub async fn save_upload(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> StoreResult<(JobName, PathBuf)> {
        if original_name.trim().is_empty() {
            return Err(StoreError::invalid_input(
                "file_name",
                "must not be empty",
                None,
            ));
        }
        let sanitized = sanitize_file_name(original_name);
        let job = JobName::derive(&sanitized);
        let stored_name = Path::new(&sanitized).extension().map_or_else(
            || job.as_str().to_string(),
            |ext| format!("{job}.{}", ext.to_string_lossy()),
        );
        let path = self.uploads_dir.join(stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::io("store.save_upload", &path, source))?;
        debug!(job = %job, path = %path.display(), "persisted upload");
        Ok((job, path))
    }

    /// List separated stems for a job as `{stem name: public URL}`.
    ///
    /// A missing output directory yields an empty map; the separator may have
    /// produced nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory exists but cannot be read.
    pub async fn list_stems(&self, job: &JobName) -> StoreResult<BTreeMap<String, String>> {
        let dir = self.separated_dir(job);
        let mut stems = BTreeMap::new();

        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!(job = %job, "no separated output directory");
                return Ok(stems);
            }
            Err(source) => return Err(StoreError::io("store.list_stems", &dir, source)),
        };

        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|source| StoreError::io("store.list_stems", &dir, source))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "mp3") {
                continue;
            }
            let (Some(stem), Some(file_name)) = (
                path.file_stem().map(|stem| stem.to_string_lossy()),
                path.file_name().map(|name| name.to_string_lossy()),
            ) else {
                continue;
            };
            stems.insert(stem.to_string(), self.stem_url(job, &file_name));
        }

        Ok(stems)
    }

    /// Remove a scratch input file; a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when deletion fails for any reason other than the
    /// file already being gone.
    pub async fn remove_scratch(&self, path: &Path) -> StoreResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::io("store.remove_scratch", path, source)),
        }
    }

    fn stem_url(&self, job: &JobName, file_name: &str) -> String {
        format!("{}/audio/{job}/{file_name}", self.public_url)
    }
}
