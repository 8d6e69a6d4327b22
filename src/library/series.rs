use std::{
    ffi::{OsStr, OsString},
    path::{Component, Path, PathBuf},
};

use anyhow::Context as _;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::foundation::error::{ReelError, ReelResult};

/// Directory listing collaborator. Entry order is unspecified; callers sort.
pub trait MediaFs {
    /// Names of the entries directly under `dir`.
    fn list_entries(&self, dir: &Path) -> ReelResult<Vec<OsString>>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

/// [`MediaFs`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFs;

impl MediaFs for StdFs {
    fn list_entries(&self, dir: &Path) -> ReelResult<Vec<OsString>> {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("list media directory '{}'", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
            names.push(entry.file_name());
        }
        Ok(names)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// A named directory of episodes, fixed once selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    name: String,
    path: PathBuf,
    episodes: Vec<PathBuf>,
}

impl Series {
    /// Build a series from episode paths. The list must be non-empty.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        episodes: Vec<PathBuf>,
    ) -> ReelResult<Self> {
        let name = name.into();
        if episodes.is_empty() {
            return Err(ReelError::no_episodes(name));
        }
        Ok(Self {
            name,
            path: path.into(),
            episodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn episodes(&self) -> &[PathBuf] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Always false: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn episode(&self, index: usize) -> Option<&Path> {
        self.episodes.get(index).map(PathBuf::as_path)
    }
}

/// Picks the series to play and materializes its sorted episode list.
pub struct SeriesSelector<F = StdFs> {
    root: PathBuf,
    fs: F,
    rng: StdRng,
}

impl SeriesSelector<StdFs> {
    pub fn new(root: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        Self::with_fs(root, StdFs, seed)
    }
}

impl<F: MediaFs> SeriesSelector<F> {
    pub fn with_fs(root: impl Into<PathBuf>, fs: F, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            root: root.into(),
            fs,
            rng,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Series directories under the media root, sorted by name.
    pub fn list_series(&self) -> ReelResult<Vec<OsString>> {
        let mut names: Vec<OsString> = self
            .fs
            .list_entries(&self.root)?
            .into_iter()
            .filter(|name| self.fs.is_dir(&self.root.join(name)))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Regular files of one series, sorted by name. Sub-directories are skipped.
    pub fn load_series(&self, name: &OsStr) -> ReelResult<Series> {
        let display_name = name.to_string_lossy().into_owned();
        let mut components = Path::new(name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(ReelError::validation(format!(
                "series '{display_name}' is not a directory name under the media root"
            )));
        }
        let path = self.root.join(name);
        if !self.fs.is_dir(&path) {
            return Err(ReelError::validation(format!(
                "series '{display_name}' not found under '{}'",
                self.root.display()
            )));
        }

        let mut files: Vec<OsString> = self
            .fs
            .list_entries(&path)?
            .into_iter()
            .filter(|entry| self.fs.is_file(&path.join(entry)))
            .collect();
        files.sort();

        let episodes = files.iter().map(|f| path.join(f)).collect();
        Series::new(display_name, path, episodes)
    }

    /// Choose one of `collection` uniformly at random and load it.
    #[tracing::instrument(skip(self, collection), fields(candidates = collection.len()))]
    pub fn select(&mut self, collection: &[OsString]) -> ReelResult<Series> {
        let chosen = collection
            .choose(&mut self.rng)
            .ok_or_else(|| ReelError::NoSeries(self.root.clone()))?;
        let series = self.load_series(chosen)?;
        tracing::info!(series = series.name(), episodes = series.len(), "selected series");
        Ok(series)
    }

    /// Enumerate the media root and select from it, or load `pinned` directly.
    pub fn select_from_root(&mut self, pinned: Option<&str>) -> ReelResult<Series> {
        if let Some(name) = pinned {
            let series = self.load_series(OsStr::new(name))?;
            tracing::info!(series = series.name(), episodes = series.len(), "pinned series");
            return Ok(series);
        }
        let collection = self.list_series()?;
        tracing::debug!(root = %self.root.display(), ?collection, "available series");
        self.select(&collection)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/series.rs"]
mod tests;
