use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(u64);

impl ChartId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// A rendered chart, optionally backed by a file once placed in a slot.
#[derive(Debug)]
pub struct RenderedChart {
    id: ChartId,
    svg: String,
    path: Option<PathBuf>,
    points: usize,
}

impl RenderedChart {
    pub fn new(svg: String, path: Option<PathBuf>, points: usize) -> Self {
        Self { id: ChartId::next(), svg, path, points }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn points(&self) -> usize {
        self.points
    }

    fn persist(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Written beside the target and renamed, so the target is either the
        // old chart or the new one, never a partial file.
        let staging = staging_path(path);
        fs::write(&staging, &self.svg)?;
        fs::rename(&staging, path)
    }

    /// After a failed persist, whatever sits at `path` belongs to a chart
    /// that is no longer live.
    fn discard_stale_file(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale chart file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale chart"),
        }
    }

    /// Release the chart. Its file is removed unless `keep` is the same
    /// path, in which case the successor overwrites it.
    fn dispose(self, keep: Option<&Path>) {
        let Some(path) = self.path else {
            tracing::debug!(id = %self.id, "chart disposed");
            return;
        };
        if keep == Some(path.as_path()) {
            tracing::debug!(id = %self.id, "chart disposed, file reused");
            return;
        }
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(id = %self.id, path = %path.display(), "chart disposed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove old chart"),
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Holds at most one live chart.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<RenderedChart>,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispose the current chart, then install and persist `next`.
    ///
    /// Returns the id of the disposed chart, if there was one. If writing
    /// `next` fails the slot is left empty and no chart file remains at its
    /// path.
    pub fn replace(&mut self, next: RenderedChart) -> io::Result<Option<ChartId>> {
        let disposed = self.current.take().map(|old| {
            let id = old.id;
            old.dispose(next.path());
            id
        });

        if let Err(e) = next.persist() {
            next.discard_stale_file();
            return Err(e);
        }
        self.current = Some(next);
        Ok(disposed)
    }

    pub fn clear(&mut self) -> Option<ChartId> {
        self.current.take().map(|old| {
            let id = old.id;
            old.dispose(None);
            id
        })
    }

    pub fn current(&self) -> Option<&RenderedChart> {
        self.current.as_ref()
    }

    /// Number of live charts: 0 or 1.
    pub fn live(&self) -> usize {
        usize::from(self.current.is_some())
    }
}
