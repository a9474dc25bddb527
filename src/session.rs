//! Session context shared by every plot and canvas built from it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::palette::{BuiltinPalettes, PaletteCatalog};
use crate::RenderConfig;

/// Hands out identifiers used to name generated files.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicUsize,
}

impl IdAllocator {
    pub fn next(&self) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Sessions created so far in this process.
static SESSIONS: AtomicUsize = AtomicUsize::new(0);

struct SessionInner {
    config: RenderConfig,
    ids: IdAllocator,
    workdir: PathBuf,
    /// `<pid>-<session>`, part of every generated file name.
    tag: String,
    palettes: Arc<dyn PaletteCatalog>,
    /// Files written on disk and not yet cleaned up.
    generated: Mutex<BTreeSet<PathBuf>>,
}

/// Cheap to clone; clones share the same allocator and catalog.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_catalog(config, Arc::new(BuiltinPalettes::new()))
    }

    pub fn with_catalog(config: RenderConfig, palettes: Arc<dyn PaletteCatalog>) -> Self {
        let workdir = config.workdir.clone().unwrap_or_else(|| PathBuf::from("."));
        let tag = format!("{}-{}", process::id(), SESSIONS.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Arc::new(SessionInner {
                config,
                ids: IdAllocator::default(),
                workdir,
                tag,
                palettes,
                generated: Mutex::new(BTreeSet::new()),
            }),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.inner.config
    }

    pub fn palettes(&self) -> &dyn PaletteCatalog {
        self.inner.palettes.as_ref()
    }

    pub fn workdir(&self) -> &PathBuf {
        &self.inner.workdir
    }

    pub fn next_id(&self) -> usize {
        self.inner.ids.next()
    }

    pub(crate) fn data_path(&self, id: usize) -> PathBuf {
        self.inner.workdir.join(format!("plot-{}-{}.dat", self.inner.tag, id))
    }

    pub(crate) fn script_path(&self, id: usize) -> PathBuf {
        self.inner.workdir.join(format!("canvas-{}-{}.plt", self.inner.tag, id))
    }

    fn generated(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.inner.generated.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Remember a file written for this session so cleanup can find it.
    pub(crate) fn track_file(&self, path: &Path) {
        self.generated().insert(path.to_path_buf());
    }

    /// Every tracked file, forgetting them. Files written again later are
    /// tracked again.
    pub(crate) fn take_generated_files(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.generated()).into_iter().collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.inner.config)
            .field("workdir", &self.inner.workdir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_clones() {
        let session = Session::default();
        let other = session.clone();
        let a = session.next_id();
        let b = other.next_id();
        let c = session.next_id();
        assert_eq!((a, b, c), (0, 1, 2));
    }

    #[test]
    fn test_paths_live_in_workdir() {
        let config = RenderConfig {
            workdir: Some(PathBuf::from("/tmp/plots")),
            ..RenderConfig::default()
        };
        let session = Session::new(config);
        let tag = &session.inner.tag;
        assert!(tag.starts_with(&format!("{}-", process::id())));
        assert_eq!(
            session.data_path(3),
            PathBuf::from(format!("/tmp/plots/plot-{}-3.dat", tag))
        );
        assert_eq!(
            session.script_path(4),
            PathBuf::from(format!("/tmp/plots/canvas-{}-4.plt", tag))
        );
    }

    #[test]
    fn test_sessions_sharing_a_workdir_get_distinct_names() {
        let config = RenderConfig {
            workdir: Some(PathBuf::from("/tmp/plots")),
            ..RenderConfig::default()
        };
        let a = Session::new(config.clone());
        let b = Session::new(config);
        assert_eq!((a.next_id(), b.next_id()), (0, 0));
        assert_ne!(a.data_path(0), b.data_path(0));
        assert_ne!(a.script_path(0), b.script_path(0));
    }

    #[test]
    fn test_generated_files_are_taken_once() {
        let session = Session::default();
        session.track_file(Path::new("b.dat"));
        session.track_file(Path::new("a.dat"));
        session.track_file(Path::new("a.dat"));
        assert_eq!(
            session.take_generated_files(),
            vec![PathBuf::from("a.dat"), PathBuf::from("b.dat")]
        );
        assert!(session.take_generated_files().is_empty());
    }
}
