//! # Tree Walker Module
//!
//! Questo modulo enumera ricorsivamente l'albero sorgente e genera i task.
//!
//! ## Responsabilità:
//! - Scansione ricorsiva della directory sorgente con `walkdir`
//! - Creazione eager e idempotente delle directory di destinazione, PRIMA
//!   di emettere qualsiasi task per i file che contengono
//! - Costruzione di un `SourceFile` per ogni file regolare e invio di
//!   esattamente un `Task` nel canale dello scheduler
//! - Gli errori di traversal (symlink, subtree senza permessi) vengono
//!   loggati e skippati, la scansione non si interrompe mai
//!
//! ## Ordinamento:
//! L'ordine tra sibling è quello nativo del filesystem, nessun test deve
//! assumerne uno specifico. L'unico ordine garantito è che la directory di
//! destinazione di un file esiste prima che il suo task venga emesso.
//!
//! Le directory sorgente vuote vengono comunque rispecchiate nella
//! destinazione.

use crate::error::MirrorError;
use crate::metadata::MetadataPreserver;
use crate::mirror::path_resolver::PathResolver;
use crate::resize::ResizeBound;
use crate::task::{classify, SourceFile, Task};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Streams the source tree as tasks while mirroring its directory
/// structure into the destination root.
pub struct TreeWalker {
    source_root: PathBuf,
    dest_root: PathBuf,
    bound: ResizeBound,
}

impl TreeWalker {
    pub fn new(source_root: &Path, dest_root: &Path, bound: ResizeBound) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            bound,
        }
    }

    /// Walk the source tree, sending one task per discovered file. Blocking:
    /// run on a blocking task. Returns the number of tasks emitted.
    pub fn walk(&self, tasks: mpsc::Sender<Task>) -> Result<usize, MirrorError> {
        fs::create_dir_all(&self.dest_root)?;

        let mut discovered = 0;

        for entry in WalkDir::new(&self.source_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                // Eager mirror, before any file task from this directory
                if let Err(e) = self.mirror_directory(entry.path()) {
                    warn!("cannot mirror directory {}: {}", entry.path().display(), e);
                }
            } else if file_type.is_file() {
                match self.make_task(&entry) {
                    Ok(task) => {
                        discovered += 1;
                        if tasks.blocking_send(task).is_err() {
                            // Scheduler is gone, nothing left to feed
                            break;
                        }
                    }
                    Err(e) => warn!("skipping {}: {}", entry.path().display(), e),
                }
            } else {
                // Symlinks and other non-regular entries are not mirrored
                debug!("skipping non-regular entry: {}", entry.path().display());
            }
        }

        Ok(discovered)
    }

    fn mirror_directory(&self, source_dir: &Path) -> Result<(), MirrorError> {
        let dest_dir = PathResolver::resolve(source_dir, &self.source_root, &self.dest_root)?;
        fs::create_dir_all(&dest_dir)?;
        Ok(())
    }

    fn make_task(&self, entry: &DirEntry) -> Result<Task, MirrorError> {
        let path = entry.path();
        let relative_path = PathResolver::relative_to(path, &self.source_root)?.to_path_buf();
        let dest_path = self.dest_root.join(&relative_path);

        // Stat failures do not drop the file: the worker surfaces the real
        // error as this item's outcome
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                debug!("cannot stat {}: {}", path.display(), e);
                0
            }
        };
        let timestamps = MetadataPreserver::read_timestamps(path).ok();

        Ok(Task {
            source: SourceFile {
                path: path.to_path_buf(),
                relative_path,
                size,
                timestamps,
                kind: classify(path),
            },
            dest_path,
            bound: self.bound,
        })
    }
}
