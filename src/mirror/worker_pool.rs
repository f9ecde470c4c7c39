//! # Worker Pool Module
//!
//! Questo modulo distribuisce i task su un numero fisso di worker concorrenti.
//!
//! ## Responsabilità:
//! - Consuma l'intero stream di task dal walker
//! - Dispatch di ogni task esattamente una volta a esattamente un worker,
//!   con al massimo `workers` worker attivi contemporaneamente
//! - Barriera di join: ogni task dispatchato produce un outcome prima che
//!   il pool dichiari la fine
//! - Il fallimento di un singolo task diventa un `TaskOutcome::Failed`,
//!   non cancella i sibling, non restringe il pool, non termina il run
//!
//! ## Backpressure:
//! Il permesso del semaforo viene acquisito PRIMA dello spawn: quando tutti
//! i worker sono occupati il consumo del canale dei task si ferma e il
//! walker si blocca sul canale bounded.
//!
//! I worker sono stateless e intercambiabili: nessun ordering tra dispatch
//! e completamento.

use crate::error::MirrorError;
use crate::processor::ItemProcessor;
use crate::task::{Task, TaskOutcome};
use anyhow::Result;
use futures::future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::error;

/// Fixed-size pool of interchangeable workers draining the task stream.
pub struct WorkerPool {
    processor: Arc<ItemProcessor>,
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(processor: ItemProcessor, workers: usize) -> Self {
        Self {
            processor: Arc::new(processor),
            semaphore: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Consume the full task stream and emit one outcome per task. Returns
    /// only after every dispatched task has reported.
    pub async fn run(
        self,
        mut tasks: mpsc::Receiver<Task>,
        outcomes: mpsc::UnboundedSender<TaskOutcome>,
    ) -> Result<()> {
        let mut handles = Vec::new();

        while let Some(task) = tasks.recv().await {
            // Acquire before spawning: at most `workers` tasks in flight,
            // and the bounded task channel pushes back on the walker
            let permit = self.semaphore.clone().acquire_owned().await?;
            let processor = Arc::clone(&self.processor);
            let outcomes = outcomes.clone();
            let source_path = task.source.path.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;

                let outcome =
                    match tokio::task::spawn_blocking(move || processor.process(task)).await {
                        Ok(outcome) => outcome,
                        Err(join_error) => {
                            // A panicking worker still yields an outcome for
                            // its task, the rest of the pool keeps going
                            error!(
                                "worker failed for {}: {}",
                                source_path.display(),
                                join_error
                            );
                            TaskOutcome::failed(
                                source_path,
                                MirrorError::Worker(join_error.to_string()),
                            )
                        }
                    };

                let _ = outcomes.send(outcome);
            }));
        }

        // Join barrier over all dispatched work
        for result in future::join_all(handles).await {
            if let Err(join_error) = result {
                error!("worker task lost: {}", join_error);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resize::ResizeBound;
    use crate::task::{classify, SourceFile};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn opaque_task(source: &Path, dest: &Path) -> Task {
        Task {
            source: SourceFile {
                path: source.to_path_buf(),
                relative_path: PathBuf::from(source.file_name().unwrap()),
                size: fs::metadata(source).map(|m| m.len()).unwrap_or(0),
                timestamps: None,
                kind: classify(source),
            },
            dest_path: dest.to_path_buf(),
            bound: ResizeBound::default(),
        }
    }

    async fn run_pool(tasks: Vec<Task>, workers: usize) -> Vec<TaskOutcome> {
        let pool = WorkerPool::new(ItemProcessor::new(&Config::default()), workers);
        let (task_tx, task_rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

        let pool_handle = tokio::spawn(pool.run(task_rx, outcome_tx));
        for task in tasks {
            task_tx.send(task).await.unwrap();
        }
        drop(task_tx);

        let mut outcomes = Vec::new();
        while let Some(outcome) = outcome_rx.recv().await {
            outcomes.push(outcome);
        }
        pool_handle.await.unwrap().unwrap();
        outcomes
    }

    #[tokio::test]
    async fn test_every_task_yields_exactly_one_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let mut tasks = Vec::new();
        for i in 0..20 {
            let source = temp_dir.path().join(format!("file_{i}.txt"));
            fs::write(&source, format!("content {i}")).unwrap();
            tasks.push(opaque_task(
                &source,
                &temp_dir.path().join(format!("out_{i}.txt")),
            ));
        }

        let outcomes = run_pool(tasks, 4).await;
        assert_eq!(outcomes.len(), 20);
        assert!(outcomes.iter().all(|o| o.is_success()));
    }

    #[tokio::test]
    async fn test_outcome_count_is_stable_across_concurrency() {
        let temp_dir = TempDir::new().unwrap();
        let mut sources = Vec::new();
        for i in 0..12 {
            let source = temp_dir.path().join(format!("file_{i}.txt"));
            fs::write(&source, b"same").unwrap();
            sources.push(source);
        }

        for workers in [1, 2, 8, 64] {
            let out_dir = TempDir::new().unwrap();
            let tasks: Vec<Task> = sources
                .iter()
                .enumerate()
                .map(|(i, s)| opaque_task(s, &out_dir.path().join(format!("o_{i}.txt"))))
                .collect();
            let outcomes = run_pool(tasks, workers).await;
            assert_eq!(outcomes.len(), 12, "workers = {workers}");
            assert!(outcomes.iter().all(|o| o.is_success()));
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_cancel_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let mut tasks = Vec::new();
        for i in 0..5 {
            let source = temp_dir.path().join(format!("ok_{i}.txt"));
            fs::write(&source, b"fine").unwrap();
            tasks.push(opaque_task(
                &source,
                &temp_dir.path().join(format!("ok_out_{i}.txt")),
            ));
        }
        // A task whose source does not exist fails inside the processor
        tasks.push(opaque_task(
            &temp_dir.path().join("missing.txt"),
            &temp_dir.path().join("missing_out.txt"),
        ));

        let outcomes = run_pool(tasks, 3).await;
        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 5);
        assert_eq!(outcomes.iter().filter(|o| !o.is_success()).count(), 1);
    }
}
