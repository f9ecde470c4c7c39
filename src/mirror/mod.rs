//! # Mirror Module
//!
//! Modulo che separa le responsabilità della pipeline in sottomoduli:
//! - `tree_mirror`: Orchestratore principale del run
//! - `walker`: Discovery ricorsiva e generazione task
//! - `worker_pool`: Dispatch bounded e barriera di join
//! - `path_resolver`: Logica di rimappatura path centralizzata

pub mod path_resolver;
pub mod tree_mirror;
pub mod walker;
pub mod worker_pool;

// Re-export delle struct principali
pub use path_resolver::PathResolver;
pub use tree_mirror::TreeMirror;
pub use walker::TreeWalker;
pub use worker_pool::WorkerPool;
