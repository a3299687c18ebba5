mod errors;
mod storage;
mod types;

pub use errors::ProjectError;
pub use types::{Project, ShareOutcome, Task};

pub(crate) use storage::{ProjectStore, TaskStore};
