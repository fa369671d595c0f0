//! Library crate for the tidyboard CLI: board state, store clients, and
//! terminal rendering live here. The binary only parses args and dispatches.

pub mod board;
pub mod config;
pub mod errors;
pub mod model;
pub mod store;
pub mod ui;

pub use board::{Board, BoardSnapshot};
pub use errors::StoreError;
pub use model::{BoardColumn, NewTask, Priority, Task, TaskPatch, TaskStatus};
pub use store::{
    ChangeFeed, ChangeKind, EventFilter, MemoryStore, RestStore, TableStore, TaskStore,
};
