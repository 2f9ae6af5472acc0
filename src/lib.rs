pub mod config;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod models;
pub mod service;
pub mod synth;
pub mod transport;

pub use crate::config::Config;
pub use crate::error::{ErrorKind, Operation, OperationError, ReplyDeskError, Result};
pub use crate::handlers::build_router;
pub use crate::service::ReplyDeskService;
