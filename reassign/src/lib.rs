pub mod admin;
pub mod common;
pub mod core;
pub mod launcher;
mod zk;

pub use crate::admin::{select_topics, ClusterAdmin, ZkAdmin};
pub use crate::core::config::JobParameters;
pub use crate::core::engine::ReassignmentEngine;
pub use crate::core::err::{ReassignError, ReassignResult};
pub use crate::launcher::{new_engine, new_zk_admin, run_interruptible};
pub use tokio_util::sync::CancellationToken;
