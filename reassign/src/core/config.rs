//! Defaults and the immutable parameters of one reassignment job.

use std::{path::PathBuf, time::Duration};

use super::err::{ReassignError, ReassignResult};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_PER_BATCH: u64 = 300; // s
pub const DEFAULT_POLL_INTERVAL: u64 = 10; // s
pub const DEFAULT_THROTTLE: u64 = 100_000_000; // bytes/s
pub const DEFAULT_ARTIFACT_DIR: &str = "/tmp";
pub const REASSIGN_TOOL: &str = "kafka-reassign-partitions.sh";
pub const ZK_SESSION_TIMEOUT: u64 = 10_000; // ms

#[derive(Clone, Debug)]
pub struct JobParameters {
    pub zookeeper: String,
    pub batch_size: usize,
    pub timeout_per_batch: Duration,
    pub poll_interval: Duration,
    pub throttle: u64,
    pub artifact_dir: PathBuf,
    pub tool: String,
    pub resumption_file: Option<PathBuf>,
}

impl JobParameters {
    pub fn init(zookeeper: &str) -> JobParameters {
        JobParameters {
            zookeeper: zookeeper.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_per_batch: Duration::from_secs(DEFAULT_TIMEOUT_PER_BATCH),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL),
            throttle: DEFAULT_THROTTLE,
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            tool: REASSIGN_TOOL.to_string(),
            resumption_file: None,
        }
    }

    pub fn validate(&self) -> ReassignResult<()> {
        if self.zookeeper.trim().is_empty() {
            return Err(ReassignError::Config("zookeeper hosts are required".to_string()));
        }
        if self.batch_size == 0 {
            return Err(ReassignError::Config("batch size must be at least 1".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(ReassignError::Config("poll interval must be positive".to_string()));
        }
        if self.timeout_per_batch.is_zero() {
            return Err(ReassignError::Config("timeout per batch must be positive".to_string()));
        }
        if self.throttle == 0 {
            return Err(ReassignError::Config("throttle must be positive".to_string()));
        }
        if self.tool.trim().is_empty() {
            return Err(ReassignError::Config("reassignment tool is required".to_string()));
        }
        Ok(())
    }
}
