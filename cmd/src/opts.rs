//! Flags and logging shared by the reassignment binaries.

use std::time::Duration;

use reassign::{JobParameters, ReassignError};
use structopt::StructOpt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = 2;

#[derive(StructOpt, Debug)]
pub struct JobOpts {
    /// Regex selecting the topics to operate on.
    #[structopt(long)]
    pub topics: String,
    /// ZooKeeper hosts of the cluster, e.g. `zk1:2181,zk2:2181/kafka`.
    #[structopt(long)]
    pub zookeeper: String,
    /// Number of topics moved per batch.
    #[structopt(long)]
    pub batch_size: Option<usize>,
    /// Seconds to wait for one batch to finish before giving up.
    #[structopt(long)]
    pub timeout_per_batch: Option<u64>,
    /// Seconds between verify attempts.
    #[structopt(long)]
    pub poll_interval: Option<u64>,
    /// Replication throttle in bytes/sec.
    #[structopt(long)]
    pub throttle: Option<u64>,
    /// Directory the per-batch plan files are written to.
    #[structopt(long)]
    pub artifact_dir: Option<std::path::PathBuf>,
    /// Path of the reassignment tool.
    #[structopt(long)]
    pub tool: Option<String>,
    /// Enable debug logging.
    #[structopt(short)]
    pub verbose: bool,
}

impl JobOpts {
    /// Job parameters with unset flags left at their defaults.
    pub fn params(&self) -> JobParameters {
        let mut params = JobParameters::init(&self.zookeeper);
        if let Some(batch_size) = self.batch_size {
            params.batch_size = batch_size;
        }
        if let Some(secs) = self.timeout_per_batch {
            params.timeout_per_batch = Duration::from_secs(secs);
        }
        if let Some(secs) = self.poll_interval {
            params.poll_interval = Duration::from_secs(secs);
        }
        if let Some(throttle) = self.throttle {
            params.throttle = throttle;
        }
        if let Some(dir) = &self.artifact_dir {
            params.artifact_dir = dir.clone();
        }
        if let Some(tool) = &self.tool {
            params.tool = tool.clone();
        }
        params
    }

    pub fn init_logging(&self) {
        let (filter, level) = match self.verbose {
            true => ("debug", LevelFilter::DEBUG),
            false => ("info", LevelFilter::INFO),
        };
        tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(fmt::layer().with_target(true))
            .with(level)
            .init();
    }
}

/// Logs the outcome of a job and maps it to a process exit code.
pub fn exit_code(res: anyhow::Result<()>) -> i32 {
    match res {
        Ok(()) => {
            tracing::info!("done");
            0
        }
        Err(err) => {
            let interrupted = err
                .downcast_ref::<ReassignError>()
                .map_or(false, |e| e.is_interrupted());
            if interrupted {
                tracing::warn!("{}", err);
                EXIT_INTERRUPTED
            } else {
                tracing::error!("{:#}", err);
                EXIT_FAILURE
            }
        }
    }
}
