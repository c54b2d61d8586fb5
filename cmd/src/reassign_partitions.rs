mod opts;

use anyhow::{Context, Result};
use reassign::{new_engine, new_zk_admin, run_interruptible, select_topics, ClusterAdmin};
use regex::Regex;
use structopt::StructOpt;

use opts::{exit_code, JobOpts};

/// Moves the partitions of the selected topics onto a set of brokers, batch
/// by batch, using kafka-reassign-partitions.
#[derive(StructOpt, Debug)]
#[structopt(name = "reassign_partitions")]
struct ReassignPartitions {
    #[structopt(flatten)]
    job: JobOpts,
    /// Target broker ids, comma separated.
    #[structopt(long, use_delimiter = true, required = true)]
    broker_ids: Vec<u32>,
    /// File recording completed topics; rerun with the same path to resume.
    #[structopt(long)]
    resumption_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() {
    let opts = ReassignPartitions::from_args();
    opts.job.init_logging();
    std::process::exit(exit_code(run(opts).await));
}

async fn run(opts: ReassignPartitions) -> Result<()> {
    let pattern = Regex::new(&opts.job.topics).context("error parsing --topics regex")?;
    let mut params = opts.job.params();
    params.resumption_file = opts.resumption_file.clone();
    params.validate()?;

    let admin = new_zk_admin(&params.zookeeper)?;
    let topics = select_topics(admin.list_topics().await?, &pattern);
    tracing::info!(count = topics.len(), "selected topics for reassignment");

    let engine = new_engine(params, opts.broker_ids.clone())?;
    run_interruptible(|cancel| async move { engine.reassign_partitions(topics, &cancel).await })
        .await
        .context("error reassigning partitions")?;
    Ok(())
}
