mod opts;

use anyhow::{bail, Context, Result};
use reassign::{new_engine, new_zk_admin, run_interruptible, select_topics, ClusterAdmin};
use regex::Regex;
use structopt::StructOpt;

use opts::{exit_code, JobOpts};

/// Raises the replication factor of the selected topics, keeping each
/// partition's current leader.
#[derive(StructOpt, Debug)]
#[structopt(name = "increase_replication")]
struct IncreaseReplication {
    #[structopt(flatten)]
    job: JobOpts,
    /// Desired replication factor.
    #[structopt(long)]
    replication_factor: u32,
    /// Number of brokers, numbered from 1. Defaults to the live broker count.
    #[structopt(long)]
    broker_count: Option<u32>,
}

#[tokio::main]
async fn main() {
    let opts = IncreaseReplication::from_args();
    opts.job.init_logging();
    std::process::exit(exit_code(run(opts).await));
}

async fn run(opts: IncreaseReplication) -> Result<()> {
    let pattern = Regex::new(&opts.job.topics).context("error parsing --topics regex")?;
    let params = opts.job.params();
    params.validate()?;

    let admin = new_zk_admin(&params.zookeeper)?;
    let brokers = admin.list_brokers().await?;
    for broker in &brokers {
        tracing::debug!(id = broker.id, addr = %broker.addr(), rack = ?broker.rack, "live broker");
    }
    let broker_count = opts.broker_count.unwrap_or(brokers.len() as u32);
    if broker_count < opts.replication_factor {
        bail!(
            "replication factor {} needs at least that many brokers, have {}",
            opts.replication_factor,
            broker_count
        );
    }

    let topics = select_topics(admin.list_topics().await?, &pattern);
    let metadata = admin.describe_topics(&topics).await?;
    tracing::info!(
        count = metadata.len(),
        replication_factor = opts.replication_factor,
        broker_count,
        "selected topics for replication increase"
    );

    let engine = new_engine(params, brokers.iter().map(|b| b.id).collect())?;
    let replication_factor = opts.replication_factor;
    run_interruptible(|cancel| async move {
        engine
            .increase_replication(metadata, replication_factor, broker_count, &cancel)
            .await
    })
    .await
    .context("error increasing replication")?;
    Ok(())
}
