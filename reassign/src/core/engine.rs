//! Batched, resumable partition reassignment.
//!
//! Batches run strictly one after another. Cancellation is only looked at
//! before the first batch and after each batch is verified, so a batch that
//! started is never abandoned half-verified.

use std::{future::Future, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::common::topic_partition::{ReplicaPlan, TopicMetadata};

use super::{
    artifacts::{ArtifactKind, ArtifactStore},
    batch::{plan, Batch, BatchItem},
    config::JobParameters,
    err::{ReassignError, ReassignResult},
    placement::{plan_topic, LeaderRotation},
    poller::VerificationPoller,
    resumption::ResumptionRecord,
    status::parse_generate_output,
    tool::ReassignTool,
};

pub struct ReassignmentEngine {
    params: JobParameters,
    tool: Arc<dyn ReassignTool>,
    store: Arc<dyn ArtifactStore>,
    poller: VerificationPoller,
}

impl ReassignmentEngine {
    pub fn init(
        params: JobParameters,
        tool: Arc<dyn ReassignTool>,
        store: Arc<dyn ArtifactStore>,
    ) -> ReassignResult<ReassignmentEngine> {
        params.validate()?;
        let poller = VerificationPoller::init(
            tool.clone(),
            params.poll_interval,
            params.timeout_per_batch,
        );
        Ok(ReassignmentEngine {
            params,
            tool,
            store,
            poller,
        })
    }

    /// Moves `topics` onto the tool's broker list, letting the tool propose
    /// the placement for each batch.
    pub async fn reassign_partitions(
        &self,
        topics: Vec<String>,
        cancel: &CancellationToken,
    ) -> ReassignResult<()> {
        self.run_batches(topics, cancel, move |batch| self.generate_and_execute(batch))
            .await
    }

    /// Raises every partition of `topics` to `replication_factor` replicas,
    /// keeping the current leader and placing followers deterministically.
    pub async fn increase_replication(
        &self,
        topics: Vec<TopicMetadata>,
        replication_factor: u32,
        broker_count: u32,
        cancel: &CancellationToken,
    ) -> ReassignResult<()> {
        let mut rotation = LeaderRotation::init();
        self.run_batches(topics, cancel, move |batch| {
            let plans = computed_plans(&batch, replication_factor, broker_count, &mut rotation);
            self.write_and_execute(batch.id, plans)
        })
        .await
    }

    async fn run_batches<I, F, Fut>(
        &self,
        items: Vec<I>,
        cancel: &CancellationToken,
        mut prepare: F,
    ) -> ReassignResult<()>
    where
        I: BatchItem,
        F: FnMut(Batch<I>) -> Fut,
        Fut: Future<Output = ReassignResult<()>>,
    {
        let mut resumption = match &self.params.resumption_file {
            Some(path) => Some(ResumptionRecord::load(path)?),
            None => None,
        };
        let items = match &resumption {
            Some(record) => record.retain_pending(items),
            None => items,
        };

        let batches = plan(items, self.params.batch_size);
        let total = batches.len();
        if total == 0 {
            tracing::info!("no topics left to reassign");
        }

        if total > 0 && cancel.is_cancelled() {
            return Err(ReassignError::Interrupted { completed: Vec::new() });
        }

        for batch in batches {

            let batch_id = batch.id;
            let topics = batch.topics();
            tracing::info!(batch = batch_id, total, topics = ?topics, "starting batch");

            prepare(batch).await?;
            self.poller.poll_until_done(batch_id).await?;

            if let Some(record) = resumption.as_mut() {
                record.record(&topics)?;
            }
            tracing::info!(batch = batch_id, total, "batch complete");

            // observed only once the batch is verified, the last one included
            if cancel.is_cancelled() {
                return Err(ReassignError::Interrupted { completed: topics });
            }
        }

        if let Some(record) = resumption {
            record.clear()?;
        }
        Ok(())
    }

    async fn generate_and_execute(&self, batch: Batch<String>) -> ReassignResult<()> {
        self.store.write_topics_to_move(batch.id, &batch.items)?;
        let output = self.tool.generate(batch.id).await?;
        let generated = parse_generate_output(&output)?;
        self.store.write_generated(batch.id, &generated)?;
        self.tool.execute(batch.id).await?;
        Ok(())
    }

    async fn write_and_execute(
        &self,
        batch_id: usize,
        plans: ReassignResult<(ReplicaPlan, ReplicaPlan)>,
    ) -> ReassignResult<()> {
        let (target, rollback) = plans?;
        self.store.write_plan(ArtifactKind::Rollback, batch_id, &rollback)?;
        self.store.write_plan(ArtifactKind::Reassignment, batch_id, &target)?;
        self.tool.execute(batch_id).await?;
        Ok(())
    }
}

/// Target and rollback plans for one replication-increase batch.
fn computed_plans(
    batch: &Batch<TopicMetadata>,
    replication_factor: u32,
    broker_count: u32,
    rotation: &mut LeaderRotation,
) -> ReassignResult<(ReplicaPlan, ReplicaPlan)> {
    let mut target = Vec::new();
    let mut rollback = Vec::new();
    for topic in &batch.items {
        target.extend(plan_topic(topic, replication_factor, broker_count, rotation)?);
        rollback.extend(topic.current_plan());
    }
    Ok((ReplicaPlan::init(target), ReplicaPlan::init(rollback)))
}
