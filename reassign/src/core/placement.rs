//! Deterministic replica placement for replication-factor increases.
//!
//! Brokers are assumed to be numbered `1..=broker_count`. Every partition
//! keeps its current leader at index 0; followers are taken from the brokers
//! that follow the leader in id order, shifted by how many partitions with
//! the same leader have already been placed, so partitions that share a
//! leader get different follower sets.

use std::collections::HashMap;

use crate::common::topic_partition::{PartitionReplicas, TopicMetadata};

use super::err::{ReassignError, ReassignResult};

/// How many replica sets have been built per leader during one run.
#[derive(Default, Debug, Clone)]
pub struct LeaderRotation {
    counts: HashMap<u32, u32>,
}

impl LeaderRotation {
    pub fn init() -> LeaderRotation {
        LeaderRotation::default()
    }

    pub fn count(&self, leader: u32) -> u32 {
        self.counts.get(&leader).copied().unwrap_or(0)
    }

    fn advance(&mut self, leader: u32) {
        *self.counts.entry(leader).or_insert(0) += 1;
    }
}

/// Builds the replica set for one partition and advances the leader's rotation.
pub fn build_replica_set(
    leader: u32,
    replication_factor: u32,
    broker_count: u32,
    rotation: &mut LeaderRotation,
) -> ReassignResult<Vec<u32>> {
    if replication_factor == 0 {
        return Err(ReassignError::Placement(
            "replication factor must be at least 1".to_string(),
        ));
    }
    if broker_count < replication_factor {
        return Err(ReassignError::Placement(format!(
            "replication factor {} exceeds broker count {}",
            replication_factor, broker_count
        )));
    }
    if leader == 0 || leader > broker_count {
        return Err(ReassignError::Placement(format!(
            "leader {} is outside brokers 1..={}",
            leader, broker_count
        )));
    }

    let n = broker_count as u64;
    let base = leader as u64 + (replication_factor as u64 - 1) * rotation.count(leader) as u64;
    let mut replicas = Vec::with_capacity(replication_factor as usize);
    replicas.push(leader);

    let mut skip = 0u64;
    let mut i = 1u64;
    while replicas.len() < replication_factor as usize {
        let candidate = match (base + i + skip) % n {
            0 => broker_count,
            c => c as u32,
        };
        // retry the same slot one broker further on
        if candidate == leader || replicas.contains(&candidate) {
            skip += 1;
            continue;
        }
        replicas.push(candidate);
        i += 1;
    }

    rotation.advance(leader);
    Ok(replicas)
}

/// Target plan entries for every partition of `topic`.
pub fn plan_topic(
    topic: &TopicMetadata,
    replication_factor: u32,
    broker_count: u32,
    rotation: &mut LeaderRotation,
) -> ReassignResult<Vec<PartitionReplicas>> {
    let mut partitions = Vec::with_capacity(topic.partitions.len());
    for partition in &topic.partitions {
        let leader = partition.leader.ok_or_else(|| {
            ReassignError::Placement(format!(
                "partition {}-{} has no leader",
                topic.name, partition.id
            ))
        })?;
        let replicas = build_replica_set(leader, replication_factor, broker_count, rotation)?;
        partitions.push(PartitionReplicas::init(&topic.name, partition.id, replicas));
    }
    Ok(partitions)
}
