//! Cluster metadata needed to select and describe topics for a job.

use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use regex::Regex;

use crate::{
    common::{
        broker::BrokerInfo,
        topic_partition::{PartitionMetadata, TopicMetadata},
    },
    core::err::{ReassignError, ReassignResult},
    zk::{zk_client::KafkaZkClient, zk_data::LeaderAndIsr},
};

#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    async fn list_topics(&self) -> ReassignResult<Vec<String>>;
    async fn describe_topics(&self, topics: &[String]) -> ReassignResult<Vec<TopicMetadata>>;
    async fn list_brokers(&self) -> ReassignResult<Vec<BrokerInfo>>;
}

pub struct ZkAdmin {
    zk_client: KafkaZkClient,
}

impl ZkAdmin {
    pub fn connect(zookeeper: &str, sess_timeout: Duration) -> ReassignResult<ZkAdmin> {
        let zk_client = KafkaZkClient::init(zookeeper, sess_timeout).map_err(|e| {
            ReassignError::Admin(format!("failed to connect to {}: {:?}", zookeeper, e))
        })?;
        Ok(ZkAdmin { zk_client })
    }
}

#[async_trait]
impl ClusterAdmin for ZkAdmin {
    async fn list_topics(&self) -> ReassignResult<Vec<String>> {
        Ok(self.zk_client.get_all_topics()?)
    }

    async fn describe_topics(&self, topics: &[String]) -> ReassignResult<Vec<TopicMetadata>> {
        let live: HashSet<u32> = self.zk_client.get_all_broker_ids()?.into_iter().collect();
        let mut described = Vec::with_capacity(topics.len());
        for topic in topics {
            let assignment = self
                .zk_client
                .get_topic_assignment(topic)?
                .ok_or_else(|| ReassignError::Admin(format!("topic {} doesn't exist", topic)))?;
            let mut partitions = Vec::with_capacity(assignment.len());
            for (id, replicas) in assignment {
                let state = self.zk_client.get_leader_and_isr(topic, id)?;
                partitions.push(partition_metadata(id, replicas, state, &live));
            }
            described.push(TopicMetadata {
                name: topic.clone(),
                partitions,
            });
        }
        Ok(described)
    }

    async fn list_brokers(&self) -> ReassignResult<Vec<BrokerInfo>> {
        self.zk_client.get_all_brokers()
    }
}

/// Combines a partition's assignment with its controller state. Replicas on
/// brokers that aren't registered are reported offline.
pub fn partition_metadata(
    id: u32,
    replicas: Vec<u32>,
    state: Option<LeaderAndIsr>,
    live: &HashSet<u32>,
) -> PartitionMetadata {
    let offline_replicas = replicas.iter().copied().filter(|r| !live.contains(r)).collect();
    let (leader, isr) = match state {
        Some(state) => (state.leader(), state.isr),
        None => (None, Vec::new()),
    };
    PartitionMetadata {
        id,
        leader,
        replicas,
        isr,
        offline_replicas,
    }
}

/// Topics whose name matches `pattern`, sorted.
pub fn select_topics(topics: Vec<String>, pattern: &Regex) -> Vec<String> {
    let mut selected: Vec<String> = topics.into_iter().filter(|t| pattern.is_match(t)).collect();
    selected.sort();
    selected
}

#[cfg(test)]
mod admin_tests {
    use std::collections::HashSet;

    use regex::Regex;

    use crate::zk::zk_data::LeaderAndIsr;

    use super::{partition_metadata, select_topics};

    #[test]
    fn select_by_regex() {
        let topics = vec![
            "orders.v2".to_string(),
            "audit".to_string(),
            "orders.v1".to_string(),
        ];
        let pattern = Regex::new("^orders\\.").unwrap();
        assert_eq!(
            select_topics(topics, &pattern),
            vec!["orders.v1".to_string(), "orders.v2".to_string()]
        );
    }

    #[test]
    fn offline_replicas() {
        let live: HashSet<u32> = vec![1, 2].into_iter().collect();
        let state = LeaderAndIsr {
            leader: 2,
            isr: vec![2],
            leader_epoch: 3,
            controller_epoch: 1,
        };
        let partition = partition_metadata(4, vec![2, 3, 1], Some(state), &live);
        assert_eq!(partition.id, 4);
        assert_eq!(partition.leader, Some(2));
        assert_eq!(partition.isr, vec![2]);
        assert_eq!(partition.offline_replicas, vec![3]);
    }

    #[test]
    fn missing_state_is_leaderless() {
        let live: HashSet<u32> = vec![1].into_iter().collect();
        let partition = partition_metadata(0, vec![1], None, &live);
        assert_eq!(partition.leader, None);
        assert!(partition.isr.is_empty());
    }
}
