use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    common::broker::BrokerInfo,
    core::err::{ReassignError, ReassignResult},
};

/// Partition assignment stored on a topic znode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TopicAssignment {
    #[serde(default)]
    pub version: u32,
    pub partitions: BTreeMap<String, Vec<u32>>,
}

/// Partition state written by the controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderAndIsr {
    /// -1 while the partition is leaderless.
    pub leader: i32,
    pub isr: Vec<u32>,
    #[serde(default)]
    pub leader_epoch: i32,
    #[serde(default)]
    pub controller_epoch: i32,
}

impl LeaderAndIsr {
    pub fn leader(&self) -> Option<u32> {
        if self.leader < 0 {
            None
        } else {
            Some(self.leader as u32)
        }
    }
}

fn decode<'a, T: Deserialize<'a>>(path: &str, data: &'a [u8]) -> ReassignResult<T> {
    serde_json::from_slice(data)
        .map_err(|e| ReassignError::Admin(format!("malformed znode {}: {}", path, e)))
}

pub struct BrokersZNode {}
impl BrokersZNode {
    pub fn path() -> String {
        "/brokers".to_string()
    }
}

pub struct BrokerIdsZNode {}
impl BrokerIdsZNode {
    pub fn path() -> String {
        format!("{}/ids", BrokersZNode::path())
    }
}

pub struct BrokerIdZNode {}
impl BrokerIdZNode {
    pub fn path(id: u32) -> String {
        format!("{}/{}", BrokerIdsZNode::path(), id)
    }

    pub fn decode(id: u32, data: &[u8]) -> ReassignResult<BrokerInfo> {
        let mut info: BrokerInfo = decode(&BrokerIdZNode::path(id), data)?;
        info.id = id;
        Ok(info)
    }
}

pub struct TopicsZNode {}
impl TopicsZNode {
    pub fn path() -> String {
        format!("{}/topics", BrokersZNode::path())
    }
}

pub struct TopicZNode {}
impl TopicZNode {
    pub fn path(topic: &str) -> String {
        format!("{}/{}", TopicsZNode::path(), topic)
    }

    /// Replica sets keyed by partition id.
    pub fn decode(topic: &str, data: &[u8]) -> ReassignResult<BTreeMap<u32, Vec<u32>>> {
        let path = TopicZNode::path(topic);
        let assignment: TopicAssignment = decode(&path, data)?;
        let mut partitions = BTreeMap::new();
        for (id, replicas) in assignment.partitions {
            let id = id.parse::<u32>().map_err(|_| {
                ReassignError::Admin(format!("malformed znode {}: partition id \"{}\"", path, id))
            })?;
            partitions.insert(id, replicas);
        }
        Ok(partitions)
    }
}

pub struct TopicPartitionsZNode {}
impl TopicPartitionsZNode {
    pub fn path(topic: &str) -> String {
        format!("{}/partitions", TopicZNode::path(topic))
    }
}

pub struct TopicPartitionZNode {}
impl TopicPartitionZNode {
    pub fn path(topic: &str, partition: u32) -> String {
        format!("{}/{}", TopicPartitionsZNode::path(topic), partition)
    }
}

pub struct TopicPartitionStateZNode {}
impl TopicPartitionStateZNode {
    pub fn path(topic: &str, partition: u32) -> String {
        format!("{}/state", TopicPartitionZNode::path(topic, partition))
    }

    pub fn decode(topic: &str, partition: u32, data: &[u8]) -> ReassignResult<LeaderAndIsr> {
        decode(&TopicPartitionStateZNode::path(topic, partition), data)
    }
}
