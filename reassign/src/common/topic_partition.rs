use serde::{Deserialize, Serialize};

pub const PLAN_VERSION: u32 = 1;

/// One entry of a reassignment document. Field order is the on-disk key order.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct PartitionReplicas {
    pub topic: String,
    pub partition: u32,
    /// Index 0 is the intended leader.
    pub replicas: Vec<u32>,
}

impl PartitionReplicas {
    pub fn init(topic: &str, partition: u32, replicas: Vec<u32>) -> PartitionReplicas {
        PartitionReplicas {
            topic: topic.to_string(),
            partition,
            replicas,
        }
    }
}

/// The `{"version": 1, "partitions": [...]}` document consumed by the
/// reassignment tool for both the target and the rollback plan.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct ReplicaPlan {
    pub version: u32,
    pub partitions: Vec<PartitionReplicas>,
}

impl ReplicaPlan {
    pub fn init(partitions: Vec<PartitionReplicas>) -> ReplicaPlan {
        ReplicaPlan {
            version: PLAN_VERSION,
            partitions,
        }
    }
}

#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct TopicEntry {
    pub topic: String,
}

/// Input document for the generate phase.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct TopicsToMove {
    pub version: u32,
    pub topics: Vec<TopicEntry>,
}

impl TopicsToMove {
    pub fn init(topics: &[String]) -> TopicsToMove {
        TopicsToMove {
            version: PLAN_VERSION,
            topics: topics
                .iter()
                .map(|topic| TopicEntry {
                    topic: topic.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionMetadata {
    pub id: u32,
    /// `None` when the partition currently has no leader.
    pub leader: Option<u32>,
    pub replicas: Vec<u32>,
    pub isr: Vec<u32>,
    pub offline_replicas: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicMetadata {
    pub name: String,
    pub partitions: Vec<PartitionMetadata>,
}

impl TopicMetadata {
    /// The replica sets the topic has right now, as a plan that would restore them.
    pub fn current_plan(&self) -> Vec<PartitionReplicas> {
        self.partitions
            .iter()
            .map(|p| PartitionReplicas::init(&self.name, p.id, p.replicas.clone()))
            .collect()
    }
}

#[cfg(test)]
mod plan_format_tests {
    use super::{PartitionReplicas, ReplicaPlan, TopicsToMove};

    #[test]
    fn plan_key_order() {
        let plan = ReplicaPlan::init(vec![PartitionReplicas::init("t1", 0, vec![6, 1, 2])]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            json,
            r#"{"version":1,"partitions":[{"topic":"t1","partition":0,"replicas":[6,1,2]}]}"#
        );
    }

    #[test]
    fn plan_ignores_log_dirs() {
        let json = r#"{"version":1,"partitions":[{"topic":"t1","partition":3,"replicas":[1,2],"log_dirs":["any","any"]}]}"#;
        let plan: ReplicaPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.partitions[0], PartitionReplicas::init("t1", 3, vec![1, 2]));
    }

    #[test]
    fn topics_to_move_format() {
        let doc = TopicsToMove::init(&["a".to_string(), "b".to_string()]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"version":1,"topics":[{"topic":"a"},{"topic":"b"}]}"#);
    }
}
