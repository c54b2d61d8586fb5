use std::{collections::BTreeMap, time::Duration};

use zookeeper::{ZkError, ZkResult, ZooKeeper};

use super::{
    zk_data::{BrokerIdZNode, BrokerIdsZNode, LeaderAndIsr, TopicPartitionStateZNode, TopicZNode, TopicsZNode},
    zk_watcher::SessionWatcher,
};
use crate::{common::broker::BrokerInfo, core::err::ReassignResult};

/// Read-only view of the cluster metadata Kafka keeps in ZooKeeper.
pub struct KafkaZkClient {
    pub client: ZooKeeper,
}

impl KafkaZkClient {
    pub fn init(conn_str: &str, sess_timeout: Duration) -> ZkResult<KafkaZkClient> {
        let client = ZooKeeper::connect(conn_str, sess_timeout, SessionWatcher::init())?;
        Ok(KafkaZkClient { client })
    }

    // Broker
    pub fn get_all_broker_ids(&self) -> ZkResult<Vec<u32>> {
        let mut ids: Vec<u32> = self
            .get_children(&BrokerIdsZNode::path())?
            .iter()
            .filter_map(|id| id.parse::<u32>().ok())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    pub fn get_broker(&self, broker_id: u32) -> ReassignResult<Option<BrokerInfo>> {
        match self.get_data(&BrokerIdZNode::path(broker_id))? {
            Some(data) => Ok(Some(BrokerIdZNode::decode(broker_id, &data)?)),
            None => Ok(None),
        }
    }

    /// Brokers currently registered, by id. A broker that deregisters between
    /// the listing and the read is skipped.
    pub fn get_all_brokers(&self) -> ReassignResult<Vec<BrokerInfo>> {
        let mut brokers = Vec::new();
        for id in self.get_all_broker_ids()? {
            if let Some(info) = self.get_broker(id)? {
                brokers.push(info);
            }
        }
        Ok(brokers)
    }

    // Topic + Partition
    pub fn get_all_topics(&self) -> ZkResult<Vec<String>> {
        let mut topics = self.get_children(&TopicsZNode::path())?;
        topics.sort();
        Ok(topics)
    }

    pub fn get_topic_assignment(&self, topic: &str) -> ReassignResult<Option<BTreeMap<u32, Vec<u32>>>> {
        match self.get_data(&TopicZNode::path(topic))? {
            Some(data) => Ok(Some(TopicZNode::decode(topic, &data)?)),
            None => Ok(None),
        }
    }

    pub fn get_leader_and_isr(&self, topic: &str, partition: u32) -> ReassignResult<Option<LeaderAndIsr>> {
        match self.get_data(&TopicPartitionStateZNode::path(topic, partition))? {
            Some(data) => Ok(Some(TopicPartitionStateZNode::decode(topic, partition, &data)?)),
            None => Ok(None),
        }
    }

    fn get_children(&self, path: &str) -> ZkResult<Vec<String>> {
        match self.client.get_children(path, false) {
            Ok(children) => Ok(children),
            Err(ZkError::NoNode) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn get_data(&self, path: &str) -> ZkResult<Option<Vec<u8>>> {
        match self.client.get_data(path, false) {
            Ok((data, _stat)) => Ok(Some(data)),
            Err(ZkError::NoNode) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
