pub mod broker;
pub mod topic_partition;
