pub mod zk_client;
pub mod zk_data;
pub mod zk_watcher;
