use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReassignError {
    // used when job parameters or flags are unusable
    #[error("invalid configuration: {0}")]
    Config(String),
    // used when the cluster metadata can't be listed or described
    #[error("cluster metadata error: {0}")]
    Admin(String),
    // used when a plan artifact can't be written
    #[error("failed to write \"{}\": {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    // used when the external tool can't be started
    #[error("failed to spawn \"{program}\": {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    // used when the external tool exits non-zero
    #[error("\"{program}\" exited with {}: {stderr}", status.map_or("signal".to_string(), |c| format!("code {}", c)))]
    ToolFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    // used when the generate output doesn't carry the expected plans
    #[error("unexpected generate output: {0}")]
    GenerateOutput(String),
    // used when a batch still has unfinished partitions after the last attempt
    #[error("batch {batch_id} did not complete: {failures}")]
    VerifyTimeout { batch_id: usize, failures: String },
    #[error("resumption file \"{}\": {reason}", path.display())]
    Resumption { path: PathBuf, reason: String },
    // used when a replica set can't be computed for the given inputs
    #[error("cannot place replicas: {0}")]
    Placement(String),
    // not a failure, the job paused and can be restarted
    #[error("stopped due to interrupt, migration of {} was completed", topic_list(completed))]
    Interrupted { completed: Vec<String> },
    // used when the signal listener can't be installed or joined
    #[error("signal listener: {0}")]
    Listener(String),
}

fn topic_list(topics: &[String]) -> String {
    if topics.is_empty() {
        "no topics".to_string()
    } else {
        topics.join(", ")
    }
}

impl ReassignError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ReassignError::Interrupted { .. })
    }
}

impl From<zookeeper::ZkError> for ReassignError {
    fn from(e: zookeeper::ZkError) -> Self {
        ReassignError::Admin(format!("zookeeper: {:?}", e))
    }
}

pub type ReassignResult<T> = Result<T, ReassignError>;

#[cfg(test)]
mod err_tests {
    use super::ReassignError;

    #[test]
    fn interrupted_names_topics() {
        let e = ReassignError::Interrupted {
            completed: vec!["t1".to_string(), "t2".to_string()],
        };
        assert!(e.is_interrupted());
        assert_eq!(
            e.to_string(),
            "stopped due to interrupt, migration of t1, t2 was completed"
        );
    }

    #[test]
    fn interrupted_before_any_batch() {
        let e = ReassignError::Interrupted { completed: vec![] };
        assert_eq!(
            e.to_string(),
            "stopped due to interrupt, migration of no topics was completed"
        );
    }

    #[test]
    fn tool_failed_status() {
        let e = ReassignError::ToolFailed {
            program: "tool".to_string(),
            status: Some(3),
            stderr: "boom".to_string(),
        };
        assert_eq!(e.to_string(), "\"tool\" exited with code 3: boom");
        assert!(!e.is_interrupted());
    }
}
