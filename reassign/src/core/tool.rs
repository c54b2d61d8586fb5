//! Invocation of the external partition reassignment executable.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{
    artifacts::{ArtifactKind, ArtifactPaths},
    err::{ReassignError, ReassignResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Builds the three tool invocations for a job. Artifact paths are derived
/// from the batch id, so generate/execute/verify of one batch agree on them.
#[derive(Debug, Clone)]
pub struct ReassignCommands {
    program: String,
    zookeeper: String,
    paths: ArtifactPaths,
}

impl ReassignCommands {
    pub fn init(program: &str, zookeeper: &str, paths: ArtifactPaths) -> ReassignCommands {
        ReassignCommands {
            program: program.to_string(),
            zookeeper: zookeeper.to_string(),
            paths,
        }
    }

    pub fn generate(&self, broker_list: &[u32], batch_id: usize) -> ToolCommand {
        let brokers = broker_list
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<String>>()
            .join(",");
        self.command(vec![
            "--broker-list".to_string(),
            brokers,
            "--topics-to-move-json-file".to_string(),
            self.path_arg(ArtifactKind::TopicsToMove, batch_id),
            "--generate".to_string(),
        ])
    }

    pub fn execute(&self, batch_id: usize, throttle: u64) -> ToolCommand {
        self.command(vec![
            "--reassignment-json-file".to_string(),
            self.path_arg(ArtifactKind::Reassignment, batch_id),
            "--throttle".to_string(),
            throttle.to_string(),
            "--execute".to_string(),
        ])
    }

    pub fn verify(&self, batch_id: usize) -> ToolCommand {
        self.command(vec![
            "--reassignment-json-file".to_string(),
            self.path_arg(ArtifactKind::Reassignment, batch_id),
            "--verify".to_string(),
        ])
    }

    fn command(&self, rest: Vec<String>) -> ToolCommand {
        let mut args = vec!["--zookeeper".to_string(), self.zookeeper.clone()];
        args.extend(rest);
        ToolCommand {
            program: self.program.clone(),
            args,
        }
    }

    fn path_arg(&self, kind: ArtifactKind, batch_id: usize) -> String {
        self.paths.path(kind, batch_id).to_string_lossy().into_owned()
    }
}

/// Runs `command` to completion and returns its stdout. Stdin is forwarded;
/// stderr is only surfaced on failure.
pub async fn run(command: &ToolCommand) -> ReassignResult<String> {
    tracing::debug!(program = %command.program, args = ?command.args, "running reassignment tool");
    let output = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| ReassignError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(ReassignError::ToolFailed {
            program: command.program.clone(),
            status: output.status.code(),
            stderr,
        });
    }
    if !stderr.is_empty() {
        tracing::debug!(program = %command.program, %stderr, "reassignment tool stderr");
    }
    Ok(stdout)
}

/// The generate/execute/verify protocol of one job, keyed by batch id.
#[async_trait]
pub trait ReassignTool: Send + Sync {
    async fn generate(&self, batch_id: usize) -> ReassignResult<String>;
    async fn execute(&self, batch_id: usize) -> ReassignResult<String>;
    async fn verify(&self, batch_id: usize) -> ReassignResult<String>;
}

pub struct KafkaReassignTool {
    commands: ReassignCommands,
    broker_list: Vec<u32>,
    throttle: u64,
}

impl KafkaReassignTool {
    pub fn init(commands: ReassignCommands, broker_list: Vec<u32>, throttle: u64) -> KafkaReassignTool {
        KafkaReassignTool {
            commands,
            broker_list,
            throttle,
        }
    }
}

#[async_trait]
impl ReassignTool for KafkaReassignTool {
    async fn generate(&self, batch_id: usize) -> ReassignResult<String> {
        run(&self.commands.generate(&self.broker_list, batch_id)).await
    }

    async fn execute(&self, batch_id: usize) -> ReassignResult<String> {
        run(&self.commands.execute(batch_id, self.throttle)).await
    }

    async fn verify(&self, batch_id: usize) -> ReassignResult<String> {
        run(&self.commands.verify(batch_id)).await
    }
}

#[cfg(test)]
mod tool_tests {
    use std::path::Path;

    use crate::core::{artifacts::ArtifactPaths, err::ReassignError};

    use super::{run, ReassignCommands, ToolCommand};

    fn commands() -> ReassignCommands {
        ReassignCommands::init(
            "kafka-reassign-partitions.sh",
            "zk1:2181,zk2:2181",
            ArtifactPaths::init(Path::new("/tmp/job")),
        )
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn generate_command() {
        let cmd = commands().generate(&[1, 2, 3], 4);
        assert_eq!(cmd.program, "kafka-reassign-partitions.sh");
        assert_eq!(
            cmd.args,
            args(&[
                "--zookeeper",
                "zk1:2181,zk2:2181",
                "--broker-list",
                "1,2,3",
                "--topics-to-move-json-file",
                "/tmp/job/topics-to-move-4.json",
                "--generate",
            ])
        );
    }

    #[test]
    fn execute_command() {
        let cmd = commands().execute(0, 100000);
        assert_eq!(
            cmd.args,
            args(&[
                "--zookeeper",
                "zk1:2181,zk2:2181",
                "--reassignment-json-file",
                "/tmp/job/reassignment-0.json",
                "--throttle",
                "100000",
                "--execute",
            ])
        );
    }

    #[test]
    fn verify_command() {
        let cmd = commands().verify(2);
        assert_eq!(
            cmd.args,
            args(&[
                "--zookeeper",
                "zk1:2181,zk2:2181",
                "--reassignment-json-file",
                "/tmp/job/reassignment-2.json",
                "--verify",
            ])
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_captures_stdout() {
        let cmd = ToolCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo out; echo err 1>&2".to_string()],
        };
        assert_eq!(run(&cmd).await.unwrap(), "out\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_reports_exit_code() {
        let cmd = ToolCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo bad 1>&2; exit 3".to_string()],
        };
        match run(&cmd).await {
            Err(ReassignError::ToolFailed { status, stderr, .. }) => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "bad");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn run_reports_spawn_failure() {
        let cmd = ToolCommand {
            program: "/nonexistent/reassign-tool".to_string(),
            args: vec![],
        };
        assert!(matches!(run(&cmd).await, Err(ReassignError::Spawn { .. })));
    }
}
