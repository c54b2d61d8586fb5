use std::{future::Future, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    admin::ZkAdmin,
    core::{
        artifacts::{ArtifactPaths, FileArtifactStore},
        background::signal_listener::signal_listener_task,
        config::{JobParameters, ZK_SESSION_TIMEOUT},
        engine::ReassignmentEngine,
        err::{ReassignError, ReassignResult},
        tool::{KafkaReassignTool, ReassignCommands},
    },
};

/// Runs `job` with a cancellation token that trips on SIGINT/SIGTERM. The
/// signal listener is joined before returning, whatever the job's outcome.
pub async fn run_interruptible<F, Fut>(job: F) -> ReassignResult<()>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = ReassignResult<()>>,
{
    let cancel = CancellationToken::new();
    let shutdown = CancellationToken::new();
    let listener = signal_listener_task(cancel.clone(), shutdown.clone());

    let res = job(cancel).await;

    shutdown.cancel();
    let joined = listener
        .await
        .map_err(|e| ReassignError::Listener(format!("error joining signal listener: {}", e)))
        .and_then(|res| res);
    if let Err(e) = joined {
        tracing::error!(error = %e, "error shutting down signal listener");
    }
    res
}

/// An engine that drives the Kafka reassignment tool against files in the
/// job's artifact directory.
pub fn new_engine(params: JobParameters, broker_list: Vec<u32>) -> ReassignResult<ReassignmentEngine> {
    let paths = ArtifactPaths::init(&params.artifact_dir);
    let commands = ReassignCommands::init(&params.tool, &params.zookeeper, paths.clone());
    let tool = Arc::new(KafkaReassignTool::init(commands, broker_list, params.throttle));
    let store = Arc::new(FileArtifactStore::init(paths));
    ReassignmentEngine::init(params, tool, store)
}

pub fn new_zk_admin(zookeeper: &str) -> ReassignResult<ZkAdmin> {
    ZkAdmin::connect(zookeeper, Duration::from_millis(ZK_SESSION_TIMEOUT))
}
