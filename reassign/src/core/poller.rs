use std::{sync::Arc, time::Duration};

use tokio::time;

use super::{
    err::{ReassignError, ReassignResult},
    status::{aggregate_failures, verify_failures},
    tool::ReassignTool,
};

pub struct VerificationPoller {
    tool: Arc<dyn ReassignTool>,
    poll_interval: Duration,
    timeout: Duration,
}

impl VerificationPoller {
    pub fn init(tool: Arc<dyn ReassignTool>, poll_interval: Duration, timeout: Duration) -> VerificationPoller {
        VerificationPoller {
            tool,
            poll_interval,
            timeout,
        }
    }

    /// `ceil(timeout / poll_interval)`, never less than one attempt.
    pub fn max_attempts(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        let timeout = self.timeout.as_millis();
        (((timeout + interval - 1) / interval) as u64).max(1)
    }

    /// Runs verify until every partition reports success or the attempts run
    /// out. A failed verify invocation counts as a failed attempt.
    pub async fn poll_until_done(&self, batch_id: usize) -> ReassignResult<()> {
        let max_attempts = self.max_attempts();
        let mut failures = Vec::new();

        for attempt in 1..=max_attempts {
            failures = match self.tool.verify(batch_id).await {
                Ok(output) => verify_failures(&output),
                Err(e) => vec![format!("verify failed: {}", e)],
            };
            if failures.is_empty() {
                tracing::info!(batch = batch_id, attempt, "reassignment verified");
                return Ok(());
            }

            tracing::debug!(
                batch = batch_id,
                attempt,
                max_attempts,
                pending = failures.len(),
                "reassignment not complete"
            );
            if attempt < max_attempts {
                time::sleep(self.poll_interval).await;
            }
        }

        Err(ReassignError::VerifyTimeout {
            batch_id,
            failures: aggregate_failures(&failures),
        })
    }
}

#[cfg(test)]
mod poller_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::core::{
        err::{ReassignError, ReassignResult},
        tool::ReassignTool,
    };

    use super::VerificationPoller;

    const MIXED: &str = "Status of partition reassignment:\n\
        Reassignment of partition t1-0 completed successfully\n\
        Reassignment of partition t1-1 is inprogress\n";
    const DONE: &str = "Status of partition reassignment:\n\
        Reassignment of partition t1-0 completed successfully\n\
        Reassignment of partition t1-1 completed successfully\n\
        Throttle was removed.\n";

    /// Replays the given verify outputs, repeating the last one.
    struct ScriptedVerify {
        outputs: Vec<ReassignResult<String>>,
        calls: Mutex<usize>,
    }

    impl ScriptedVerify {
        fn init(outputs: Vec<ReassignResult<String>>) -> Arc<ScriptedVerify> {
            Arc::new(ScriptedVerify {
                outputs,
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ReassignTool for ScriptedVerify {
        async fn generate(&self, _batch_id: usize) -> ReassignResult<String> {
            unreachable!()
        }

        async fn execute(&self, _batch_id: usize) -> ReassignResult<String> {
            unreachable!()
        }

        async fn verify(&self, _batch_id: usize) -> ReassignResult<String> {
            let mut g = self.calls.lock().unwrap();
            let idx = (*g).min(self.outputs.len() - 1);
            (*g) += 1;
            match &self.outputs[idx] {
                Ok(out) => Ok(out.clone()),
                Err(e) => Err(ReassignError::Admin(e.to_string())),
            }
        }
    }

    fn poller(tool: Arc<ScriptedVerify>, interval: u64, timeout: u64) -> VerificationPoller {
        VerificationPoller::init(tool, Duration::from_secs(interval), Duration::from_secs(timeout))
    }

    #[test]
    fn attempts_round_up() {
        let tool = ScriptedVerify::init(vec![Ok(DONE.to_string())]);
        assert_eq!(poller(tool.clone(), 1, 1).max_attempts(), 1);
        assert_eq!(poller(tool.clone(), 1, 3).max_attempts(), 3);
        assert_eq!(poller(tool.clone(), 3, 10).max_attempts(), 4);
        assert_eq!(poller(tool, 10, 0).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_first_attempt_does_not_sleep() {
        let tool = ScriptedVerify::init(vec![Ok(DONE.to_string())]);
        let start = Instant::now();
        poller(tool.clone(), 1, 10).poll_until_done(0).await.unwrap();
        assert_eq!(tool.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn in_progress_times_out() {
        let tool = ScriptedVerify::init(vec![Ok(MIXED.to_string())]);
        let start = Instant::now();
        let err = poller(tool.clone(), 1, 3).poll_until_done(5).await.unwrap_err();
        assert_eq!(tool.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        match err {
            ReassignError::VerifyTimeout { batch_id, failures } => {
                assert_eq!(batch_id, 5);
                assert_eq!(
                    failures,
                    "not completed: Reassignment of partition t1-1 is inprogress"
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn converges_after_retries() {
        let tool = ScriptedVerify::init(vec![
            Ok(MIXED.to_string()),
            Err(ReassignError::Admin("zk down".to_string())),
            Ok(DONE.to_string()),
        ]);
        poller(tool.clone(), 1, 10).poll_until_done(0).await.unwrap();
        assert_eq!(tool.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn verify_errors_are_reported() {
        let tool = ScriptedVerify::init(vec![Err(ReassignError::Admin("zk down".to_string()))]);
        let err = poller(tool, 1, 2).poll_until_done(0).await.unwrap_err();
        assert!(err.to_string().contains("verify failed"));
    }
}
