use std::future::Future;

use agentopia::AgentopiaError;
use tokio::time::{sleep, Instant};

use crate::config::PollConfig;

/// Re-run `fetch` until `done` accepts its result or `poll.timeout` elapses.
///
/// The first read happens immediately. Fetch errors abort the loop.
pub async fn poll_until<T, F, Fut, P>(
    what: &str,
    poll: PollConfig,
    mut fetch: F,
    done: P,
) -> Result<T, AgentopiaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AgentopiaError>>,
    P: Fn(&T) -> bool,
{
    let deadline = Instant::now() + poll.timeout;
    loop {
        let value = fetch().await?;
        if done(&value) {
            return Ok(value);
        }
        if Instant::now() >= deadline {
            return Err(AgentopiaError::Timeout(format!(
                "{what} after {:?}",
                poll.timeout
            )));
        }
        tracing::debug!(what, interval = ?poll.interval, "condition not met, polling again");
        sleep(poll.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_returns_once_condition_holds() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let value = poll_until(
            "counter",
            fast(),
            move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) },
            |n| *n >= 3,
        )
        .await
        .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_times_out() {
        let err = poll_until("never", fast(), || async { Ok(0u32) }, |_| false)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentopiaError::Timeout(msg) if msg.starts_with("never")));
    }

    #[tokio::test]
    async fn test_fetch_error_aborts() {
        let err = poll_until(
            "failing",
            fast(),
            || async { Err::<u32, _>(AgentopiaError::from_status(500, "boom".into())) },
            |_| true,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
