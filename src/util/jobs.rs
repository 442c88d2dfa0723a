//! Bounded parallel fan-out with isolated failures.
//!
//! Every item gets its own task, but a task only runs its worker while
//! holding a semaphore permit, so at most `limit` workers are live at once.

use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Result of one job.
#[derive(Debug)]
pub enum JobOutcome<R> {
    Done(R),
    Failed(anyhow::Error),
    Cancelled,
}

impl<R> JobOutcome<R> {
    pub fn is_done(&self) -> bool {
        matches!(self, JobOutcome::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobOutcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, JobOutcome::Cancelled)
    }
}

/// Default concurrency bound: the host's logical processor count.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Run `worker` over every item with at most `limit` running concurrently.
///
/// Outcomes come back in input order. A worker that fails or panics only
/// affects its own outcome. Once `token` is cancelled, items still waiting
/// for a permit are reported as cancelled; running workers receive the
/// token and are expected to stop on their own.
pub async fn run_bounded<T, R, F, Fut>(
    items: Vec<T>,
    limit: usize,
    token: &CancellationToken,
    worker: F,
) -> Vec<JobOutcome<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<R>>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let worker = Arc::new(worker);

    let handles: Vec<JoinHandle<JobOutcome<R>>> = items
        .into_iter()
        .map(|item| {
            let semaphore = Arc::clone(&semaphore);
            let worker = Arc::clone(&worker);
            let token = token.clone();

            tokio::spawn(async move {
                let permit = tokio::select! {
                    biased;
                    _ = token.cancelled() => return JobOutcome::Cancelled,
                    permit = semaphore.acquire_owned() => permit,
                };
                let Ok(_permit) = permit else {
                    return JobOutcome::Cancelled;
                };
                if token.is_cancelled() {
                    return JobOutcome::Cancelled;
                }

                match worker(item, token).await {
                    Ok(Some(value)) => JobOutcome::Done(value),
                    Ok(None) => JobOutcome::Cancelled,
                    Err(e) => JobOutcome::Failed(e),
                }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => JobOutcome::Cancelled,
            Err(e) => JobOutcome::Failed(anyhow!("job panicked: {}", e)),
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();

        let (f, p) = (Arc::clone(&in_flight), Arc::clone(&peak));
        let outcomes = run_bounded((0..12).collect(), 3, &token, move |_item: u32, _token| {
            let (in_flight, peak) = (Arc::clone(&f), Arc::clone(&p));
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(Some(()))
            }
        })
        .await;

        assert_eq!(outcomes.len(), 12);
        assert!(outcomes.iter().all(JobOutcome::is_done));
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let token = CancellationToken::new();
        let outcomes = run_bounded((0..6).collect(), 2, &token, |item: u32, _token| async move {
            if item == 2 {
                anyhow::bail!("file {} failed", item);
            }
            Ok(Some(item * 10))
        })
        .await;

        assert!(outcomes[2].is_failed());
        for (i, outcome) in outcomes.iter().enumerate() {
            if i != 2 {
                match outcome {
                    JobOutcome::Done(v) => assert_eq!(*v, i as u32 * 10),
                    other => panic!("unexpected outcome for {}: {:?}", i, other),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let token = CancellationToken::new();
        let outcomes = run_bounded(vec![0u32, 1, 2], 1, &token, |item, _token| async move {
            if item == 1 {
                panic!("boom");
            }
            Ok::<_, anyhow::Error>(Some(item))
        })
        .await;

        assert!(outcomes[0].is_done());
        assert!(outcomes[1].is_failed());
        assert!(outcomes[2].is_done());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);

        let outcomes = run_bounded(vec![1u32, 2, 3], 2, &token, move |_item, _token| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(Some(()))
            }
        })
        .await;

        assert!(outcomes.iter().all(JobOutcome::is_cancelled));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_stops_queued_work() {
        let token = CancellationToken::new();
        let trigger = token.clone();

        let outcomes = run_bounded((0..5).collect(), 1, &token, move |item: u32, token| {
            let trigger = trigger.clone();
            async move {
                if item == 0 {
                    trigger.cancel();
                    return Ok::<_, anyhow::Error>(Some(item));
                }
                token.cancelled().await;
                Ok(None)
            }
        })
        .await;

        assert!(outcomes[0].is_done());
        assert!(outcomes[1..].iter().all(JobOutcome::is_cancelled));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let token = CancellationToken::new();
        let outcomes = run_bounded(Vec::<u32>::new(), 4, &token, |item, _token| async move {
            Ok::<_, anyhow::Error>(Some(item))
        })
        .await;
        assert!(outcomes.is_empty());
    }
}
