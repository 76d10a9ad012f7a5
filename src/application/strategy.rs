use async_trait::async_trait;
use futures::future::{BoxFuture, try_join_all};
use std::time::Duration;
use tracing::warn;

use crate::domain::expense::{ExpenseResponse, PaymentMethod};
use crate::error::Result;

/// Simulated latencies standing in for external collaborators (payment
/// gateway, notification channel). Injectable so tests and `bench --fast`
/// can zero them instead of paying real wall-clock waits.
#[derive(Debug, Clone, Copy)]
pub struct ProcessingDelays {
    pub credit_card: Duration,
    pub debit_card: Duration,
    pub cash: Duration,
    pub notification: Duration,
    /// Per-element pause applied to the full list query.
    pub list_stagger: Duration,
}

impl Default for ProcessingDelays {
    fn default() -> Self {
        Self {
            credit_card: Duration::from_millis(200),
            debit_card: Duration::from_millis(150),
            cash: Duration::from_millis(50),
            notification: Duration::from_millis(100),
            list_stagger: Duration::from_millis(10),
        }
    }
}

impl ProcessingDelays {
    pub const fn zero() -> Self {
        Self {
            credit_card: Duration::ZERO,
            debit_card: Duration::ZERO,
            cash: Duration::ZERO,
            notification: Duration::ZERO,
            list_stagger: Duration::ZERO,
        }
    }

    pub fn for_method(&self, method: PaymentMethod) -> Duration {
        match method {
            PaymentMethod::CreditCard => self.credit_card,
            PaymentMethod::DebitCard => self.debit_card,
            PaymentMethod::Cash => self.cash,
        }
    }
}

/// What to do when the notification side channel fails after the expense has
/// already been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyFailure {
    /// Log and keep going.
    #[default]
    Swallow,
    /// Fail the workflow. The persisted expense is not rolled back.
    Propagate,
}

/// Execution adapter. The business workflow is written once against this
/// trait; the two implementations only differ in how waits and fan-out are
/// performed.
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    /// Mode label used in logs and comparison reports.
    fn name(&self) -> &'static str;

    /// Pays a simulated external latency.
    async fn simulate(&self, latency: Duration);

    /// Drives a batch of enrichment tasks to completion. `stagger` is the
    /// per-element pause of the full list query; zero skips it.
    async fn run_all<'a>(
        &self,
        tasks: Vec<BoxFuture<'a, Result<ExpenseResponse>>>,
        stagger: Duration,
    ) -> Result<Vec<ExpenseResponse>>;
}

/// Non-blocking mode: waits are scheduled suspensions that free the calling
/// thread, batches run concurrently and the first error cancels the rest.
pub struct PipelineStrategy;

#[async_trait]
impl ExecutionStrategy for PipelineStrategy {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    async fn simulate(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    async fn run_all<'a>(
        &self,
        tasks: Vec<BoxFuture<'a, Result<ExpenseResponse>>>,
        stagger: Duration,
    ) -> Result<Vec<ExpenseResponse>> {
        let responses = try_join_all(tasks).await?;
        if !stagger.is_zero() && !responses.is_empty() {
            // One aggregate suspension costing the same wall-clock time as
            // pacing each emission individually.
            tokio::time::sleep(stagger * responses.len() as u32).await;
        }
        Ok(responses)
    }
}

/// Thread-per-request mode: waits genuinely occupy a worker thread and
/// batches are processed one element at a time.
pub struct SequentialStrategy;

#[async_trait]
impl ExecutionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "blocking"
    }

    async fn simulate(&self, latency: Duration) {
        if latency.is_zero() {
            return;
        }
        // thread::sleep on a blocking worker rather than inline, so the demo
        // does not stall unrelated tasks sharing the runtime worker.
        if tokio::task::spawn_blocking(move || std::thread::sleep(latency))
            .await
            .is_err()
        {
            warn!("blocking wait was cancelled");
        }
    }

    async fn run_all<'a>(
        &self,
        tasks: Vec<BoxFuture<'a, Result<ExpenseResponse>>>,
        stagger: Duration,
    ) -> Result<Vec<ExpenseResponse>> {
        let mut responses = Vec::with_capacity(tasks.len());
        for task in tasks {
            responses.push(task.await?);
            if !stagger.is_zero() {
                self.simulate(stagger).await;
            }
        }
        Ok(responses)
    }
}
