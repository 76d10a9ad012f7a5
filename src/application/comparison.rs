use chrono::Utc;
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::application::service::ExpenseService;
use crate::domain::expense::{CreateExpenseRequest, PaymentMethod};
use crate::domain::ports::{CategoryStoreRef, UserStoreRef};
use crate::error::{ExpenseError, Result};

pub const DEFAULT_STRESS_REQUESTS: usize = 100;
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Runs the same logical operation through both execution modes and reports
/// measured wall-clock times. The harness reports numbers only; it never
/// asserts a winner, and a ratio near 1 or inverted is acceptable.
pub struct ComparisonHarness {
    pipeline: Arc<ExpenseService>,
    blocking: Arc<ExpenseService>,
    users: UserStoreRef,
    categories: CategoryStoreRef,
    pool_size: usize,
}

impl ComparisonHarness {
    pub fn new(
        pipeline: Arc<ExpenseService>,
        blocking: Arc<ExpenseService>,
        users: UserStoreRef,
        categories: CategoryStoreRef,
    ) -> Self {
        Self {
            pipeline,
            blocking,
            users,
            categories,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Three single-operation comparisons, each run strictly sequentially:
    /// one mode fully completes, including its blocking waits, before the
    /// other starts.
    pub async fn performance_report(&self) -> String {
        info!("running performance comparison");
        let mut report =
            String::from("=== EXECUTION MODE COMPARISON: PIPELINE vs BLOCKING ===\n\n");

        report.push_str("1. EXPENSE CREATION:\n");
        report.push_str(&self.compare_creation().await);
        report.push('\n');

        report.push_str("2. FULL LIST QUERY:\n");
        report.push_str(&self.compare_list_all().await);
        report.push('\n');

        report.push_str("3. PAYMENT METHOD FILTER:\n");
        report.push_str(&self.compare_payment_filter().await);

        info!("performance comparison finished");
        report
    }

    /// Load comparison: `requests` "list all" operations per mode. The
    /// pipeline mode dispatches all units concurrently; the blocking mode
    /// funnels them through a fixed pool of `pool_size` workers. A failing
    /// unit is logged and counted as completed-with-error.
    pub async fn stress_report(&self, requests: usize) -> String {
        info!(requests, "running stress comparison");
        let mut report = String::from("=== STRESS TEST: PIPELINE vs BLOCKING ===\n\n");
        let _ = writeln!(
            report,
            "Dispatching {requests} concurrent requests per mode...\n"
        );

        let pipeline_elapsed = self.stress_pipeline(requests).await;
        let blocking_elapsed = self.stress_blocking(requests).await;

        let p = pipeline_elapsed.as_millis();
        let b = blocking_elapsed.as_millis();
        let ratio = blocking_elapsed.as_secs_f64() / pipeline_elapsed.as_secs_f64().max(f64::EPSILON);

        report.push_str("RESULTS:\n");
        let _ = writeln!(report, "pipeline: {p} ms");
        let _ = writeln!(report, "blocking: {b} ms");
        let _ = writeln!(report, "difference: {} ms", b as i128 - p as i128);
        let _ = writeln!(report, "ratio (blocking/pipeline): {ratio:.2}x");

        info!("stress comparison finished");
        report
    }

    async fn compare_creation(&self) -> String {
        let mut out = String::new();
        match self.probe_request().await {
            Ok(request) => {
                for svc in [&self.pipeline, &self.blocking] {
                    let started = Instant::now();
                    match svc.create_expense(request.clone()).await {
                        Ok(_) => {
                            let _ = writeln!(
                                out,
                                "{}: {} ms",
                                svc.mode(),
                                started.elapsed().as_millis()
                            );
                        }
                        Err(e) => {
                            let _ = writeln!(out, "{}: error - {e}", svc.mode());
                        }
                    }
                }
            }
            Err(e) => {
                let _ = writeln!(out, "skipped: {e}");
            }
        }
        out
    }

    async fn compare_list_all(&self) -> String {
        let mut out = String::new();
        for svc in [&self.pipeline, &self.blocking] {
            let started = Instant::now();
            match svc.list_all().await {
                Ok(items) => {
                    let _ = writeln!(
                        out,
                        "{}: {} ms ({} expenses)",
                        svc.mode(),
                        started.elapsed().as_millis(),
                        items.len()
                    );
                }
                Err(e) => {
                    let _ = writeln!(out, "{}: error - {e}", svc.mode());
                }
            }
        }
        out
    }

    async fn compare_payment_filter(&self) -> String {
        let mut out = String::new();
        for svc in [&self.pipeline, &self.blocking] {
            let started = Instant::now();
            match svc.list_by_payment_method(PaymentMethod::CreditCard).await {
                Ok(items) => {
                    let _ = writeln!(
                        out,
                        "{}: {} ms ({} expenses)",
                        svc.mode(),
                        started.elapsed().as_millis(),
                        items.len()
                    );
                }
                Err(e) => {
                    let _ = writeln!(out, "{}: error - {e}", svc.mode());
                }
            }
        }
        out
    }

    /// Builds the creation probe against seeded data.
    async fn probe_request(&self) -> Result<CreateExpenseRequest> {
        let user = self
            .users
            .all()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ExpenseError::NotFound("no seeded user for the creation probe".to_string()))?;
        let category = self
            .categories
            .all()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ExpenseError::NotFound("no seeded category for the creation probe".to_string())
            })?;
        Ok(CreateExpenseRequest {
            user_id: user.id,
            category_id: category.id,
            amount: Decimal::new(5000, 2),
            description: "comparison probe expense".to_string(),
            payment_method: PaymentMethod::Cash,
            date: Utc::now().date_naive(),
        })
    }

    async fn stress_pipeline(&self, requests: usize) -> Duration {
        let started = Instant::now();
        let mut handles = Vec::with_capacity(requests);
        for _ in 0..requests {
            let svc = Arc::clone(&self.pipeline);
            handles.push(tokio::spawn(async move { svc.list_all().await }));
        }
        join_units(handles, "pipeline").await;
        started.elapsed()
    }

    async fn stress_blocking(&self, requests: usize) -> Duration {
        // Fixed admission pool standing in for a thread pool of
        // `pool_size` workers.
        let pool = Arc::new(Semaphore::new(self.pool_size));
        let started = Instant::now();
        let mut handles = Vec::with_capacity(requests);
        for _ in 0..requests {
            let svc = Arc::clone(&self.blocking);
            let pool = Arc::clone(&pool);
            handles.push(tokio::spawn(async move {
                let _permit = pool.acquire().await.ok();
                svc.list_all().await
            }));
        }
        join_units(handles, "blocking").await;
        started.elapsed()
    }
}

async fn join_units(
    handles: Vec<tokio::task::JoinHandle<Result<Vec<crate::domain::expense::ExpenseResponse>>>>,
    mode: &str,
) {
    for handle in handles {
        match handle.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(mode, error = %e, "stress unit completed with error"),
            Err(e) => warn!(mode, error = %e, "stress unit panicked"),
        }
    }
}
