use async_trait::async_trait;
use tracing::debug;

use crate::domain::expense::Expense;
use crate::domain::ports::Notifier;
use crate::error::Result;

/// Notification channel that logs and succeeds. The simulated dispatch
/// latency is paid by the workflow, not here, so the same adapter serves
/// both execution modes.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, expense: &Expense) -> Result<()> {
        debug!(expense_id = %expense.id, "notification dispatched");
        Ok(())
    }
}
