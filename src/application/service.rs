use futures::FutureExt;
use futures::future::BoxFuture;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::application::strategy::{ExecutionStrategy, NotifyFailure, ProcessingDelays};
use crate::domain::category::Category;
use crate::domain::expense::{CreateExpenseRequest, Expense, ExpenseResponse, PaymentMethod};
use crate::domain::ports::{NotifierRef, Stores};
use crate::domain::user::User;
use crate::error::{ExpenseError, Result};

/// Runs the expense workflow and queries. Business logic is written once;
/// the injected [`ExecutionStrategy`] decides how waits and fan-out happen,
/// so one instance per mode is composed at startup over shared stores.
/// Stateless between calls.
pub struct ExpenseService {
    stores: Stores,
    notifier: NotifierRef,
    strategy: Arc<dyn ExecutionStrategy>,
    delays: ProcessingDelays,
    notify_failure: NotifyFailure,
}

impl ExpenseService {
    pub fn new(
        stores: Stores,
        notifier: NotifierRef,
        strategy: Arc<dyn ExecutionStrategy>,
        delays: ProcessingDelays,
    ) -> Self {
        Self {
            stores,
            notifier,
            strategy,
            delays,
            notify_failure: NotifyFailure::default(),
        }
    }

    pub fn with_notify_failure(mut self, policy: NotifyFailure) -> Self {
        self.notify_failure = policy;
        self
    }

    /// Mode label of the underlying strategy.
    pub fn mode(&self) -> &'static str {
        self.strategy.name()
    }

    /// Runs the six-step creation workflow in strict order: validate,
    /// simulate payment, persist, notify, update balance, enrich.
    ///
    /// Failures before the persist step leave no state behind. Failures
    /// after it do not roll the expense back; a persisted expense with an
    /// un-decremented balance is an accepted inconsistency of the demo.
    pub async fn create_expense(&self, request: CreateExpenseRequest) -> Result<ExpenseResponse> {
        info!(mode = self.mode(), user_id = %request.user_id, "creating expense");

        self.validate(&request).await?;
        self.process_payment(&request).await?;

        let expense = self.stores.expenses.save(Expense::from_request(&request)).await?;
        info!(mode = self.mode(), expense_id = %expense.id, "expense persisted");

        self.send_notification(&expense).await?;
        self.update_balance(&expense).await?;
        self.enrich(expense).await
    }

    pub async fn get_expense_by_id(&self, id: &str) -> Result<ExpenseResponse> {
        debug!(mode = self.mode(), id, "fetching expense");
        let expense = self
            .stores
            .expenses
            .get(id)
            .await?
            .ok_or_else(|| ExpenseError::NotFound(format!("expense not found: {id}")))?;
        self.enrich(expense).await
    }

    pub async fn list_all(&self) -> Result<Vec<ExpenseResponse>> {
        info!(mode = self.mode(), "listing all expenses");
        let expenses = self.stores.expenses.all().await?;
        self.enrich_all(expenses, self.delays.list_stagger).await
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<ExpenseResponse>> {
        info!(mode = self.mode(), user_id, "listing expenses by user");
        let expenses = self.stores.expenses.find_by_user(user_id).await?;
        self.enrich_all(expenses, Duration::ZERO).await
    }

    pub async fn list_by_payment_method(
        &self,
        method: PaymentMethod,
    ) -> Result<Vec<ExpenseResponse>> {
        info!(mode = self.mode(), %method, "listing expenses by payment method");
        let expenses = self.stores.expenses.find_by_payment_method(method).await?;
        self.enrich_all(expenses, Duration::ZERO).await
    }

    /// Sum of the user's expense amounts; zero when there are none.
    pub async fn total_by_user(&self, user_id: &str) -> Result<Decimal> {
        let expenses = self.stores.expenses.find_by_user(user_id).await?;
        let total = expenses
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc + e.amount);
        info!(mode = self.mode(), user_id, %total, "computed user total");
        Ok(total)
    }

    pub async fn count_by_payment_method(&self, method: PaymentMethod) -> Result<u64> {
        let count = self.stores.expenses.count_by_payment_method(method).await?;
        info!(mode = self.mode(), %method, count, "counted expenses");
        Ok(count)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.stores.users.all().await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.stores.categories.all().await
    }

    async fn validate(&self, request: &CreateExpenseRequest) -> Result<()> {
        debug!(user_id = %request.user_id, "validating expense request");
        request.validate()?;
        if self.stores.users.get(&request.user_id).await?.is_none() {
            return Err(ExpenseError::NotFound(format!(
                "user not found: {}",
                request.user_id
            )));
        }
        Ok(())
    }

    async fn process_payment(&self, request: &CreateExpenseRequest) -> Result<()> {
        debug!(method = %request.payment_method, amount = %request.amount, "processing payment");
        self.strategy
            .simulate(self.delays.for_method(request.payment_method))
            .await;
        Ok(())
    }

    async fn send_notification(&self, expense: &Expense) -> Result<()> {
        debug!(expense_id = %expense.id, "sending notification");
        self.strategy.simulate(self.delays.notification).await;
        if let Err(e) = self.notifier.notify(expense).await {
            match self.notify_failure {
                NotifyFailure::Swallow => {
                    warn!(expense_id = %expense.id, error = %e, "notification failed, continuing")
                }
                NotifyFailure::Propagate => return Err(e),
            }
        }
        Ok(())
    }

    async fn update_balance(&self, expense: &Expense) -> Result<()> {
        // Read-modify-write with no store-level atomicity: two concurrent
        // creations for the same user can lose an update. Known race,
        // accepted for the demo.
        match self.stores.users.get(&expense.user_id).await? {
            Some(mut user) => {
                user.balance -= expense.amount;
                self.stores.users.save(user).await?;
            }
            None => {
                debug!(user_id = %expense.user_id, "user gone before balance update, skipping")
            }
        }
        Ok(())
    }

    async fn enrich(&self, expense: Expense) -> Result<ExpenseResponse> {
        let user = self.stores.users.get(&expense.user_id).await?;
        let category = self.stores.categories.get(&expense.category_id).await?;
        match (user, category) {
            (Some(user), Some(category)) => {
                Ok(ExpenseResponse::new(expense, user.full_name, category.name))
            }
            _ => Err(ExpenseError::Enrichment(expense.id)),
        }
    }

    async fn enrich_all(
        &self,
        expenses: Vec<Expense>,
        stagger: Duration,
    ) -> Result<Vec<ExpenseResponse>> {
        let tasks: Vec<BoxFuture<'_, Result<ExpenseResponse>>> = expenses
            .into_iter()
            .map(|expense| self.enrich(expense).boxed())
            .collect();
        self.strategy.run_all(tasks, stagger).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::application::strategy::{PipelineStrategy, SequentialStrategy};
    use crate::domain::expense::ExpenseStatus;
    use crate::domain::ports::Notifier;
    use crate::infrastructure::in_memory;
    use crate::infrastructure::notifier::LoggingNotifier;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _expense: &Expense) -> Result<()> {
            Err(ExpenseError::Notification("channel down".to_string()))
        }
    }

    fn service(stores: &Stores, notifier: NotifierRef) -> ExpenseService {
        ExpenseService::new(
            stores.clone(),
            notifier,
            Arc::new(PipelineStrategy),
            ProcessingDelays::zero(),
        )
    }

    async fn seeded_request(stores: &Stores, amount: Decimal) -> CreateExpenseRequest {
        let user = stores
            .users
            .save(User::new("ana", "ana@email.com", "Ana Ruiz", dec!(100.00)))
            .await
            .unwrap();
        let category = stores
            .categories
            .save(Category::new("Transporte", "taxi", "#4ECDC4"))
            .await
            .unwrap();
        CreateExpenseRequest {
            user_id: user.id,
            category_id: category.id,
            amount,
            description: "taxi al aeropuerto".to_string(),
            payment_method: PaymentMethod::Cash,
            date: Utc::now().date_naive(),
        }
    }

    #[tokio::test]
    async fn test_create_expense_echoes_request() {
        let stores = in_memory::stores();
        let svc = service(&stores, Arc::new(LoggingNotifier));
        let request = seeded_request(&stores, dec!(50.00)).await;

        let response = svc.create_expense(request.clone()).await.unwrap();
        assert!(!response.id.is_empty());
        assert_eq!(response.amount, request.amount);
        assert_eq!(response.status, ExpenseStatus::Pending);
        assert_eq!(response.user_name, "Ana Ruiz");
        assert_eq!(response.category_name, "Transporte");
    }

    #[tokio::test]
    async fn test_notification_failure_swallowed_by_default() {
        let stores = in_memory::stores();
        let svc = service(&stores, Arc::new(FailingNotifier));
        let request = seeded_request(&stores, dec!(10.00)).await;

        assert!(svc.create_expense(request).await.is_ok());
        assert_eq!(stores.expenses.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_propagates_when_configured() {
        let stores = in_memory::stores();
        let svc = ExpenseService::new(
            stores.clone(),
            Arc::new(FailingNotifier),
            Arc::new(SequentialStrategy),
            ProcessingDelays::zero(),
        )
        .with_notify_failure(NotifyFailure::Propagate);
        let request = seeded_request(&stores, dec!(10.00)).await;

        let err = svc.create_expense(request).await.unwrap_err();
        assert!(matches!(err, ExpenseError::Notification(_)));
        // No compensation: the expense stays persisted.
        assert_eq!(stores.expenses.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enrich_fails_on_dangling_category() {
        let stores = in_memory::stores();
        let svc = service(&stores, Arc::new(LoggingNotifier));
        let request = seeded_request(&stores, dec!(10.00)).await;

        let mut expense = Expense::from_request(&request);
        expense.category_id = "deleted".to_string();
        stores.expenses.save(expense).await.unwrap();

        let err = svc.list_all().await.unwrap_err();
        assert!(matches!(err, ExpenseError::Enrichment(_)));
    }
}
