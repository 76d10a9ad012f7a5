use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use expense_bench::application::service::ExpenseService;
use expense_bench::application::strategy::{PipelineStrategy, ProcessingDelays, SequentialStrategy};
use expense_bench::domain::expense::{CreateExpenseRequest, PaymentMethod};
use expense_bench::domain::ports::{NotifierRef, Stores};
use expense_bench::domain::user::User;
use expense_bench::infrastructure::notifier::LoggingNotifier;
use expense_bench::infrastructure::{in_memory, seed};

pub struct Fixture {
    pub stores: Stores,
    pub pipeline: Arc<ExpenseService>,
    pub blocking: Arc<ExpenseService>,
}

/// Seeded in-memory stores with one zero-delay service per execution mode.
pub async fn fixture() -> Fixture {
    let stores = in_memory::stores();
    seed::seed(&stores).await.expect("seed failed");
    let (pipeline, blocking) = services(&stores);
    Fixture {
        stores,
        pipeline,
        blocking,
    }
}

pub fn services(stores: &Stores) -> (Arc<ExpenseService>, Arc<ExpenseService>) {
    let notifier: NotifierRef = Arc::new(LoggingNotifier);
    let delays = ProcessingDelays::zero();
    (
        Arc::new(ExpenseService::new(
            stores.clone(),
            Arc::clone(&notifier),
            Arc::new(PipelineStrategy),
            delays,
        )),
        Arc::new(ExpenseService::new(
            stores.clone(),
            notifier,
            Arc::new(SequentialStrategy),
            delays,
        )),
    )
}

pub async fn seeded_user(stores: &Stores, username: &str) -> User {
    stores
        .users
        .all()
        .await
        .unwrap()
        .into_iter()
        .find(|u| u.username == username)
        .expect("missing seeded user")
}

pub async fn seeded_category_id(stores: &Stores, name: &str) -> String {
    stores
        .categories
        .all()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .expect("missing seeded category")
        .id
}

pub fn request(user_id: &str, category_id: &str, amount: Decimal) -> CreateExpenseRequest {
    CreateExpenseRequest {
        user_id: user_id.to_string(),
        category_id: category_id.to_string(),
        amount,
        description: "integration expense".to_string(),
        payment_method: PaymentMethod::Cash,
        date: Utc::now().date_naive(),
    }
}
