use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::category::Category;
use crate::domain::expense::{Expense, PaymentMethod};
use crate::domain::user::User;
use crate::error::Result;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Upserts the user, assigning a fresh id when blank. Returns the stored
    /// record.
    async fn save(&self, user: User) -> Result<User>;
    async fn get(&self, id: &str) -> Result<Option<User>>;
    async fn all(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn save(&self, category: Category) -> Result<Category>;
    async fn get(&self, id: &str) -> Result<Option<Category>>;
    async fn all(&self) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn save(&self, expense: Expense) -> Result<Expense>;
    async fn get(&self, id: &str) -> Result<Option<Expense>>;
    async fn all(&self) -> Result<Vec<Expense>>;
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Expense>>;
    async fn find_by_payment_method(&self, method: PaymentMethod) -> Result<Vec<Expense>>;
    async fn count_by_payment_method(&self, method: PaymentMethod) -> Result<u64>;
}

/// Side channel invoked after an expense is persisted. How a failure here is
/// handled is the service's `NotifyFailure` policy.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, expense: &Expense) -> Result<()>;
}

pub type UserStoreRef = Arc<dyn UserStore>;
pub type CategoryStoreRef = Arc<dyn CategoryStore>;
pub type ExpenseStoreRef = Arc<dyn ExpenseStore>;
pub type NotifierRef = Arc<dyn Notifier>;

/// The entity stores both execution modes share. Cloning shares the
/// underlying stores.
#[derive(Clone)]
pub struct Stores {
    pub users: UserStoreRef,
    pub categories: CategoryStoreRef,
    pub expenses: ExpenseStoreRef,
}
