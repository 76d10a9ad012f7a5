use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::expense::{Expense, PaymentMethod};
use crate::domain::ports::{CategoryStore, ExpenseStore, Stores, UserStore};
use crate::domain::user::User;
use crate::error::Result;

/// Builds a fresh, empty set of in-memory stores.
pub fn stores() -> Stores {
    Stores {
        users: Arc::new(InMemoryUserStore::new()),
        categories: Arc::new(InMemoryCategoryStore::new()),
        expenses: Arc::new(InMemoryExpenseStore::new()),
    }
}

fn assigned_id(id: &str) -> String {
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

/// Thread-safe in-memory user store.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access from both
/// execution modes.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, mut user: User) -> Result<User> {
        user.id = assigned_id(&user.id);
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCategoryStore {
    categories: Arc<RwLock<HashMap<String, Category>>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn save(&self, mut category: Category) -> Result<Category> {
        category.id = assigned_id(&category.id);
        let mut categories = self.categories.write().await;
        categories.insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn get(&self, id: &str) -> Result<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn save(&self, mut expense: Expense) -> Result<Expense> {
        expense.id = assigned_id(&expense.id);
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense.clone());
        Ok(expense)
    }

    async fn get(&self, id: &str) -> Result<Option<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.values().cloned().collect())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_payment_method(&self, method: PaymentMethod) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .values()
            .filter(|e| e.payment_method == method)
            .cloned()
            .collect())
    }

    async fn count_by_payment_method(&self, method: PaymentMethod) -> Result<u64> {
        let expenses = self.expenses.read().await;
        Ok(expenses.values().filter(|e| e.payment_method == method).count() as u64)
    }
}
