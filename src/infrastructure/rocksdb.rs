use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::expense::{Expense, PaymentMethod};
use crate::domain::ports::{CategoryStore, ExpenseStore, Stores, UserStore};
use crate::domain::user::User;
use crate::error::{ExpenseError, Result};

/// Column Family per entity kind.
pub const CF_USERS: &str = "users";
pub const CF_CATEGORIES: &str = "categories";
pub const CF_EXPENSES: &str = "expenses";

/// Opens a RocksDB instance and wires it up as all three entity stores.
pub fn stores<P: AsRef<Path>>(path: P) -> Result<Stores> {
    let store = RocksDBStore::open(path)?;
    Ok(Stores {
        users: Arc::new(store.clone()),
        categories: Arc::new(store.clone()),
        expenses: Arc::new(store),
    })
}

/// A persistent store implementation using RocksDB.
///
/// Entities are kept in separate Column Families as JSON values keyed by
/// their id. `Clone` shares the underlying `Arc<DB>`, so one handle can
/// serve all three store ports.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_USERS, Options::default()),
            ColumnFamilyDescriptor::new(CF_CATEGORIES, Options::default()),
            ColumnFamilyDescriptor::new(CF_EXPENSES, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: Serialize>(&self, cf_name: &str, id: &str, value: &T) -> Result<()> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| ExpenseError::Store(format!("{cf_name} column family not found")))?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ExpenseError::Store(format!("serialization error: {e}")))?;
        self.db.put_cf(&cf, id.as_bytes(), bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, id: &str) -> Result<Option<T>> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| ExpenseError::Store(format!("{cf_name} column family not found")))?;
        match self.db.get_cf(&cf, id.as_bytes())? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| ExpenseError::Store(format!("deserialization error: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| ExpenseError::Store(format!("{cf_name} column family not found")))?;

        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, bytes) =
                item.map_err(|e| ExpenseError::Store(format!("iteration error: {e}")))?;
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| ExpenseError::Store(format!("deserialization error: {e}")))?;
            values.push(value);
        }
        Ok(values)
    }
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn save(&self, mut user: User) -> Result<User> {
        if user.id.is_empty() {
            user.id = Uuid::new_v4().to_string();
        }
        self.put(CF_USERS, &user.id, &user)?;
        Ok(user)
    }

    async fn get(&self, id: &str) -> Result<Option<User>> {
        self.fetch(CF_USERS, id)
    }

    async fn all(&self) -> Result<Vec<User>> {
        self.scan(CF_USERS)
    }
}

#[async_trait]
impl CategoryStore for RocksDBStore {
    async fn save(&self, mut category: Category) -> Result<Category> {
        if category.id.is_empty() {
            category.id = Uuid::new_v4().to_string();
        }
        self.put(CF_CATEGORIES, &category.id, &category)?;
        Ok(category)
    }

    async fn get(&self, id: &str) -> Result<Option<Category>> {
        self.fetch(CF_CATEGORIES, id)
    }

    async fn all(&self) -> Result<Vec<Category>> {
        self.scan(CF_CATEGORIES)
    }
}

#[async_trait]
impl ExpenseStore for RocksDBStore {
    async fn save(&self, mut expense: Expense) -> Result<Expense> {
        if expense.id.is_empty() {
            expense.id = Uuid::new_v4().to_string();
        }
        self.put(CF_EXPENSES, &expense.id, &expense)?;
        Ok(expense)
    }

    async fn get(&self, id: &str) -> Result<Option<Expense>> {
        self.fetch(CF_EXPENSES, id)
    }

    async fn all(&self) -> Result<Vec<Expense>> {
        self.scan(CF_EXPENSES)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self.scan(CF_EXPENSES)?;
        expenses.retain(|e| e.user_id == user_id);
        Ok(expenses)
    }

    async fn find_by_payment_method(&self, method: PaymentMethod) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self.scan(CF_EXPENSES)?;
        expenses.retain(|e| e.payment_method == method);
        Ok(expenses)
    }

    async fn count_by_payment_method(&self, method: PaymentMethod) -> Result<u64> {
        let expenses: Vec<Expense> = self.scan(CF_EXPENSES)?;
        Ok(expenses.iter().filter(|e| e.payment_method == method).count() as u64)
    }
}
