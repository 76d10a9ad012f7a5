use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExpenseError, Result};

/// Largest amount accepted for a single expense.
pub fn amount_limit() -> Decimal {
    Decimal::from(10_000_i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cash => "CASH",
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
        };
        f.write_str(name)
    }
}

impl FromStr for PaymentMethod {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CASH" => Ok(Self::Cash),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "DEBIT_CARD" => Ok(Self::DebitCard),
            other => Err(ExpenseError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// Set to `Pending` at creation and never transitioned further in-scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Completed,
    Cancelled,
}

/// A persisted expense. References user and category by id; both are checked
/// at creation time only, so a later deletion leaves a dangling reference
/// that surfaces as an enrichment failure at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: ExpenseStatus,
}

impl Expense {
    /// Builds a new `Pending` expense from an accepted request. The id stays
    /// blank; the store assigns one on save.
    pub fn from_request(request: &CreateExpenseRequest) -> Self {
        Self {
            id: String::new(),
            user_id: request.user_id.clone(),
            category_id: request.category_id.clone(),
            amount: request.amount,
            description: request.description.clone(),
            payment_method: request.payment_method,
            date: request.date,
            created_at: Utc::now(),
            status: ExpenseStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub user_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
}

impl CreateExpenseRequest {
    /// Explicit precondition checks, run before any side effect.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ExpenseError::Validation("userId is required".to_string()));
        }
        if self.category_id.trim().is_empty() {
            return Err(ExpenseError::Validation(
                "categoryId is required".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(ExpenseError::Validation(
                "description is required".to_string(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ExpenseError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.amount > amount_limit() {
            return Err(ExpenseError::Validation(format!(
                "amount exceeds the allowed limit of {}",
                amount_limit()
            )));
        }
        Ok(())
    }
}

/// An expense joined with denormalized display names. Built per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub category_id: String,
    pub category_name: String,
    pub amount: Decimal,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: ExpenseStatus,
}

impl ExpenseResponse {
    pub fn new(expense: Expense, user_name: String, category_name: String) -> Self {
        Self {
            id: expense.id,
            user_id: expense.user_id,
            user_name,
            category_id: expense.category_id,
            category_name,
            amount: expense.amount,
            description: expense.description,
            payment_method: expense.payment_method,
            date: expense.date,
            created_at: expense.created_at,
            status: expense.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> CreateExpenseRequest {
        CreateExpenseRequest {
            user_id: "u1".to_string(),
            category_id: "c1".to_string(),
            amount,
            description: "lunch".to_string(),
            payment_method: PaymentMethod::Cash,
            date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn test_validate_accepts_range() {
        assert!(request(dec!(0.01)).validate().is_ok());
        assert!(request(dec!(10000)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_amounts() {
        assert!(matches!(
            request(dec!(0)).validate(),
            Err(ExpenseError::Validation(_))
        ));
        assert!(matches!(
            request(dec!(-5)).validate(),
            Err(ExpenseError::Validation(_))
        ));
        assert!(matches!(
            request(dec!(10000.01)).validate(),
            Err(ExpenseError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut r = request(dec!(1));
        r.user_id = "  ".to_string();
        assert!(matches!(r.validate(), Err(ExpenseError::Validation(_))));

        let mut r = request(dec!(1));
        r.description = String::new();
        assert!(matches!(r.validate(), Err(ExpenseError::Validation(_))));
    }

    #[test]
    fn test_payment_method_round_trip() {
        for (text, method) in [
            ("CASH", PaymentMethod::Cash),
            ("CREDIT_CARD", PaymentMethod::CreditCard),
            ("DEBIT_CARD", PaymentMethod::DebitCard),
        ] {
            assert_eq!(text.parse::<PaymentMethod>().unwrap(), method);
            assert_eq!(method.to_string(), text);
        }
        assert!(matches!(
            "BITCOIN".parse::<PaymentMethod>(),
            Err(ExpenseError::InvalidPaymentMethod(_))
        ));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let expense = Expense::from_request(&request(dec!(12.50)));
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["paymentMethod"], "CASH");
        assert_eq!(value["status"], "PENDING");
    }
}
