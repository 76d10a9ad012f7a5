//! Demo dataset: three users, five categories and three expenses, matching
//! the sample data the HTTP demos and the comparison harness expect.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::category::Category;
use crate::domain::expense::{Expense, ExpenseStatus, PaymentMethod};
use crate::domain::ports::Stores;
use crate::domain::user::User;
use crate::error::Result;

fn demo_expense(
    user: &User,
    category: &Category,
    amount: Decimal,
    description: &str,
    method: PaymentMethod,
    date: NaiveDate,
) -> Expense {
    Expense {
        id: String::new(),
        user_id: user.id.clone(),
        category_id: category.id.clone(),
        amount,
        description: description.to_string(),
        payment_method: method,
        date,
        created_at: Utc::now(),
        status: ExpenseStatus::Completed,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Seeds the demo dataset. A store that already contains users is left
/// untouched, so reseeding a persistent database is a no-op.
pub async fn seed(stores: &Stores) -> Result<()> {
    if !stores.users.all().await?.is_empty() {
        info!("store already contains data, skipping seed");
        return Ok(());
    }

    let juan = stores
        .users
        .save(User::new(
            "juan.perez",
            "juan.perez@email.com",
            "Juan Pérez",
            Decimal::new(500_000, 2),
        ))
        .await?;
    let maria = stores
        .users
        .save(User::new(
            "maria.garcia",
            "maria.garcia@email.com",
            "María García",
            Decimal::new(350_000, 2),
        ))
        .await?;
    stores
        .users
        .save(User::new(
            "carlos.lopez",
            "carlos.lopez@email.com",
            "Carlos López",
            Decimal::new(800_000, 2),
        ))
        .await?;

    let food = stores
        .categories
        .save(Category::new(
            "Alimentación",
            "Gastos en comida y bebidas",
            "#FF6B6B",
        ))
        .await?;
    let transport = stores
        .categories
        .save(Category::new(
            "Transporte",
            "Gasolina, transporte público, taxi",
            "#4ECDC4",
        ))
        .await?;
    let leisure = stores
        .categories
        .save(Category::new(
            "Entretenimiento",
            "Cine, restaurantes, eventos",
            "#45B7D1",
        ))
        .await?;
    stores
        .categories
        .save(Category::new(
            "Servicios",
            "Luz, agua, internet, teléfono",
            "#96CEB4",
        ))
        .await?;
    stores
        .categories
        .save(Category::new(
            "Salud",
            "Medicinas, consultas médicas",
            "#FFEAA7",
        ))
        .await?;

    stores
        .expenses
        .save(demo_expense(
            &juan,
            &food,
            Decimal::new(4550, 2),
            "Supermercado para la semana",
            PaymentMethod::Cash,
            date(2024, 1, 15),
        ))
        .await?;
    stores
        .expenses
        .save(demo_expense(
            &juan,
            &transport,
            Decimal::new(2500, 2),
            "Gasolina",
            PaymentMethod::DebitCard,
            date(2024, 1, 16),
        ))
        .await?;
    stores
        .expenses
        .save(demo_expense(
            &maria,
            &leisure,
            Decimal::new(12000, 2),
            "Cena en restaurante",
            PaymentMethod::CreditCard,
            date(2024, 1, 17),
        ))
        .await?;

    info!("demo dataset seeded: 3 users, 5 categories, 3 expenses");
    Ok(())
}
