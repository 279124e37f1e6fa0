use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, CategoryTotal, DateRange, EngineError, Expense, ExpensePatch, NewExpense,
    ResultEngine, expenses, summary,
};

use super::{Engine, with_tx};

#[derive(Debug, FromQueryResult)]
struct CategorySum {
    category: String,
    total: Option<f64>,
}

fn not_found() -> EngineError {
    EngineError::KeyNotFound("Expense not found".to_string())
}

/// Newest first. Expenses sharing a date fall back to creation order.
fn newest_first(select: Select<expenses::Entity>) -> Select<expenses::Entity> {
    select
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::CreatedAt)
}

fn into_expenses(models: Vec<expenses::Model>) -> ResultEngine<Vec<Expense>> {
    models.into_iter().map(Expense::try_from).collect()
}

impl Engine {
    /// All expenses, newest first.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = newest_first(expenses::Entity::find())
            .all(&self.database)
            .await?;
        into_expenses(models)
    }

    /// Expenses filed under `category`, newest first.
    pub async fn list_expenses_by_category(&self, category: Category) -> ResultEngine<Vec<Expense>> {
        let models = newest_first(
            expenses::Entity::find().filter(expenses::Column::Category.eq(category.as_str())),
        )
        .all(&self.database)
        .await?;
        into_expenses(models)
    }

    /// Expenses dated within `range` (both ends inclusive), newest first.
    pub async fn list_expenses_by_date_range(&self, range: DateRange) -> ResultEngine<Vec<Expense>> {
        let models = newest_first(
            expenses::Entity::find()
                .filter(expenses::Column::Date.gte(range.start()))
                .filter(expenses::Column::Date.lte(range.end())),
        )
        .all(&self.database)
        .await?;
        into_expenses(models)
    }

    /// Store a new expense under a freshly generated id.
    pub async fn create_expense(&self, expense: NewExpense) -> ResultEngine<Expense> {
        let id = Uuid::new_v4();
        let model = expenses::ActiveModel::from_new(id, expense, Utc::now())
            .insert(&self.database)
            .await?;
        tracing::debug!(%id, "expense created");
        Expense::try_from(model)
    }

    /// Apply `patch` to an existing expense.
    ///
    /// An empty patch leaves the record, including `updated_at`, untouched.
    pub async fn update_expense(&self, id: Uuid, patch: ExpensePatch) -> ResultEngine<Expense> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            if patch.is_empty() {
                Expense::try_from(model)
            } else {
                let updated = patch.apply(model, now).update(&db_tx).await?;
                tracing::debug!(%id, "expense updated");
                Expense::try_from(updated)
            }
        })
    }

    /// Permanently remove an expense.
    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found());
        }
        tracing::debug!(%id, "expense deleted");
        Ok(())
    }

    /// Per-category totals, summed by the store with `GROUP BY`.
    pub async fn expense_summary(&self) -> ResultEngine<Vec<CategoryTotal>> {
        let rows = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(Expr::col(expenses::Column::Amount).sum(), "total")
            .group_by(expenses::Column::Category)
            .order_by_asc(expenses::Column::Category)
            .into_model::<CategorySum>()
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|row| {
                let category = Category::try_from(row.category.as_str()).map_err(|_| {
                    DbErr::Type(format!("invalid stored category: {}", row.category))
                })?;
                Ok(CategoryTotal {
                    category,
                    total: row.total.unwrap_or(0.0),
                })
            })
            .collect()
    }

    /// Dashboard view-model over every stored expense. The monthly figures
    /// use the calendar month of `reference` in its own time zone.
    pub async fn dashboard<Tz: TimeZone>(
        &self,
        reference: &DateTime<Tz>,
    ) -> ResultEngine<summary::Dashboard> {
        let expenses = self.list_expenses().await?;
        Ok(summary::dashboard(&expenses, reference))
    }
}
