//! Expense records.
//!
//! [`Expense`] is the validated domain record. It can only be created through
//! [`NewExpense`] and changed through [`ExpensePatch`]; both reject invalid
//! fields at construction, so everything downstream (store, aggregation) can
//! assume well-formed data.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, dates};

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated expense fields as they arrive from a client.
///
/// Every field is optional so that a missing field surfaces as a
/// [`EngineError::Validation`] naming it.
#[derive(Clone, Debug, Default)]
pub struct ExpenseInput {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// A validated expense ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    amount: f64,
    category: Category,
    description: String,
    date: Option<DateTime<Utc>>,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// When `date` is `None` the expense is dated at its creation time.
    pub fn new(
        amount: f64,
        category: Category,
        description: &str,
        date: Option<DateTime<Utc>>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            amount: validate_amount(amount)?,
            category,
            description: validate_description(description)?,
            date,
        })
    }

    pub fn from_input(input: ExpenseInput) -> ResultEngine<Self> {
        let amount = input
            .amount
            .ok_or_else(|| EngineError::invalid("amount", "amount is required"))?;
        let category = input
            .category
            .ok_or_else(|| EngineError::invalid("category", "category is required"))?;
        let description = input
            .description
            .ok_or_else(|| EngineError::invalid("description", "description is required"))?;
        let date = input
            .date
            .as_deref()
            .map(|date| dates::parse_date("date", date))
            .transpose()?;

        Self::new(
            amount,
            Category::try_from(category.as_str())?,
            &description,
            date,
        )
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }
}

/// A validated partial update. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensePatch {
    amount: Option<f64>,
    category: Option<Category>,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    pub fn from_input(input: ExpenseInput) -> ResultEngine<Self> {
        Ok(Self {
            amount: input.amount.map(validate_amount).transpose()?,
            category: input
                .category
                .as_deref()
                .map(Category::try_from)
                .transpose()?,
            description: input
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            date: input
                .date
                .as_deref()
                .map(|date| dates::parse_date("date", date))
                .transpose()?,
        })
    }

    pub fn amount(mut self, amount: f64) -> ResultEngine<Self> {
        self.amount = Some(validate_amount(amount)?);
        Ok(self)
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn description(mut self, description: &str) -> ResultEngine<Self> {
        self.description = Some(validate_description(description)?);
        Ok(self)
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    /// Apply the patch on top of a stored row, bumping `updated_at`.
    pub(crate) fn apply(self, model: Model, now: DateTime<Utc>) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(amount) = self.amount {
            active.amount = ActiveValue::Set(amount);
        }
        if let Some(category) = self.category {
            active.category = ActiveValue::Set(category.as_str().to_string());
        }
        if let Some(description) = self.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(date) = self.date {
            active.date = ActiveValue::Set(date);
        }
        active.updated_at = ActiveValue::Set(now);
        active
    }
}

/// Largest accepted amount. Keeps totals over any realistic number of
/// records finite.
pub const MAX_AMOUNT: f64 = 1e12;

fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() {
        return Err(EngineError::invalid("amount", "amount must be a number"));
    }
    if amount < 0.0 {
        return Err(EngineError::invalid("amount", "amount must be >= 0"));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::invalid(
            "amount",
            format!("amount must be <= {MAX_AMOUNT}"),
        ));
    }
    Ok(amount)
}

fn validate_description(description: &str) -> ResultEngine<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid(
            "description",
            "description must not be empty",
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_new(id: Uuid, expense: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            description: ActiveValue::Set(expense.description),
            date: ActiveValue::Set(expense.date.unwrap_or(now)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| DbErr::Type(format!("invalid expense id: {}", model.id)))?;
        let category = Category::try_from(model.category.as_str())
            .map_err(|_| DbErr::Type(format!("invalid stored category: {}", model.category)))?;
        Ok(Self {
            id,
            amount: model.amount,
            category,
            description: model.description,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
