//! Expenses API endpoints

use api_types::{
    expense::{
        AmountInput, DateRangeQuery, ExpenseDeleted, ExpenseNew, ExpenseUpdate, ExpenseView,
    },
    stats::CategoryTotal,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Category, DateRange, EngineError, ExpenseInput, ExpensePatch, NewExpense};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_category(category: Category) -> api_types::Category {
    match category {
        Category::Food => api_types::Category::Food,
        Category::Travel => api_types::Category::Travel,
        Category::Bills => api_types::Category::Bills,
        Category::Shopping => api_types::Category::Shopping,
        Category::Entertainment => api_types::Category::Entertainment,
        Category::Healthcare => api_types::Category::Healthcare,
        Category::Education => api_types::Category::Education,
        Category::Other => api_types::Category::Other,
    }
}

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount,
        category: map_category(expense.category),
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn map_expenses(expenses: Vec<engine::Expense>) -> Json<Vec<ExpenseView>> {
    Json(expenses.into_iter().map(map_expense).collect())
}

/// An id that is not a UUID cannot name a stored expense.
fn parse_id(id: &str) -> Result<Uuid, EngineError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| EngineError::KeyNotFound("Expense not found".to_string()))
}

fn parse_amount(amount: Option<AmountInput>) -> Result<Option<f64>, EngineError> {
    amount
        .map(|amount| match amount {
            AmountInput::Number(value) => Ok(value),
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| EngineError::invalid("amount", format!("`{text}` is not a number"))),
        })
        .transpose()
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.list_expenses().await?;
    Ok(map_expenses(expenses))
}

pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let category = Category::try_from(category.as_str())?;
    let expenses = state.engine.list_expenses_by_category(category).await?;
    Ok(map_expenses(expenses))
}

pub async fn list_by_date_range(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    let expenses = state.engine.list_expenses_by_date_range(range).await?;
    Ok(map_expenses(expenses))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseNew>, ServerError>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = NewExpense::from_input(ExpenseInput {
        amount: parse_amount(payload.amount)?,
        category: payload.category,
        description: payload.description,
        date: payload.date,
    })?;
    let created = state.engine.create_expense(expense).await?;

    Ok((StatusCode::CREATED, Json(map_expense(created))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseUpdate>, ServerError>,
) -> Result<Json<ExpenseView>, ServerError> {
    let id = parse_id(&id)?;
    let patch = ExpensePatch::from_input(ExpenseInput {
        amount: parse_amount(payload.amount)?,
        category: payload.category,
        description: payload.description,
        date: payload.date,
    })?;
    let updated = state.engine.update_expense(id, patch).await?;

    Ok(Json(map_expense(updated)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_expense(id).await?;

    Ok(Json(ExpenseDeleted {
        message: "Expense deleted successfully".to_string(),
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryTotal>>, ServerError> {
    let totals = state
        .engine
        .expense_summary()
        .await?
        .into_iter()
        .map(|total| CategoryTotal {
            category: map_category(total.category),
            total: total.total,
        })
        .collect();

    Ok(Json(totals))
}
