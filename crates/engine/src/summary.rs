//! Derived views over a snapshot of expenses.
//!
//! Every function here is pure: it takes an immutable slice of already
//! validated [`Expense`]s and returns a freshly computed view-model. Callers
//! fetch the snapshot, then fold it as many times as they need.

use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;

use crate::{Category, Expense};

/// Sum of the amounts filed under one category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Sum and count of the expenses in one calendar month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub total: f64,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Overview {
    pub total: f64,
    pub count: usize,
    /// `total / count`, or `0` for an empty snapshot.
    pub average: f64,
}

/// A category total with its share of the overall total.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: f64,
    /// Percentage of the overall total, rounded to one decimal place.
    pub percentage: f64,
}

/// Everything a dashboard renders, computed from one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub overview: Overview,
    pub month: PeriodTotal,
    pub breakdown: Vec<CategoryShare>,
}

/// Group by category and sum. Categories are emitted in first-seen order and
/// absent categories get no entry.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category,
                total: expense.amount,
            }),
        }
    }
    totals
}

/// Total and count of the expenses falling in the same calendar month and
/// year as `reference`, both read in `reference`'s time zone.
pub fn period_total<Tz: TimeZone>(expenses: &[Expense], reference: &DateTime<Tz>) -> PeriodTotal {
    let tz = reference.timezone();
    let (year, month) = (reference.year(), reference.month());

    expenses
        .iter()
        .filter(|expense| {
            let local = expense.date.with_timezone(&tz);
            local.year() == year && local.month() == month
        })
        .fold(PeriodTotal::default(), |acc, expense| PeriodTotal {
            total: acc.total + expense.amount,
            count: acc.count + 1,
        })
}

pub fn overview(expenses: &[Expense]) -> Overview {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = if count == 0 { 0.0 } else { total / count as f64 };
    Overview {
        total,
        count,
        average,
    }
}

/// Share of `overall` taken by each category total. With a zero overall
/// total every share is `0`.
pub fn percentage_breakdown(totals: &[CategoryTotal], overall: f64) -> Vec<CategoryShare> {
    totals
        .iter()
        .map(|t| CategoryShare {
            category: t.category,
            total: t.total,
            percentage: if overall > 0.0 {
                round_one_decimal(t.total / overall * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

pub fn dashboard<Tz: TimeZone>(expenses: &[Expense], reference: &DateTime<Tz>) -> Dashboard {
    let overview = overview(expenses);
    let totals = category_totals(expenses);
    Dashboard {
        overview,
        month: period_total(expenses, reference),
        breakdown: percentage_breakdown(&totals, overview.total),
    }
}

/// Round half away from zero to one decimal place.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
