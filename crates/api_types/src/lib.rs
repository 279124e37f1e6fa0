use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Expense categories as they appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Bills,
    Shopping,
    Entertainment,
    Healthcare,
    Education,
    Other,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod expense {
    use super::*;

    /// An amount as sent by clients.
    ///
    /// JSON clients send numbers; HTML forms send numeric strings. Both are
    /// accepted and the string form is parsed server-side.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Number(f64),
        Text(String),
    }

    /// Request body for `POST /expenses`.
    ///
    /// Fields are optional here so missing ones are reported as validation
    /// errors naming the field.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: Option<AmountInput>,
        /// One of the [`Category`] labels.
        pub category: Option<String>,
        pub description: Option<String>,
        /// RFC3339 timestamp or `YYYY-MM-DD`. Defaults to the creation time.
        pub date: Option<String>,
    }

    /// Request body for `PUT /expenses/{id}`. Absent fields are left as is.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount: Option<AmountInput>,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: f64,
        pub category: Category,
        pub description: String,
        pub date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string of `GET /expenses/date-range`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DateRangeQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub message: String,
    }
}

pub mod stats {
    use super::*;

    /// One row of `GET /expenses/summary`.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: Category,
        pub total: f64,
    }

    /// Query string of `GET /expenses/stats`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsQuery {
        /// Any date inside the month to report on. Defaults to today.
        pub month: Option<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthTotal {
        pub total: f64,
        pub count: usize,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category: Category,
        pub total: f64,
        /// Share of the overall total in percent, one decimal place.
        pub percentage: f64,
    }

    /// Response of `GET /expenses/stats`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub total: f64,
        pub count: usize,
        pub average: f64,
        pub month: MonthTotal,
        pub breakdown: Vec<CategoryShare>,
    }
}

pub mod health {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DatabaseStatus {
        Connected,
        Disconnected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DatabaseHealth {
        pub status: DatabaseStatus,
    }

    /// Response of `GET /health`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Health {
        pub status: String,
        pub timestamp: DateTime<Utc>,
        pub uptime_seconds: u64,
        pub database: DatabaseHealth,
    }
}
