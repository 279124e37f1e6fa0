//! Dashboard statistics endpoint

use api_types::stats::{CategoryShare, Dashboard, MonthTotal, StatsQuery};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use engine::EngineError;

use crate::{ServerError, expenses::map_category, server::ServerState};

/// Resolve the `month` query parameter to an instant in the server zone.
///
/// A plain `YYYY-MM-DD` names a local calendar day, so it is read at local
/// noon rather than UTC midnight, which could fall in the previous month.
fn reference_date(month: Option<&str>, tz: Tz) -> Result<DateTime<Tz>, EngineError> {
    let Some(month) = month.map(str::trim) else {
        return Ok(Utc::now().with_timezone(&tz));
    };

    if let Ok(day) = NaiveDate::parse_from_str(month, "%Y-%m-%d") {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| EngineError::invalid("month", "invalid date"))?;
        return tz
            .from_local_datetime(&noon)
            .earliest()
            .ok_or_else(|| EngineError::invalid("month", "date does not exist in server zone"));
    }

    Ok(engine::parse_date("month", month)?.with_timezone(&tz))
}

/// Handle requests for the dashboard view-model
pub async fn get_stats(
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Dashboard>, ServerError> {
    let reference = reference_date(query.month.as_deref(), state.timezone)?;
    let dashboard = state.engine.dashboard(&reference).await?;

    Ok(Json(Dashboard {
        total: dashboard.overview.total,
        count: dashboard.overview.count,
        average: dashboard.overview.average,
        month: MonthTotal {
            total: dashboard.month.total,
            count: dashboard.month.count,
        },
        breakdown: dashboard
            .breakdown
            .into_iter()
            .map(|share| CategoryShare {
                category: map_category(share.category),
                total: share.total,
                percentage: share.percentage,
            })
            .collect(),
    }))
}
