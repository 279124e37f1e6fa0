//! Calendar input parsing.
//!
//! Clients send either full RFC 3339 date-times (`2026-03-14T09:30:00+01:00`)
//! or plain calendar dates (`2026-03-14`), the latter being what HTML date
//! inputs produce. Everything is normalized to UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{EngineError, ResultEngine};

/// Which end of a day a plain calendar date resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DayEdge {
    Start,
    End,
}

fn parse_with_edge(field: &str, input: &str, edge: DayEdge) -> ResultEngine<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EngineError::invalid(field, "date is required"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        EngineError::invalid(
            field,
            format!("`{input}` is not an RFC 3339 date-time or a YYYY-MM-DD date"),
        )
    })?;
    let time = match edge {
        DayEdge::Start => NaiveTime::MIN,
        DayEdge::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| EngineError::invalid(field, "invalid end of day"))?,
    };
    Ok(day.and_time(time).and_utc())
}

/// Parse a single date-time input. Plain dates resolve to midnight UTC.
pub fn parse_date(field: &str, input: &str) -> ResultEngine<DateTime<Utc>> {
    parse_with_edge(field, input, DayEdge::Start)
}

/// Inclusive `[start, end]` interval used to list expenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ResultEngine<Self> {
        if start > end {
            return Err(EngineError::invalid(
                "startDate",
                "startDate must not be after endDate",
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse the `startDate`/`endDate` query pair.
    ///
    /// A plain `endDate` covers the whole day, so `2026-01-01..2026-01-31`
    /// includes expenses dated on the 31st.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> ResultEngine<Self> {
        let start = start.ok_or_else(|| EngineError::invalid("startDate", "date is required"))?;
        let end = end.ok_or_else(|| EngineError::invalid("endDate", "date is required"))?;
        Self::new(
            parse_with_edge("startDate", start, DayEdge::Start)?,
            parse_with_edge("endDate", end, DayEdge::End)?,
        )
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[cfg(test)]
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}
