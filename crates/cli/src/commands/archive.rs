//! Headless week archive.
//!
//! Lets a scheduler roll a family's list over without a bearer token. The
//! same rollover-day rule applies as over HTTP.
//!
//! # Environment Variables
//!
//! - `PLANNER_DATABASE_URL` - `PostgreSQL` connection string
//! - `PLANNER_ROLLOVER_DAY` - Weekday lists roll over on (default: saturday)

use chrono::{Datelike, Weekday};

use shopping_planner_core::{FamilyId, RolloverDay, parse_weekday};
use shopping_planner_server::services::ListService;
use shopping_planner_server::services::lists::today;

use super::{CommandError, connect};

/// Archive the family's active list as of `day`, or today when absent.
///
/// # Errors
///
/// Returns an error if the day or rollover setting can't be parsed, or if
/// the archive is rejected.
pub async fn run(family: i32, day: Option<&str>) -> Result<(), CommandError> {
    let day = resolve_day(day)?;
    let rollover = rollover_day()?;

    let pool = connect().await?;
    let family_id = FamilyId::new(family);

    tracing::info!(%family_id, day = %day, %rollover, "Archiving week");
    let next = ListService::new(&pool, rollover)
        .archive_week(family_id, day)
        .await?;

    tracing::info!(
        list_id = %next.id,
        week_start = %next.week_start,
        week_end = %next.week_end,
        "Opened next week's list"
    );
    Ok(())
}

fn resolve_day(day: Option<&str>) -> Result<Weekday, CommandError> {
    day.map_or_else(
        || Ok(today().weekday()),
        |d| parse_weekday(d).map_err(|e| CommandError::InvalidArgument(e.to_string())),
    )
}

fn rollover_day() -> Result<RolloverDay, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("PLANNER_ROLLOVER_DAY").map_or_else(
        |_| Ok(RolloverDay::default()),
        |value| {
            value
                .parse()
                .map_err(|e: shopping_planner_core::RolloverDayError| {
                    CommandError::InvalidArgument(e.to_string())
                })
        },
    )
}
