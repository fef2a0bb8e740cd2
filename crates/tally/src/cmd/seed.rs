//! Seed command - Fill the SQLite database with random sales
//!
//! # Usage
//!
//! ```bash
//! tally seed                                  # 5000 sales over the last year
//! tally seed --count 20000 --reset
//! tally seed --start 2024-01-01 --end 2024-12-31
//! ```

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Days, NaiveDate, Utc};
use clap::Args;
use tally_config::{Config, DatabaseBackend};
use tally_query::seed::DEFAULT_SEED_COUNT;
use tally_query::{SeedOptions, SqliteBackend, generate_sales};
use tracing::info;

/// Seed command arguments
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Number of sales to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEED_COUNT)]
    pub count: usize,

    /// First day of generated sales (default: twelve months ago)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of generated sales, inclusive (default: now)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Delete existing sales first
    #[arg(long)]
    pub reset: bool,
}

/// Run the seed command
pub async fn run(config: Config, args: SeedArgs) -> Result<()> {
    if config.database.backend != DatabaseBackend::Sqlite {
        bail!("seeding needs the sqlite backend; the memory backend is generated at startup");
    }

    let options = seed_options(&args, Utc::now())?;

    let path = config.database.db_path();
    let backend = SqliteBackend::open_with_pool_size(&path, config.database.max_connections)
        .await
        .with_context(|| format!("failed to open sales database at {}", path.display()))?;

    if args.reset {
        let removed = backend.clear().await.context("failed to clear sales")?;
        info!(removed, "existing sales deleted");
    }

    let sales = generate_sales(&mut rand::rng(), &options);
    let inserted = backend
        .insert_sales(&sales)
        .await
        .context("failed to insert sales")?;
    let total = backend.count().await.context("failed to count sales")?;
    backend.close().await;

    info!(
        inserted,
        total,
        start = %options.start.date_naive(),
        end = %options.end.date_naive(),
        path = %path.display(),
        "sales seeded"
    );
    println!("Inserted {} sales ({} total) into {}", inserted, total, path.display());
    Ok(())
}

/// Build generator options from the flags
///
/// Missing bounds fall back to the twelve months before `now`.
fn seed_options(args: &SeedArgs, now: DateTime<Utc>) -> Result<SeedOptions> {
    let default = SeedOptions::last_year(args.count, now);

    let start = match args.start {
        Some(day) => day_start(day)?,
        None => default.start,
    };
    let end = match args.end {
        Some(day) => {
            let next = day
                .checked_add_days(Days::new(1))
                .context("end date out of range")?;
            day_start(next)?
        }
        None => default.end,
    };

    if start >= end {
        bail!("--start must be before --end");
    }

    Ok(SeedOptions {
        count: args.count,
        start,
        end,
    })
}

fn day_start(day: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0).context("invalid date")?;
    Ok(midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(start: Option<&str>, end: Option<&str>) -> SeedArgs {
        SeedArgs {
            count: 10,
            start: start.map(|s| s.parse().unwrap()),
            end: end.map(|s| s.parse().unwrap()),
            reset: false,
        }
    }

    #[test]
    fn test_explicit_range_includes_end_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let options = seed_options(&args(Some("2024-01-01"), Some("2024-01-31")), now).unwrap();

        assert_eq!(options.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(options.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(options.count, 10);
    }

    #[test]
    fn test_defaults_to_last_year() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let options = seed_options(&args(None, None), now).unwrap();

        assert_eq!(options.end, now);
        assert_eq!(options.start, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_reversed_range() {
        let now = Utc::now();
        assert!(seed_options(&args(Some("2024-02-01"), Some("2024-01-01")), now).is_err());
    }
}
