//! Synthetic sales generation
//!
//! Produces demo data for local development: uniformly random timestamps over
//! a window, random picks from fixed category/product/region/channel lists
//! and amounts between 10 and 1010.

use chrono::{DateTime, Duration, Months, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::sale::Sale;

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Home & Garden",
    "Clothing",
    "Books",
    "Sports",
    "Beauty",
    "Automotive",
    "Food & Beverage",
];

const PRODUCTS: &[&str] = &[
    "Smartphone",
    "Laptop",
    "Headphones",
    "Tablet",
    "Smart Watch",
    "Gaming Console",
    "Camera",
    "Speaker",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Webcam",
    "Router",
    "Charger",
    "Case",
];

const REGIONS: &[&str] = &[
    "North America",
    "Europe",
    "Asia Pacific",
    "Latin America",
    "Middle East",
    "Africa",
];

const CHANNELS: &[&str] = &[
    "Online",
    "Store",
    "Mobile App",
    "Phone",
    "Email",
    "Social Media",
];

/// Default number of generated sales
pub const DEFAULT_SEED_COUNT: usize = 5000;

/// Options for generating sales
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Number of sales to generate
    pub count: usize,
    /// Earliest timestamp (inclusive)
    pub start: DateTime<Utc>,
    /// Latest timestamp (exclusive)
    pub end: DateTime<Utc>,
}

impl SeedOptions {
    /// `count` sales spread over the twelve months before `now`
    pub fn last_year(count: usize, now: DateTime<Utc>) -> Self {
        let start = now
            .checked_sub_months(Months::new(12))
            .unwrap_or(now - Duration::days(365));
        Self {
            count,
            start,
            end: now,
        }
    }
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self::last_year(DEFAULT_SEED_COUNT, Utc::now())
    }
}

/// Generate random sales according to `options`
pub fn generate_sales<R: Rng + ?Sized>(rng: &mut R, options: &SeedOptions) -> Vec<Sale> {
    let span_ms = (options.end - options.start).num_milliseconds().max(1);

    (0..options.count)
        .map(|_| {
            let offset = rng.random_range(0..span_ms);
            let occurred_at = options.start + Duration::milliseconds(offset);
            let amount = (rng.random_range(10.0..1010.0_f64) * 100.0).round() / 100.0;

            Sale::new(
                occurred_at,
                pick(rng, CATEGORIES),
                pick(rng, PRODUCTS),
                pick(rng, REGIONS),
                pick(rng, CHANNELS),
                amount,
            )
        })
        .collect()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, values: &[&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(count: usize) -> SeedOptions {
        SeedOptions {
            count,
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_generates_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generate_sales(&mut rng, &options(250)).len(), 250);
        assert!(generate_sales(&mut rng, &options(0)).is_empty());
    }

    #[test]
    fn test_values_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let opts = options(500);

        for sale in generate_sales(&mut rng, &opts) {
            assert!(sale.occurred_at >= opts.start && sale.occurred_at < opts.end);
            assert!((10.0..=1010.0).contains(&sale.amount));
            assert!(CATEGORIES.contains(&sale.category.as_str()));
            assert!(PRODUCTS.contains(&sale.product.as_str()));
            assert!(REGIONS.contains(&sale.region.as_str()));
            assert!(CHANNELS.contains(&sale.channel.as_str()));
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(1);
        let sales = generate_sales(&mut rng, &options(100));
        let ids: std::collections::HashSet<_> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_last_year_window() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let opts = SeedOptions::last_year(10, now);
        assert_eq!(opts.start, Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
        assert_eq!(opts.end, now);
    }
}
