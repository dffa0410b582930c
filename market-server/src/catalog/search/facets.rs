//! Filter facets and trending categories

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{Category, Gig};
use shared::search::{PriceRange, SearchFilters, SortMode, SortOption, TrendingCategory};

/// Trending list length
pub const TRENDING_LIMIT: usize = 10;

const RATING_OPTIONS: [u8; 5] = [5, 4, 3, 2, 1];

/// Facets over the listable catalog
pub fn filter_facets(gigs: &[Gig]) -> SearchFilters {
    let categories: BTreeSet<&str> = gigs.iter().map(|g| g.category.as_str()).collect();
    let subcategories: BTreeSet<&str> = gigs.iter().map(|g| g.subcategory.as_str()).collect();
    let delivery_times: BTreeSet<u32> = gigs
        .iter()
        .map(|g| g.packages.basic.delivery_time)
        .collect();

    SearchFilters {
        categories: categories.into_iter().map(str::to_string).collect(),
        subcategories: subcategories.into_iter().map(str::to_string).collect(),
        price_range: price_range(gigs),
        delivery_times: delivery_times.into_iter().collect(),
        sort_options: SortMode::OPTIONS
            .iter()
            .map(|(value, label)| SortOption {
                value: *value,
                label: label.to_string(),
            })
            .collect(),
        rating_options: RATING_OPTIONS.to_vec(),
    }
}

fn price_range(gigs: &[Gig]) -> PriceRange {
    let prices: Vec<Decimal> = gigs.iter().map(Gig::basic_price).collect();
    let (Some(min), Some(max)) = (prices.iter().min(), prices.iter().max()) else {
        return PriceRange {
            min_price: Decimal::ZERO,
            max_price: Decimal::from(1000),
            avg_price: Decimal::from(100),
        };
    };
    let sum: Decimal = prices.iter().sum();
    PriceRange {
        min_price: *min,
        max_price: *max,
        avg_price: (sum / Decimal::from(prices.len()))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    }
}

/// Categories by listing count, with their average gig rating
pub fn trending_categories(gigs: &[Gig]) -> Vec<TrendingCategory> {
    let mut groups: BTreeMap<Category, (u64, Decimal)> = BTreeMap::new();
    for gig in gigs {
        let entry = groups.entry(gig.category).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += gig.stats.total_rating;
    }

    let mut trending: Vec<TrendingCategory> = groups
        .into_iter()
        .map(|(category, (count, rating_sum))| TrendingCategory {
            text: category.as_str().to_string(),
            count,
            avg_rating: (rating_sum / Decimal::from(count))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect();
    trending.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    trending.truncate(TRENDING_LIMIT);
    trending
}
