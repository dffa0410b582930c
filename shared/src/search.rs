//! Search request/response types
//!
//! Query-string parameters arrive as raw text. [`SearchParams::parse`] turns
//! them into a typed [`SearchRequest`], dropping any numeric or boolean filter
//! that does not parse.

use crate::models::Gig;
use crate::response::{DEFAULT_PAGE_SIZE, Pagination, clamp_page};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied to search results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
    Popularity,
    Newest,
    Oldest,
}

impl SortMode {
    pub const OPTIONS: [(SortMode, &'static str); 6] = [
        (SortMode::Relevance, "Most Relevant"),
        (SortMode::Rating, "Highest Rated"),
        (SortMode::Popularity, "Most Popular"),
        (SortMode::PriceLow, "Price: Low to High"),
        (SortMode::PriceHigh, "Price: High to Low"),
        (SortMode::Newest, "Newest First"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceLow => "price_low",
            SortMode::PriceHigh => "price_high",
            SortMode::Rating => "rating",
            SortMode::Popularity => "popularity",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
        }
    }

    /// Resolve `sortBy`/`sortOrder`, accepting both the named modes and the
    /// field-name form (`price`, `createdAt`, `totalRating`, `totalOrders`).
    pub fn parse(sort_by: &str, sort_order: Option<&str>) -> Option<SortMode> {
        let descending = !matches!(sort_order.map(str::trim), Some("asc") | Some("1"));
        match sort_by.trim() {
            "relevance" => Some(SortMode::Relevance),
            "price_low" => Some(SortMode::PriceLow),
            "price_high" => Some(SortMode::PriceHigh),
            "rating" | "totalRating" => Some(SortMode::Rating),
            "popularity" | "totalOrders" => Some(SortMode::Popularity),
            "newest" => Some(SortMode::Newest),
            "oldest" => Some(SortMode::Oldest),
            "price" => Some(if descending {
                SortMode::PriceHigh
            } else {
                SortMode::PriceLow
            }),
            "createdAt" => Some(if descending {
                SortMode::Newest
            } else {
                SortMode::Oldest
            }),
            _ => None,
        }
    }
}

/// Raw query-string parameters shared by `/gigs` and `/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub q: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub delivery_time: Option<String>,
    pub rating: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub pro: Option<String>,
    pub online: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lenient<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn flag(value: &Option<String>) -> bool {
    matches!(value.as_deref().map(str::trim), Some("true") | Some("1"))
}

impl SearchParams {
    pub fn parse(&self) -> SearchRequest {
        let query = non_empty(&self.query)
            .or_else(|| non_empty(&self.q))
            .or_else(|| non_empty(&self.search));
        let (page, limit) = clamp_page(
            lenient(&self.page),
            lenient(&self.limit),
            DEFAULT_PAGE_SIZE,
        );
        let sort = self
            .sort_by
            .as_deref()
            .and_then(|s| SortMode::parse(s, self.sort_order.as_deref()));

        SearchRequest {
            query,
            category: non_empty(&self.category),
            subcategory: non_empty(&self.subcategory),
            min_price: lenient(&self.min_price),
            max_price: lenient(&self.max_price),
            max_delivery_days: lenient(&self.delivery_time),
            min_rating: lenient(&self.rating),
            sort,
            page,
            limit,
            pro_only: flag(&self.pro),
            online_only: flag(&self.online),
        }
    }
}

/// Typed search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub max_delivery_days: Option<u32>,
    pub min_rating: Option<Decimal>,
    /// `None` selects relevance with a query, browse order without
    pub sort: Option<SortMode>,
    pub page: u32,
    pub limit: u32,
    pub pro_only: bool,
    pub online_only: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            subcategory: None,
            min_price: None,
            max_price: None,
            max_delivery_days: None,
            min_rating: None,
            sort: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            pro_only: false,
            online_only: false,
        }
    }
}

impl SearchRequest {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// Seller fields attached to each hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    pub id: String,
    pub username: String,
    pub total_rating: Decimal,
    pub total_reviews: u64,
    pub is_pro: bool,
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub gig: Gig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerSummary>,
    /// Additive field-match score; zero in browse mode
    pub relevance_score: u32,
}

/// Echo of the effective filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub delivery_time: Option<u32>,
    pub rating: Option<Decimal>,
    pub sort_by: SortMode,
    pub pro: bool,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub gigs: Vec<SearchHit>,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
}

/// Autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub value: SortMode,
    pub label: String,
}

/// Facets for building a filter UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    pub price_range: PriceRange,
    pub delivery_times: Vec<u32>,
    pub sort_options: Vec<SortOption>,
    pub rating_options: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCategory {
    pub text: String,
    pub count: u64,
    pub avg_rating: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[test]
    fn test_lenient_numeric_filters() {
        let req = params(&[("minPrice", "abc"), ("maxPrice", "50"), ("rating", "x")]).parse();
        assert_eq!(req.min_price, None);
        assert_eq!(req.max_price, Some(Decimal::from(50)));
        assert_eq!(req.min_rating, None);
    }

    #[test]
    fn test_query_aliases() {
        assert_eq!(params(&[("q", "logo")]).parse().query.as_deref(), Some("logo"));
        assert_eq!(
            params(&[("search", "seo"), ("q", " ")]).parse().query.as_deref(),
            Some("seo")
        );
        assert_eq!(params(&[("query", "  ")]).parse().query, None);
    }

    #[test]
    fn test_page_defaults_and_clamp() {
        let req = params(&[("page", "-3"), ("limit", "zzz")]).parse();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, DEFAULT_PAGE_SIZE);
        let req = params(&[("page", "0"), ("limit", "1000")]).parse();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, crate::response::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_flags() {
        let req = params(&[("pro", "true"), ("online", "yes")]).parse();
        assert!(req.pro_only);
        assert!(!req.online_only);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortMode::parse("price", Some("asc")), Some(SortMode::PriceLow));
        assert_eq!(SortMode::parse("price", None), Some(SortMode::PriceHigh));
        assert_eq!(SortMode::parse("createdAt", Some("desc")), Some(SortMode::Newest));
        assert_eq!(SortMode::parse("createdAt", Some("asc")), Some(SortMode::Oldest));
        assert_eq!(SortMode::parse("popularity", None), Some(SortMode::Popularity));
        assert_eq!(SortMode::parse("bogus", None), None);
    }
}
