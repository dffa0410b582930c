//! Ranking Engine
//!
//! Resolves a search or browse request into a ranked, paginated page of
//! listable gigs. Pure read: one catalog scan plus one profile lookup for
//! the sellers involved.
//!
//! ```text
//! listable gigs → structured filters → query match + score
//!               → seller filters → sort → page → hits
//! ```

mod facets;
mod matcher;
mod ranking;
mod suggestions;

pub use facets::{TRENDING_LIMIT, filter_facets, trending_categories};
pub use matcher::{FieldMatches, QueryTerms, match_fields};
pub use ranking::{Candidate, sort_candidates};
pub use suggestions::{DEFAULT_SUGGESTION_LIMIT, MAX_SUGGESTION_LIMIT, clamp_limit, suggest};

use shared::models::{Gig, UserProfile};
use shared::response::PaginatedResponse;
use shared::search::{
    AppliedFilters, SearchFilters, SearchHit, SearchRequest, SearchResponse, SellerSummary,
    SortMode, Suggestion, TrendingCategory,
};

use crate::accounts::AccountStorage;
use crate::catalog::CatalogStorage;
use crate::db::StorageResult;

#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: CatalogStorage,
    accounts: AccountStorage,
}

impl SearchEngine {
    pub fn new(catalog: CatalogStorage, accounts: AccountStorage) -> Self {
        Self { catalog, accounts }
    }

    /// Ranked search; `now` decides which sellers count as online
    pub fn search(&self, request: &SearchRequest, now: i64) -> StorageResult<SearchResponse> {
        let terms = request.query.as_deref().and_then(QueryTerms::parse);
        let has_query = terms.is_some();

        let mut candidates: Vec<Candidate> = self
            .catalog
            .listable_gigs()?
            .into_iter()
            .filter(|gig| passes_filters(gig, request))
            .filter_map(|gig| match &terms {
                Some(terms) => {
                    let matches = match_fields(&gig, terms);
                    matches.any().then(|| Candidate {
                        score: matches.score(),
                        gig,
                    })
                }
                None => Some(Candidate { gig, score: 0 }),
            })
            .collect();

        let sellers = self
            .accounts
            .get_users(candidates.iter().map(|c| c.gig.seller_id.as_str()))?;

        if request.pro_only || request.online_only {
            candidates.retain(|c| {
                sellers.get(&c.gig.seller_id).is_some_and(|seller| {
                    (!request.pro_only || seller.is_pro)
                        && (!request.online_only || seller.is_online(now))
                })
            });
        }

        let sort = request.sort.unwrap_or(SortMode::Relevance);
        sort_candidates(&mut candidates, sort, has_query);

        let page = PaginatedResponse::from_sorted(candidates, request.page, request.limit);
        let gigs = page
            .items
            .into_iter()
            .map(|c| SearchHit {
                seller: sellers
                    .get(&c.gig.seller_id)
                    .map(|profile| seller_summary(profile, now)),
                relevance_score: c.score,
                gig: c.gig,
            })
            .collect();

        tracing::debug!(
            query = ?request.query,
            sort = sort.as_str(),
            total = page.pagination.total,
            "Search resolved"
        );

        Ok(SearchResponse {
            gigs,
            pagination: page.pagination,
            filters: Some(applied_filters(request, sort)),
        })
    }

    /// Autocomplete; an empty fragment returns nothing without a scan
    pub fn suggestions(&self, fragment: &str, limit: u32) -> StorageResult<Vec<Suggestion>> {
        if fragment.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(suggest(&self.catalog.listable_gigs()?, fragment, limit))
    }

    pub fn filter_facets(&self) -> StorageResult<SearchFilters> {
        Ok(filter_facets(&self.catalog.listable_gigs()?))
    }

    pub fn trending(&self) -> StorageResult<Vec<TrendingCategory>> {
        Ok(trending_categories(&self.catalog.listable_gigs()?))
    }
}

/// Structured filters; prices and delivery apply to the basic tier
fn passes_filters(gig: &Gig, request: &SearchRequest) -> bool {
    let basic = &gig.packages.basic;
    request
        .category
        .as_deref()
        .is_none_or(|c| gig.category.as_str().eq_ignore_ascii_case(c))
        && request
            .subcategory
            .as_deref()
            .is_none_or(|s| gig.subcategory.eq_ignore_ascii_case(s))
        && request.min_price.is_none_or(|min| basic.price >= min)
        && request.max_price.is_none_or(|max| basic.price <= max)
        && request
            .max_delivery_days
            .is_none_or(|days| basic.delivery_time <= days)
        && request
            .min_rating
            .is_none_or(|rating| gig.stats.total_rating >= rating)
}

fn seller_summary(profile: &UserProfile, now: i64) -> SellerSummary {
    SellerSummary {
        id: profile.id.clone(),
        username: profile.username.clone(),
        total_rating: profile.stats.total_rating,
        total_reviews: profile.stats.total_reviews,
        is_pro: profile.is_pro,
        is_online: profile.is_online(now),
    }
}

fn applied_filters(request: &SearchRequest, sort: SortMode) -> AppliedFilters {
    AppliedFilters {
        query: request.query.clone(),
        category: request.category.clone(),
        subcategory: request.subcategory.clone(),
        min_price: request.min_price,
        max_price: request.max_price,
        delivery_time: request.max_delivery_days,
        rating: request.min_rating,
        sort_by: sort,
        pro: request.pro_only,
        online: request.online_only,
    }
}
