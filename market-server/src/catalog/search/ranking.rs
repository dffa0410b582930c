//! Result ordering
//!
//! Every ordering ends with gig id ascending, so equal keys never reorder
//! between requests and pages stay disjoint.

use std::cmp::Ordering;

use shared::models::Gig;
use shared::search::SortMode;

/// A gig that passed the filters, with its relevance score
#[derive(Debug, Clone)]
pub struct Candidate {
    pub gig: Gig,
    pub score: u32,
}

pub fn sort_candidates(candidates: &mut [Candidate], mode: SortMode, has_query: bool) {
    candidates.sort_by(|a, b| compare(a, b, mode, has_query).then_with(|| a.gig.id.cmp(&b.gig.id)));
}

fn compare(a: &Candidate, b: &Candidate, mode: SortMode, has_query: bool) -> Ordering {
    let (ga, gb) = (&a.gig, &b.gig);
    match mode {
        SortMode::Relevance if has_query => b
            .score
            .cmp(&a.score)
            .then_with(|| by_rating(ga, gb)),
        SortMode::Relevance => browse_default(ga, gb),
        SortMode::PriceLow => ga.basic_price().cmp(&gb.basic_price()),
        SortMode::PriceHigh => gb.basic_price().cmp(&ga.basic_price()),
        SortMode::Rating => by_rating(ga, gb),
        SortMode::Popularity => gb.stats.total_orders.cmp(&ga.stats.total_orders),
        SortMode::Newest => gb.created_at.cmp(&ga.created_at),
        SortMode::Oldest => ga.created_at.cmp(&gb.created_at),
    }
}

/// Average rating desc, then review count desc
fn by_rating(a: &Gig, b: &Gig) -> Ordering {
    b.stats
        .total_rating
        .cmp(&a.stats.total_rating)
        .then_with(|| b.stats.total_reviews.cmp(&a.stats.total_reviews))
}

/// Rating desc, orders desc, newest first
fn browse_default(a: &Gig, b: &Gig) -> Ordering {
    b.stats
        .total_rating
        .cmp(&a.stats.total_rating)
        .then_with(|| b.stats.total_orders.cmp(&a.stats.total_orders))
        .then_with(|| b.created_at.cmp(&a.created_at))
}
