//! Autocomplete suggestions

use std::collections::HashMap;

use shared::models::Gig;
use shared::search::Suggestion;

pub const DEFAULT_SUGGESTION_LIMIT: u32 = 10;
pub const MAX_SUGGESTION_LIMIT: u32 = 50;

/// Clamp a requested limit into `1..=MAX_SUGGESTION_LIMIT`
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
        .clamp(1, MAX_SUGGESTION_LIMIT)
}

/// Titles, tags, categories and subcategories containing `fragment`,
/// grouped by exact text and ranked by how often they occur
pub fn suggest(gigs: &[Gig], fragment: &str, limit: u32) -> Vec<Suggestion> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for gig in gigs {
        let fields = std::iter::once(gig.title.as_str())
            .chain(gig.tags.iter().map(String::as_str))
            .chain([gig.category.as_str(), gig.subcategory.as_str()]);
        for text in fields {
            if text.to_lowercase().contains(&needle) {
                *counts.entry(text).or_default() += 1;
            }
        }
    }

    let mut suggestions: Vec<Suggestion> = counts
        .into_iter()
        .map(|(text, count)| Suggestion {
            text: text.to_string(),
            count,
        })
        .collect();
    suggestions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    suggestions.truncate(limit as usize);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::storage::tests::sample_gig;

    fn gig(id: i64, title: &str, tags: &[&str]) -> Gig {
        let mut gig = sample_gig(id, "s1", title);
        gig.subcategory = "Illustration".to_string();
        gig.tags = tags.iter().map(|t| t.to_string()).collect();
        gig
    }

    #[test]
    fn test_frequency_ranked_and_capped() {
        let gigs = vec![
            gig(1, "Minimal logo", &["logo", "minimal"]),
            gig(2, "Mascot logo", &["logo", "mascot"]),
            gig(3, "Logo animation", &["logo"]),
            gig(4, "Flyer", &["print"]),
        ];

        let all = suggest(&gigs, "LOGO", 10);
        assert_eq!(all[0], Suggestion { text: "logo".to_string(), count: 3 });
        assert_eq!(all.len(), 4);
        // Equal counts are alphabetical
        assert_eq!(all[1].text, "Logo animation");
        assert_eq!(all[2].text, "Mascot logo");

        assert_eq!(suggest(&gigs, "logo", 2).len(), 2);
    }

    #[test]
    fn test_matches_categories() {
        let gigs = vec![gig(1, "Poster", &[])];
        let found = suggest(&gigs, "graph", 10);
        assert_eq!(found, vec![Suggestion { text: "Graphics & Design".to_string(), count: 1 }]);
    }

    #[test]
    fn test_empty_fragment() {
        let gigs = vec![gig(1, "Minimal logo", &["logo"])];
        assert!(suggest(&gigs, "   ", 10).is_empty());
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_SUGGESTION_LIMIT);
    }
}
