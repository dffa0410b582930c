//! Query Matcher
//!
//! Decides whether a gig matches a free-text query and which fields it
//! matched in. Matching is case-insensitive substring: the whole query or
//! any whitespace-separated token, across title, description, category,
//! subcategory, tags and search tags.

use shared::models::Gig;

/// Score contributed by each matched field
pub const TITLE_WEIGHT: u32 = 10;
pub const TAG_EXACT_WEIGHT: u32 = 8;
pub const CATEGORY_WEIGHT: u32 = 5;
pub const DESCRIPTION_WEIGHT: u32 = 3;

/// Normalized query text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerms {
    /// Whole query, trimmed and lowercased
    pub whole: String,
    /// Lowercased whitespace tokens, deduplicated
    pub tokens: Vec<String>,
}

impl QueryTerms {
    /// `None` for an empty or whitespace-only query (browse mode)
    pub fn parse(raw: &str) -> Option<Self> {
        let whole = raw.trim().to_lowercase();
        if whole.is_empty() {
            return None;
        }
        let mut tokens: Vec<String> = Vec::new();
        for token in whole.split_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        Some(Self { whole, tokens })
    }

    /// Whole query or any token occurs in `field`
    fn found_in(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        field.contains(&self.whole) || self.tokens.iter().any(|t| field.contains(t.as_str()))
    }

    /// Some tag equals the whole query or one of its tokens
    fn tag_equals(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        tag == self.whole || self.tokens.iter().any(|t| *t == tag)
    }
}

/// Fields a gig matched in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMatches {
    pub title: bool,
    pub description: bool,
    pub category: bool,
    pub subcategory: bool,
    pub tag: bool,
    pub tag_exact: bool,
}

impl FieldMatches {
    pub fn any(&self) -> bool {
        self.title || self.description || self.category || self.subcategory || self.tag
    }

    /// Additive weighted-field score
    pub fn score(&self) -> u32 {
        let mut score = 0;
        if self.title {
            score += TITLE_WEIGHT;
        }
        if self.tag_exact {
            score += TAG_EXACT_WEIGHT;
        }
        if self.category {
            score += CATEGORY_WEIGHT;
        }
        if self.description {
            score += DESCRIPTION_WEIGHT;
        }
        score
    }
}

/// Match one gig against the query
pub fn match_fields(gig: &Gig, terms: &QueryTerms) -> FieldMatches {
    let all_tags = || gig.tags.iter().chain(gig.search_tags.iter());
    FieldMatches {
        title: terms.found_in(&gig.title),
        description: terms.found_in(&gig.description),
        category: terms.found_in(gig.category.as_str()),
        subcategory: terms.found_in(&gig.subcategory),
        tag: all_tags().any(|t| terms.found_in(t)),
        tag_exact: gig.tags.iter().any(|t| terms.tag_equals(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::storage::tests::sample_gig;
    use shared::models::Category;

    #[test]
    fn test_parse_query() {
        assert_eq!(QueryTerms::parse("   "), None);
        let terms = QueryTerms::parse("  Logo  DESIGN logo ").unwrap();
        assert_eq!(terms.whole, "logo  design logo");
        assert_eq!(terms.tokens, vec!["logo", "design"]);
    }

    #[test]
    fn test_title_and_exact_tag() {
        let mut gig = sample_gig(1, "s1", "I will design a professional logo");
        gig.tags = vec!["Logo".to_string(), "branding".to_string()];
        gig.refresh_search_tags();

        let m = match_fields(&gig, &QueryTerms::parse("logo design").unwrap());
        assert!(m.title && m.tag_exact && m.tag);
        assert!(!m.description);
        // "design" also hits the "Graphics & Design" category name
        assert!(m.category);
        assert_eq!(m.score(), TITLE_WEIGHT + TAG_EXACT_WEIGHT + CATEGORY_WEIGHT);

        let m = match_fields(&gig, &QueryTerms::parse("logo").unwrap());
        assert!(!m.category);
        assert_eq!(m.score(), TITLE_WEIGHT + TAG_EXACT_WEIGHT);
    }

    #[test]
    fn test_tag_substring_is_not_exact() {
        let mut gig = sample_gig(1, "s1", "Brand kit");
        gig.tags = vec!["logotype".to_string()];
        let m = match_fields(&gig, &QueryTerms::parse("logo").unwrap());
        assert!(m.tag);
        assert!(!m.tag_exact);
        assert_eq!(m.score(), 0);
        assert!(m.any());
    }

    #[test]
    fn test_category_and_subcategory() {
        let mut gig = sample_gig(1, "s1", "Monthly bookkeeping");
        gig.category = Category::Business;
        gig.subcategory = "Accounting".to_string();

        let m = match_fields(&gig, &QueryTerms::parse("business").unwrap());
        assert!(m.category);
        assert_eq!(m.score(), CATEGORY_WEIGHT);

        let m = match_fields(&gig, &QueryTerms::parse("accounting").unwrap());
        assert!(m.subcategory && m.any());
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn test_no_match() {
        let gig = sample_gig(1, "s1", "Podcast editing");
        assert!(!match_fields(&gig, &QueryTerms::parse("wordpress").unwrap()).any());
    }
}
