//! Gig Model

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of gig categories, serialized as their display names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Graphics & Design")]
    GraphicsDesign,
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
    #[serde(rename = "Writing & Translation")]
    WritingTranslation,
    #[serde(rename = "Video & Animation")]
    VideoAnimation,
    #[serde(rename = "Music & Audio")]
    MusicAudio,
    #[serde(rename = "Programming & Tech")]
    ProgrammingTech,
    Business,
    Lifestyle,
    Data,
    Photography,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::GraphicsDesign,
        Category::DigitalMarketing,
        Category::WritingTranslation,
        Category::VideoAnimation,
        Category::MusicAudio,
        Category::ProgrammingTech,
        Category::Business,
        Category::Lifestyle,
        Category::Data,
        Category::Photography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GraphicsDesign => "Graphics & Design",
            Category::DigitalMarketing => "Digital Marketing",
            Category::WritingTranslation => "Writing & Translation",
            Category::VideoAnimation => "Video & Animation",
            Category::MusicAudio => "Music & Audio",
            Category::ProgrammingTech => "Programming & Tech",
            Category::Business => "Business",
            Category::Lifestyle => "Lifestyle",
            Category::Data => "Data",
            Category::Photography => "Photography",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown category: {needle}"))
    }
}

/// Package tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Basic,
    Standard,
    Premium,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Basic => "basic",
            PackageType::Standard => "standard",
            PackageType::Premium => "premium",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(PackageType::Basic),
            "standard" => Ok(PackageType::Standard),
            "premium" => Ok(PackageType::Premium),
            other => Err(format!("unknown package type: {other}")),
        }
    }
}

/// Commercial terms of one package tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageTerms {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    /// Delivery time in days
    pub delivery_time: u32,
    pub revisions: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Up to three tiers; `basic` is mandatory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packages {
    pub basic: PackageTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<PackageTerms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<PackageTerms>,
}

impl Packages {
    /// Terms for a tier, if the gig offers it
    pub fn get(&self, tier: PackageType) -> Option<&PackageTerms> {
        match tier {
            PackageType::Basic => Some(&self.basic),
            PackageType::Standard => self.standard.as_ref(),
            PackageType::Premium => self.premium.as_ref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PackageType, &PackageTerms)> {
        [
            Some((PackageType::Basic, &self.basic)),
            self.standard.as_ref().map(|t| (PackageType::Standard, t)),
            self.premium.as_ref().map(|t| (PackageType::Premium, t)),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Counters owned by the order and review pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GigStats {
    pub total_orders: u64,
    /// Average rating, one decimal place
    pub total_rating: Decimal,
    pub total_reviews: u64,
    /// Sum of all review ratings, kept so the average can be recomputed exactly
    pub rating_sum: u64,
}

impl GigStats {
    /// Fold one more review into the aggregate
    pub fn record_review(&mut self, rating: u8) {
        self.rating_sum += rating as u64;
        self.total_reviews += 1;
        self.total_rating = average_rating(self.rating_sum, self.total_reviews);
    }
}

/// Average of `sum / count`, rounded to one decimal place with halves
/// rounding up (2.25 -> 2.3)
pub fn average_rating(sum: u64, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Gig entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gig {
    pub id: i64,
    /// Owning seller (immutable)
    pub seller_id: String,
    pub title: String,
    pub category: Category,
    pub subcategory: String,
    pub description: String,
    pub packages: Packages,
    /// Legacy mirror of `packages.basic.price`
    pub price: Decimal,
    /// Legacy mirror of `packages.basic.delivery_time`
    pub delivery_time: u32,
    /// Legacy mirror of `packages.basic.revisions`
    pub revisions: u32,
    pub tags: Vec<String>,
    pub search_tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
    pub stats: GigStats,
    pub is_active: bool,
    pub is_paused: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Gig {
    /// Eligible for search and browse
    pub fn is_listable(&self) -> bool {
        self.is_active && !self.is_paused
    }

    /// Copy the basic tier into the legacy scalar fields
    pub fn sync_legacy_pricing(&mut self) {
        self.price = self.packages.basic.price;
        self.delivery_time = self.packages.basic.delivery_time;
        self.revisions = self.packages.basic.revisions;
    }

    /// Rebuild `search_tags` from tags and title words
    pub fn refresh_search_tags(&mut self) {
        self.search_tags = derive_search_tags(&self.tags, &self.title);
    }

    pub fn basic_price(&self) -> Decimal {
        self.packages.basic.price
    }
}

/// Lowercased tags followed by lowercase title words, deduplicated in order
pub fn derive_search_tags(tags: &[String], title: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let words = title.split_whitespace().map(str::to_string);
    for candidate in tags.iter().cloned().chain(words) {
        let normalized = candidate.trim().to_lowercase();
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// Create gig payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GigCreate {
    pub title: String,
    pub category: Category,
    pub subcategory: String,
    pub description: String,
    pub packages: Packages,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub faq: Option<Vec<FaqEntry>>,
}

/// Update gig payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GigUpdate {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub packages: Option<Packages>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub faq: Option<Vec<FaqEntry>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_uses_display_name() {
        let json = serde_json::to_string(&Category::GraphicsDesign).unwrap();
        assert_eq!(json, "\"Graphics & Design\"");
        let parsed: Category = serde_json::from_str("\"Programming & Tech\"").unwrap();
        assert_eq!(parsed, Category::ProgrammingTech);
        assert!(serde_json::from_str::<Category>("\"Cooking\"").is_err());
    }

    #[test]
    fn test_category_from_str_ignores_case() {
        assert_eq!("data".parse::<Category>(), Ok(Category::Data));
        assert!("nope".parse::<Category>().is_err());
    }

    #[test]
    fn test_package_type_rejects_unknown_tier() {
        assert_eq!("premium".parse::<PackageType>(), Ok(PackageType::Premium));
        assert!("gold".parse::<PackageType>().is_err());
        assert!(serde_json::from_str::<PackageType>("\"gold\"").is_err());
    }

    #[test]
    fn test_derive_search_tags() {
        let tags = vec!["Logo".to_string(), "branding".to_string()];
        let derived = derive_search_tags(&tags, "I will design a professional logo");
        assert_eq!(
            derived,
            vec!["logo", "branding", "i", "will", "design", "a", "professional"]
        );
    }

    #[test]
    fn test_average_rating_one_decimal() {
        assert_eq!(average_rating(0, 0), Decimal::ZERO);
        assert_eq!(average_rating(14, 3).to_string(), "4.7");

        let mut stats = GigStats::default();
        stats.record_review(5);
        stats.record_review(4);
        assert_eq!(stats.total_reviews, 2);
        assert_eq!(stats.total_rating.to_string(), "4.5");
    }

    #[test]
    fn test_average_rating_half_rounds_up() {
        let mut stats = GigStats::default();
        for rating in [2, 2, 2, 3] {
            stats.record_review(rating);
        }
        assert_eq!(stats.total_rating, Decimal::new(23, 1));
        assert_eq!(average_rating(9, 4).to_string(), "2.3");
        assert_eq!(average_rating(7, 2).to_string(), "3.5");
    }
}
