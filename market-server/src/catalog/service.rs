//! Gig service: seller-facing catalog writes
//!
//! Every write keeps two derived fields in step with their sources: the
//! legacy `price`/`delivery_time`/`revisions` mirror `packages.basic`, and
//! `search_tags` is rebuilt from tags and title.

use shared::error::{AppError, AppResult};
use shared::models::{FaqEntry, Gig, GigCreate, GigStats, GigUpdate, Packages};
use shared::response::PaginatedResponse;

use crate::accounts::AccountStorage;
use crate::catalog::CatalogStorage;
use crate::utils::validation::{
    MAX_GIG_DESCRIPTION_LEN, MAX_GIG_TITLE_LEN, MAX_NAME_LEN, MAX_TAGS, MAX_URL_LEN,
    validate_package, validate_required_text, validate_text_list,
};

/// Images and requirement prompts per gig
const MAX_LIST_ITEMS: usize = 20;

#[derive(Debug, Clone)]
pub struct GigService {
    catalog: CatalogStorage,
    accounts: AccountStorage,
}

impl GigService {
    pub fn new(catalog: CatalogStorage, accounts: AccountStorage) -> Self {
        Self { catalog, accounts }
    }

    pub fn get_gig(&self, gig_id: i64) -> AppResult<Gig> {
        self.catalog
            .get_gig(gig_id)?
            .ok_or_else(|| AppError::gig_not_found(gig_id.to_string()))
    }

    /// Publish a new gig for a seller
    pub fn create_gig(&self, seller_id: &str, input: GigCreate, now: i64) -> AppResult<Gig> {
        let seller = self
            .accounts
            .get_user(seller_id)?
            .ok_or_else(|| AppError::user_not_found(seller_id))?;
        if !seller.is_seller {
            return Err(AppError::seller_required());
        }

        validate_title(&input.title)?;
        validate_required_text(&input.description, "description", MAX_GIG_DESCRIPTION_LEN)?;
        validate_required_text(&input.subcategory, "subcategory", MAX_NAME_LEN)?;
        validate_packages(&input.packages)?;
        let tags = input.tags.unwrap_or_default();
        validate_text_list(&tags, "tags", MAX_TAGS, MAX_NAME_LEN)?;
        let images = input.images.unwrap_or_default();
        validate_text_list(&images, "images", MAX_LIST_ITEMS, MAX_URL_LEN)?;
        let requirements = input.requirements.unwrap_or_default();
        validate_text_list(&requirements, "requirements", MAX_LIST_ITEMS, MAX_GIG_DESCRIPTION_LEN)?;
        let faq = input.faq.unwrap_or_default();
        validate_faq(&faq)?;

        let mut gig = Gig {
            id: shared::util::snowflake_id(),
            seller_id: seller_id.to_string(),
            title: input.title.trim().to_string(),
            category: input.category,
            subcategory: input.subcategory.trim().to_string(),
            description: input.description,
            packages: input.packages,
            price: Default::default(),
            delivery_time: 0,
            revisions: 0,
            tags,
            search_tags: vec![],
            images,
            requirements,
            faq,
            stats: GigStats::default(),
            is_active: true,
            is_paused: false,
            created_at: now,
            updated_at: now,
        };
        gig.sync_legacy_pricing();
        gig.refresh_search_tags();

        self.catalog.put_gig(&gig)?;
        tracing::info!(gig_id = gig.id, seller_id = %seller_id, "Gig created");
        Ok(gig)
    }

    /// Owner-only partial update
    pub fn update_gig(
        &self,
        actor_id: &str,
        gig_id: i64,
        update: GigUpdate,
        now: i64,
    ) -> AppResult<Gig> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(description) = &update.description {
            validate_required_text(description, "description", MAX_GIG_DESCRIPTION_LEN)?;
        }
        if let Some(subcategory) = &update.subcategory {
            validate_required_text(subcategory, "subcategory", MAX_NAME_LEN)?;
        }
        if let Some(packages) = &update.packages {
            validate_packages(packages)?;
        }
        if let Some(tags) = &update.tags {
            validate_text_list(tags, "tags", MAX_TAGS, MAX_NAME_LEN)?;
        }
        if let Some(images) = &update.images {
            validate_text_list(images, "images", MAX_LIST_ITEMS, MAX_URL_LEN)?;
        }
        if let Some(requirements) = &update.requirements {
            validate_text_list(
                requirements,
                "requirements",
                MAX_LIST_ITEMS,
                MAX_GIG_DESCRIPTION_LEN,
            )?;
        }
        if let Some(faq) = &update.faq {
            validate_faq(faq)?;
        }

        let updated = self.catalog.modify_gig(gig_id, |gig| {
            ensure_owner(gig, actor_id)?;
            apply_update(gig, update, now);
            Ok::<(), AppError>(())
        })?;
        let gig = updated.ok_or_else(|| AppError::gig_not_found(gig_id.to_string()))?;
        tracing::info!(gig_id, "Gig updated");
        Ok(gig)
    }

    /// Owner-only hard delete
    pub fn delete_gig(&self, actor_id: &str, gig_id: i64) -> AppResult<()> {
        let gig = self.get_gig(gig_id)?;
        ensure_owner(&gig, actor_id)?;
        self.catalog.delete_gig(gig_id)?;
        tracing::info!(gig_id, "Gig deleted");
        Ok(())
    }

    /// Flip `is_paused`; returns the new gig
    pub fn toggle_pause(&self, actor_id: &str, gig_id: i64, now: i64) -> AppResult<Gig> {
        let updated = self.catalog.modify_gig(gig_id, |gig| {
            ensure_owner(gig, actor_id)?;
            gig.is_paused = !gig.is_paused;
            gig.updated_at = now;
            Ok::<(), AppError>(())
        })?;
        let gig = updated.ok_or_else(|| AppError::gig_not_found(gig_id.to_string()))?;
        tracing::info!(gig_id, is_paused = gig.is_paused, "Gig pause toggled");
        Ok(gig)
    }

    /// A seller's gigs, newest first, paused ones included
    pub fn list_seller_gigs(
        &self,
        seller_id: &str,
        page: u32,
        limit: u32,
    ) -> AppResult<PaginatedResponse<Gig>> {
        let mut gigs = self.catalog.gigs_by_seller(seller_id)?;
        gigs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(PaginatedResponse::from_sorted(gigs, page, limit))
    }
}

fn ensure_owner(gig: &Gig, actor_id: &str) -> AppResult<()> {
    if gig.seller_id != actor_id {
        return Err(AppError::not_gig_owner(gig.id));
    }
    Ok(())
}

fn validate_title(title: &str) -> AppResult<()> {
    validate_required_text(title, "title", MAX_GIG_TITLE_LEN)
}

fn validate_faq(faq: &[FaqEntry]) -> AppResult<()> {
    if faq.len() > MAX_LIST_ITEMS {
        return Err(AppError::validation(format!(
            "faq has too many entries ({}, max {MAX_LIST_ITEMS})",
            faq.len()
        )));
    }
    for entry in faq {
        validate_required_text(&entry.question, "faq.question", MAX_GIG_DESCRIPTION_LEN)?;
        validate_required_text(&entry.answer, "faq.answer", MAX_GIG_DESCRIPTION_LEN)?;
    }
    Ok(())
}

fn validate_packages(packages: &Packages) -> AppResult<()> {
    for (tier, terms) in packages.iter() {
        validate_package(terms, tier.as_str())?;
    }
    Ok(())
}

fn apply_update(gig: &mut Gig, update: GigUpdate, now: i64) {
    let mut retag = false;
    if let Some(title) = update.title {
        gig.title = title.trim().to_string();
        retag = true;
    }
    if let Some(tags) = update.tags {
        gig.tags = tags;
        retag = true;
    }
    if let Some(category) = update.category {
        gig.category = category;
    }
    if let Some(subcategory) = update.subcategory {
        gig.subcategory = subcategory.trim().to_string();
    }
    if let Some(description) = update.description {
        gig.description = description;
    }
    if let Some(packages) = update.packages {
        gig.packages = packages;
        gig.sync_legacy_pricing();
    }
    if let Some(images) = update.images {
        gig.images = images;
    }
    if let Some(requirements) = update.requirements {
        gig.requirements = requirements;
    }
    if let Some(faq) = update.faq {
        gig.faq = faq;
    }
    if let Some(is_active) = update.is_active {
        gig.is_active = is_active;
    }
    if retag {
        gig.refresh_search_tags();
    }
    gig.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use crate::catalog::storage::tests::terms;
    use rust_decimal::Decimal;
    use shared::models::{Category, UserProfile};

    fn service() -> GigService {
        let db = crate::db::open_in_memory().unwrap();
        let catalog = CatalogStorage::new(db.clone()).unwrap();
        let accounts = AccountStorage::new(db).unwrap();
        let mut seller = UserProfile::new("s1", "seller", 0);
        seller.is_seller = true;
        accounts.put_user(&seller).unwrap();
        let mut other = UserProfile::new("s2", "other seller", 0);
        other.is_seller = true;
        accounts.put_user(&other).unwrap();
        accounts.put_user(&UserProfile::new("b1", "buyer", 0)).unwrap();
        GigService::new(catalog, accounts)
    }

    fn create_input() -> GigCreate {
        GigCreate {
            title: "I will design a professional logo".to_string(),
            category: Category::GraphicsDesign,
            subcategory: "Logo Design".to_string(),
            description: "Custom logos with unlimited concepts".to_string(),
            packages: Packages {
                basic: terms(100, 3, 1),
                standard: Some(terms(200, 5, 3)),
                premium: None,
            },
            tags: Some(vec!["Logo".to_string(), "branding".to_string()]),
            images: None,
            requirements: None,
            faq: None,
        }
    }

    #[test]
    fn test_create_syncs_derived_fields() {
        let service = service();
        let gig = service.create_gig("s1", create_input(), 42).unwrap();

        assert_eq!(gig.price, Decimal::from(100));
        assert_eq!(gig.delivery_time, 3);
        assert_eq!(gig.revisions, 1);
        assert!(gig.is_listable());
        assert!(gig.search_tags.contains(&"logo".to_string()));
        assert!(gig.search_tags.contains(&"professional".to_string()));
        assert_eq!(service.get_gig(gig.id).unwrap(), gig);
    }

    #[test]
    fn test_create_requires_seller_and_valid_input() {
        let service = service();
        let err = service.create_gig("b1", create_input(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::SellerRequired);

        let err = service.create_gig("nobody", create_input(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);

        let mut input = create_input();
        input.title = "x".repeat(MAX_GIG_TITLE_LEN + 1);
        let err = service.create_gig("s1", input, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut input = create_input();
        input.packages.basic = terms(0, 3, 1);
        let err = service.create_gig("s1", input, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::GigInvalidPrice);
    }

    #[test]
    fn test_update_keeps_legacy_mirror() {
        let service = service();
        let gig = service.create_gig("s1", create_input(), 1).unwrap();

        let update = GigUpdate {
            packages: Some(Packages {
                basic: terms(150, 2, 4),
                standard: None,
                premium: None,
            }),
            title: Some("I will draw a mascot".to_string()),
            ..GigUpdate::default()
        };
        let updated = service.update_gig("s1", gig.id, update, 2).unwrap();

        assert_eq!(updated.price, updated.packages.basic.price);
        assert_eq!(updated.delivery_time, 2);
        assert_eq!(updated.revisions, 4);
        assert!(updated.search_tags.contains(&"mascot".to_string()));
        assert!(!updated.search_tags.contains(&"professional".to_string()));
        assert_eq!(updated.updated_at, 2);
        assert_eq!(updated.seller_id, "s1");

        // Unrelated update leaves the mirror alone
        let updated = service
            .update_gig(
                "s1",
                gig.id,
                GigUpdate {
                    description: Some("New copy".to_string()),
                    ..GigUpdate::default()
                },
                3,
            )
            .unwrap();
        assert_eq!(updated.price, Decimal::from(150));
    }

    #[test]
    fn test_update_validates_requirements_and_faq() {
        let service = service();
        let gig = service.create_gig("s1", create_input(), 1).unwrap();

        let update = GigUpdate {
            requirements: Some(vec!["Brand name".to_string(); MAX_LIST_ITEMS + 1]),
            ..GigUpdate::default()
        };
        let err = service.update_gig("s1", gig.id, update, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let update = GigUpdate {
            requirements: Some(vec!["x".repeat(MAX_GIG_DESCRIPTION_LEN + 1)]),
            ..GigUpdate::default()
        };
        let err = service.update_gig("s1", gig.id, update, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let update = GigUpdate {
            faq: Some(vec![FaqEntry {
                question: "Do you offer source files?".to_string(),
                answer: "   ".to_string(),
            }]),
            ..GigUpdate::default()
        };
        let err = service.update_gig("s1", gig.id, update, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        // Rejected updates leave the stored gig untouched
        let stored = service.get_gig(gig.id).unwrap();
        assert!(stored.requirements.is_empty());
        assert!(stored.faq.is_empty());
        assert_eq!(stored.updated_at, 1);

        let update = GigUpdate {
            requirements: Some(vec!["Brand name".to_string()]),
            faq: Some(vec![FaqEntry {
                question: "Do you offer source files?".to_string(),
                answer: "Yes, in the premium package".to_string(),
            }]),
            ..GigUpdate::default()
        };
        let updated = service.update_gig("s1", gig.id, update, 3).unwrap();
        assert_eq!(updated.requirements, vec!["Brand name".to_string()]);
        assert_eq!(updated.faq.len(), 1);
    }

    #[test]
    fn test_owner_only_writes() {
        let service = service();
        let gig = service.create_gig("s1", create_input(), 1).unwrap();

        let err = service
            .update_gig("s2", gig.id, GigUpdate::default(), 2)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotGigOwner);
        assert_eq!(
            service.toggle_pause("s2", gig.id, 2).unwrap_err().code,
            ErrorCode::NotGigOwner
        );
        assert_eq!(
            service.delete_gig("s2", gig.id).unwrap_err().code,
            ErrorCode::NotGigOwner
        );
        assert_eq!(
            service
                .update_gig("s1", 404, GigUpdate::default(), 2)
                .unwrap_err()
                .code,
            ErrorCode::GigNotFound
        );
    }

    #[test]
    fn test_pause_and_delete() {
        let service = service();
        let gig = service.create_gig("s1", create_input(), 1).unwrap();

        let paused = service.toggle_pause("s1", gig.id, 2).unwrap();
        assert!(paused.is_paused);
        assert!(!paused.is_listable());
        assert!(!service.toggle_pause("s1", gig.id, 3).unwrap().is_paused);

        service.delete_gig("s1", gig.id).unwrap();
        assert_eq!(
            service.get_gig(gig.id).unwrap_err().code,
            ErrorCode::GigNotFound
        );
    }

    #[test]
    fn test_list_seller_gigs_newest_first() {
        let service = service();
        let older = service.create_gig("s1", create_input(), 10).unwrap();
        let newer = service.create_gig("s1", create_input(), 20).unwrap();
        service.create_gig("s2", create_input(), 30).unwrap();
        service.toggle_pause("s1", older.id, 40).unwrap();

        let page = service.list_seller_gigs("s1", 1, 20).unwrap();
        let ids: Vec<i64> = page.items.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(page.pagination.total, 2);
    }
}
