//! PlaceOrder command handler
//!
//! Creates a `pending` order for one package of a listable gig. The
//! package terms are copied onto the order so later gig edits never change
//! it. The buyer may not be the gig's seller.

use async_trait::async_trait;
use shared::models::PackageType;
use shared::order::{EventPayload, OrderEvent, OrderEventType, RequirementAnswer};
use shared::util::DAY_MILLIS;

use crate::orders::code::allocate_order_code;
use crate::orders::money::price_order;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, validate_order_files, validate_order_optional_text, validate_order_text,
};

/// Maximum requirement answers per order
const MAX_REQUIREMENTS: usize = 20;

/// PlaceOrder action
#[derive(Debug, Clone)]
pub struct PlaceOrderAction {
    pub gig_id: i64,
    pub package_type: PackageType,
    pub requirements: Vec<RequirementAnswer>,
}

impl PlaceOrderAction {
    fn validate_requirements(&self) -> Result<(), OrderError> {
        if self.requirements.len() > MAX_REQUIREMENTS {
            return Err(OrderError::InvalidInput(format!(
                "too many requirement answers ({}, max {MAX_REQUIREMENTS})",
                self.requirements.len()
            )));
        }
        for answer in &self.requirements {
            validate_order_text(&answer.question, "requirement question", MAX_MESSAGE_LEN)?;
            validate_order_optional_text(&answer.answer, "requirement answer", MAX_MESSAGE_LEN)?;
            validate_order_files(&answer.files)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for PlaceOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Only users place orders
        let buyer_id = metadata.require_user()?.to_string();

        // 2. Load gig
        let gig = ctx
            .find_gig(self.gig_id)?
            .ok_or(OrderError::GigNotFound(self.gig_id))?;
        if !gig.is_listable() {
            return Err(OrderError::GigNotListable(self.gig_id));
        }

        // 3. Buyer and seller must differ
        if gig.seller_id == buyer_id {
            return Err(OrderError::SelfOrder);
        }

        // 4. Resolve package tier
        let terms = gig.packages.get(self.package_type).ok_or_else(|| {
            OrderError::InvalidPackage(format!(
                "gig {} does not offer a {} package",
                gig.id, self.package_type
            ))
        })?;

        self.validate_requirements()?;

        // 5. Price, code, deadline
        let pricing = price_order(terms.price)?;
        let order_code = allocate_order_code(ctx)?;
        let order_id = uuid::Uuid::new_v4().to_string();
        let expected_delivery = ctx.now() + i64::from(terms.delivery_time) * DAY_MILLIS;

        // 6. Allocate sequence number
        let seq = ctx.next_sequence();

        // 7. Create event
        let event = OrderEvent::new(
            seq,
            order_id,
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                order_code,
                buyer_id,
                seller_id: gig.seller_id.clone(),
                gig_id: gig.id,
                gig_title: gig.title.clone(),
                package_type: self.package_type,
                title: terms.title.clone(),
                description: terms.description.clone(),
                price: pricing.price,
                service_fee: pricing.service_fee,
                total_amount: pricing.total_amount,
                delivery_time: terms.delivery_time,
                max_revisions: terms.revisions,
                expected_delivery,
                requirements: self.requirements.clone(),
            },
        );

        Ok(vec![event])
    }
}
