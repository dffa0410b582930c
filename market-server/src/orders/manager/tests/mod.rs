use super::*;
use crate::catalog::storage::tests::{sample_gig, terms};
use crate::notify::testing::RecordingEmitter;
use shared::models::{PackageType, SellerStats, UserProfile};
use shared::order::{Actor, OrderCommandPayload, OrderEventType, PaymentFailureReason};

/// Manager plus direct handles on the stores it writes
struct Harness {
    manager: OrdersManager,
    catalog: CatalogStorage,
    accounts: AccountStorage,
    notifier: Arc<RecordingEmitter>,
}

impl Harness {
    fn seller_stats(&self, seller_id: &str) -> SellerStats {
        self.accounts.get_user(seller_id).unwrap().unwrap().stats
    }

    fn gig_total_orders(&self, gig_id: i64) -> u64 {
        self.catalog.get_gig(gig_id).unwrap().unwrap().stats.total_orders
    }

    fn status_of(&self, order_id: &str) -> OrderStatus {
        self.manager
            .get_snapshot(order_id)
            .unwrap()
            .unwrap()
            .status
    }
}

fn build_manager(notifier: Arc<dyn NotificationEmitter>) -> (OrdersManager, CatalogStorage, AccountStorage) {
    let db = crate::db::open_in_memory().unwrap();
    let storage = OrderStorage::new(db.clone()).unwrap();
    let catalog = CatalogStorage::new(db.clone()).unwrap();
    let accounts = AccountStorage::new(db).unwrap();

    let mut seller = UserProfile::new("s1", "seller", 0);
    seller.is_seller = true;
    accounts.put_user(&seller).unwrap();
    accounts.put_user(&UserProfile::new("b1", "buyer", 0)).unwrap();
    accounts.put_user(&UserProfile::new("b2", "other buyer", 0)).unwrap();
    catalog.put_gig(&sample_gig(1, "s1", "I will design a logo")).unwrap();

    let manager = OrdersManager::new(storage, catalog.clone(), accounts.clone(), notifier);
    (manager, catalog, accounts)
}

/// Seller `s1` with gig 1 (basic: 100, 3 days, 1 revision), buyers `b1`, `b2`
fn create_test_manager() -> Harness {
    let notifier = Arc::new(RecordingEmitter::default());
    let (manager, catalog, accounts) = build_manager(notifier.clone());
    Harness {
        manager,
        catalog,
        accounts,
        notifier,
    }
}

fn user_cmd(user_id: &str, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(Actor::user(user_id), payload)
}

fn gateway_cmd(event_id: &str, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(Actor::PaymentGateway, payload).with_id(event_id)
}

fn place_cmd(buyer_id: &str, gig_id: i64, package_type: PackageType) -> OrderCommand {
    user_cmd(
        buyer_id,
        OrderCommandPayload::PlaceOrder {
            gig_id,
            package_type,
            requirements: vec![],
        },
    )
}

fn confirm_cmd(event_id: &str, order_id: &str) -> OrderCommand {
    gateway_cmd(
        event_id,
        OrderCommandPayload::ConfirmPayment {
            order_id: order_id.to_string(),
            payment_reference: None,
        },
    )
}

fn deliver_cmd(seller_id: &str, order_id: &str) -> OrderCommand {
    user_cmd(
        seller_id,
        OrderCommandPayload::DeliverWork {
            order_id: order_id.to_string(),
            message: "Here is the work".to_string(),
            files: vec!["https://files.example/final.png".to_string()],
        },
    )
}

fn accept_cmd(buyer_id: &str, order_id: &str) -> OrderCommand {
    user_cmd(
        buyer_id,
        OrderCommandPayload::AcceptDelivery {
            order_id: order_id.to_string(),
        },
    )
}

fn revision_cmd(buyer_id: &str, order_id: &str) -> OrderCommand {
    user_cmd(
        buyer_id,
        OrderCommandPayload::RequestRevision {
            order_id: order_id.to_string(),
            message: "Please change the colors".to_string(),
        },
    )
}

fn cancel_cmd(user_id: &str, order_id: &str) -> OrderCommand {
    user_cmd(
        user_id,
        OrderCommandPayload::CancelOrder {
            order_id: order_id.to_string(),
            reason: "Plans changed".to_string(),
        },
    )
}

fn review_cmd(buyer_id: &str, order_id: &str, rating: u8) -> OrderCommand {
    user_cmd(
        buyer_id,
        OrderCommandPayload::LeaveReview {
            order_id: order_id.to_string(),
            rating,
            comment: "Great work".to_string(),
        },
    )
}

fn fail_cmd(event_id: &str, order_id: &str, reason: PaymentFailureReason) -> OrderCommand {
    gateway_cmd(
        event_id,
        OrderCommandPayload::FailPayment {
            order_id: order_id.to_string(),
            reason,
        },
    )
}

// ========================================================================
// Helpers: drive an order to a given state
// ========================================================================

async fn place_order(h: &Harness, buyer_id: &str) -> String {
    let resp = h
        .manager
        .execute_command(place_cmd(buyer_id, 1, PackageType::Basic))
        .await;
    assert!(resp.success, "Failed to place order: {:?}", resp.error);
    resp.order_id.unwrap()
}

async fn place_paid_order(h: &Harness, buyer_id: &str) -> String {
    let order_id = place_order(h, buyer_id).await;
    let event_id = format!("evt-paid-{order_id}");
    let resp = h.manager.execute_command(confirm_cmd(&event_id, &order_id)).await;
    assert!(resp.success, "Failed to confirm payment");
    order_id
}

async fn place_delivered_order(h: &Harness, buyer_id: &str) -> String {
    let order_id = place_paid_order(h, buyer_id).await;
    let resp = h.manager.execute_command(deliver_cmd("s1", &order_id)).await;
    assert!(resp.success, "Failed to deliver");
    order_id
}

async fn place_completed_order(h: &Harness, buyer_id: &str) -> String {
    let order_id = place_delivered_order(h, buyer_id).await;
    let resp = h.manager.execute_command(accept_cmd(buyer_id, &order_id)).await;
    assert!(resp.success, "Failed to accept");
    order_id
}

fn error_code(resp: &CommandResponse) -> Option<shared::order::CommandErrorCode> {
    resp.error.as_ref().map(|e| e.code)
}

mod test_payments;
mod test_reports;
