use super::*;
use rust_decimal::Decimal;
use shared::order::SellerEarnings;

/// b1: one completed and one paid order; b2: one refunded, one unpaid
async fn seed_report_orders(h: &Harness) -> (String, String, String, String) {
    let completed = place_completed_order(h, "b1").await;
    let paid = place_paid_order(h, "b1").await;
    let refunded = place_paid_order(h, "b2").await;
    let resp = h.manager.execute_command(cancel_cmd("s1", &refunded)).await;
    assert!(resp.success);
    let unpaid = place_order(h, "b2").await;
    (completed, paid, refunded, unpaid)
}

#[tokio::test]
async fn test_seller_earnings_split_released_and_pending() {
    let h = create_test_manager();
    seed_report_orders(&h).await;

    let earnings = h.manager.seller_earnings("s1").unwrap();
    assert_eq!(earnings.released_earnings, Decimal::from(100));
    assert_eq!(earnings.pending_earnings, Decimal::from(100));
    assert_eq!(earnings.total_earnings, Decimal::from(200));
    assert_eq!(earnings.total_orders, 2);

    // Buyers earn nothing
    assert_eq!(h.manager.seller_earnings("b1").unwrap(), SellerEarnings::default());
}

#[tokio::test]
async fn test_buyer_spending_counts_charged_totals() {
    let h = create_test_manager();
    seed_report_orders(&h).await;

    let b1 = h.manager.buyer_spending("b1").unwrap();
    assert_eq!(b1.total_spent, Decimal::from(210));
    assert_eq!(b1.total_orders, 2);
    assert_eq!(b1.average_order_value, Decimal::from(105));
    assert_eq!(b1.refunded_amount, Decimal::ZERO);

    let b2 = h.manager.buyer_spending("b2").unwrap();
    assert_eq!(b2.total_spent, Decimal::ZERO);
    assert_eq!(b2.total_orders, 0);
    assert_eq!(b2.average_order_value, Decimal::ZERO);
    assert_eq!(b2.refunded_amount, Decimal::from(105));
}

#[tokio::test]
async fn test_payment_history_lists_paid_orders_per_side() {
    let h = create_test_manager();
    let (completed, paid, refunded, unpaid) = seed_report_orders(&h).await;

    let seller = h.manager.payment_history("s1", 1, 20).unwrap();
    assert_eq!(seller.pagination.total, 3);
    let ids: Vec<&str> = seller.items.iter().map(|r| r.order_id.as_str()).collect();
    for id in [&completed, &paid, &refunded] {
        assert!(ids.contains(&id.as_str()));
    }
    assert!(!ids.contains(&unpaid.as_str()));
    assert!(seller.items.iter().all(|r| r.role == PartyRole::Seller));
    assert!(seller.items.iter().all(|r| r.amount == Decimal::from(100)));
    assert!(
        seller
            .items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );

    let buyer = h.manager.payment_history("b2", 1, 20).unwrap();
    assert_eq!(buyer.items.len(), 1);
    let record = &buyer.items[0];
    assert_eq!(record.order_id, refunded);
    assert_eq!(record.role, PartyRole::Buyer);
    assert_eq!(record.amount, Decimal::from(105));
    assert_eq!(record.payment_status, PaymentStatus::Refunded);

    let page = h.manager.payment_history("s1", 2, 2).unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(h.manager.payment_history("nobody", 1, 20).unwrap().items.is_empty());
}
