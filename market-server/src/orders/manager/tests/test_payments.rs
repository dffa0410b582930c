use super::*;
use shared::order::CommandErrorCode;

#[tokio::test]
async fn test_same_gateway_event_applied_once() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    let first = h.manager.execute_command(confirm_cmd("evt_pay_1", &order_id)).await;
    let second = h.manager.execute_command(confirm_cmd("evt_pay_1", &order_id)).await;
    assert!(first.success && second.success);

    assert_eq!(h.status_of(&order_id), OrderStatus::Active);
    assert_eq!(h.seller_stats("s1").ongoing_orders, 1);
    assert_eq!(h.gig_total_orders(1), 1);

    let confirmations = h
        .manager
        .get_events_for_order(&order_id)
        .unwrap()
        .iter()
        .filter(|e| e.event_type == OrderEventType::PaymentConfirmed)
        .count();
    assert_eq!(confirmations, 1);
}

#[tokio::test]
async fn test_redelivered_success_with_new_event_id_is_noop() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    h.manager.execute_command(confirm_cmd("evt_pay_1", &order_id)).await;
    let sequence = h.manager.get_current_sequence().unwrap();

    let resp = h.manager.execute_command(confirm_cmd("evt_pay_2", &order_id)).await;
    assert!(resp.success);
    assert_eq!(h.manager.get_current_sequence().unwrap(), sequence);
    assert_eq!(h.seller_stats("s1").ongoing_orders, 1);
    assert_eq!(h.gig_total_orders(1), 1);
    assert_eq!(
        h.notifier
            .kinds()
            .iter()
            .filter(|k| **k == "payment_received")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_failed_payment_cancels_without_counters() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    let resp = h
        .manager
        .execute_command(fail_cmd("evt_fail_1", &order_id, PaymentFailureReason::Failed))
        .await;
    assert!(resp.success);

    let snapshot = h.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Cancelled);
    assert_eq!(snapshot.payment_status, PaymentStatus::Failed);
    let cancellation = snapshot.cancellation.unwrap();
    assert_eq!(cancellation.reason, "Payment failed");
    assert_eq!(cancellation.cancelled_by, Actor::PaymentGateway);

    assert_eq!(h.seller_stats("s1").ongoing_orders, 0);
    assert_eq!(h.gig_total_orders(1), 0);
    assert_eq!(h.notifier.kinds(), vec!["order_placed"]);
}

#[tokio::test]
async fn test_expired_checkout_cancels() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    h.manager
        .execute_command(fail_cmd("evt_exp_1", &order_id, PaymentFailureReason::Expired))
        .await;
    let snapshot = h.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Cancelled);
    assert_eq!(
        snapshot.cancellation.unwrap().reason,
        "Checkout session expired"
    );
}

#[tokio::test]
async fn test_late_payment_events_ignored() {
    let h = create_test_manager();

    // Success after the order was cancelled
    let cancelled = place_order(&h, "b1").await;
    h.manager.execute_command(cancel_cmd("b1", &cancelled)).await;
    let resp = h.manager.execute_command(confirm_cmd("evt_late", &cancelled)).await;
    assert!(resp.success);
    assert_eq!(h.status_of(&cancelled), OrderStatus::Cancelled);
    assert_eq!(h.seller_stats("s1").ongoing_orders, 0);
    assert_eq!(h.gig_total_orders(1), 0);

    // Failure after the order was paid
    let paid = place_paid_order(&h, "b1").await;
    h.manager
        .execute_command(fail_cmd("evt_fail_late", &paid, PaymentFailureReason::Failed))
        .await;
    let snapshot = h.manager.get_snapshot(&paid).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Active);
    assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_payment_reference_lookup() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    let resp = h
        .manager
        .execute_command(gateway_cmd(
            "attach-cs_test_1",
            OrderCommandPayload::AttachPaymentReference {
                order_id: order_id.clone(),
                reference: "cs_test_1".to_string(),
            },
        ))
        .await;
    assert!(resp.success);

    let snapshot = h.manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.payment_reference.as_deref(), Some("cs_test_1"));
    assert_eq!(
        h.manager
            .find_order_by_payment_reference("cs_test_1")
            .unwrap()
            .as_deref(),
        Some(order_id.as_str())
    );
    assert!(h
        .manager
        .find_order_by_payment_reference("cs_unknown")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_confirmation_reference_is_indexed() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    h.manager
        .execute_command(gateway_cmd(
            "evt_ref",
            OrderCommandPayload::ConfirmPayment {
                order_id: order_id.clone(),
                payment_reference: Some("cs_live_9".to_string()),
            },
        ))
        .await;
    assert_eq!(
        h.manager
            .find_order_by_payment_reference("cs_live_9")
            .unwrap()
            .as_deref(),
        Some(order_id.as_str())
    );
}

#[tokio::test]
async fn test_users_cannot_drive_payments() {
    let h = create_test_manager();
    let order_id = place_order(&h, "b1").await;

    let resp = h
        .manager
        .execute_command(user_cmd(
            "b1",
            OrderCommandPayload::ConfirmPayment {
                order_id: order_id.clone(),
                payment_reference: None,
            },
        ))
        .await;
    assert_eq!(error_code(&resp), Some(CommandErrorCode::NotAuthorized));

    let resp = h
        .manager
        .execute_command(user_cmd(
            "s1",
            OrderCommandPayload::FailPayment {
                order_id: order_id.clone(),
                reason: PaymentFailureReason::Failed,
            },
        ))
        .await;
    assert_eq!(error_code(&resp), Some(CommandErrorCode::NotAuthorized));
    assert_eq!(h.status_of(&order_id), OrderStatus::Pending);

    // And the gateway cannot act as a party
    let resp = h
        .manager
        .execute_command(OrderCommand::new(
            Actor::PaymentGateway,
            OrderCommandPayload::CancelOrder {
                order_id: order_id.clone(),
                reason: "nope".to_string(),
            },
        ))
        .await;
    assert_eq!(error_code(&resp), Some(CommandErrorCode::NotAuthorized));
}

#[tokio::test]
async fn test_confirm_unknown_order() {
    let h = create_test_manager();
    let resp = h.manager.execute_command(confirm_cmd("evt_x", "missing")).await;
    assert_eq!(error_code(&resp), Some(CommandErrorCode::OrderNotFound));
}
