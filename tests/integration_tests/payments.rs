use crate::{common::test_context::TestContext, integration_tests::helpers};
use futures::future::try_join_all;
use payplug_rust::{apis::payments::Payment, Error};

#[tokio::test]
async fn create_payment() {
    let ctx = TestContext::start().await;
    let tracker = helpers::new_tracker();

    let payment = helpers::create_payment(&ctx, &tracker).await.unwrap();

    assert_eq!(payment.tracker(), Some(tracker.as_str()));
    assert!(payment.id().is_some());
    assert!(payment.payment_url().is_some());
    assert!(!payment.is_paid());
    assert!(!payment.is_refunded());
    assert!(!payment.is_failed());
}

#[tokio::test]
async fn create_invalid_payment() {
    let ctx = TestContext::start().await;

    // No amount nor currency
    let mut payment =
        Payment::new(&ctx.client, &helpers::new_tracker(), Default::default()).unwrap();
    let err = payment.send_create().await.expect_err("Expected error");

    assert!(matches!(
        err,
        Error::Functional(details) if details.status() == Some(400)
            && details.request() == Some("POST /v1/payments")
    ));
    assert!(payment.id().is_none());
}

#[tokio::test]
async fn list_contains_the_created_payment() {
    let ctx = TestContext::start().await;
    let tracker = helpers::new_tracker();
    let payment = helpers::create_payment(&ctx, &tracker).await.unwrap();

    let list = Payment::list(&ctx.client, None, None).await.unwrap();

    let new_payments = list
        .iter()
        .filter(|p| p.id() == payment.id())
        .collect::<Vec<_>>();
    assert_eq!(new_payments.len(), 1);
    assert_eq!(new_payments[0].tracker(), payment.tracker());
    assert_eq!(new_payments[0].amount(), payment.amount());
    assert!(!new_payments[0].is_paid());
    assert!(!new_payments[0].is_refunded());
}

#[tokio::test]
async fn retrieve_the_created_payment() {
    let ctx = TestContext::start().await;
    let tracker = helpers::new_tracker();
    let payment = helpers::create_payment(&ctx, &tracker).await.unwrap();

    let retrieved = Payment::retrieve(&ctx.client, payment.id().unwrap())
        .await
        .unwrap();

    assert_eq!(retrieved.id(), payment.id());
    assert_eq!(retrieved.tracker(), payment.tracker());
    assert_eq!(retrieved.amount(), payment.amount());
    assert_eq!(retrieved.payment_url(), payment.payment_url());
}

#[tokio::test]
async fn retrieve_unknown_payment() {
    let ctx = TestContext::start().await;

    let err = Payment::retrieve(&ctx.client, "pay_unknown")
        .await
        .expect_err("Expected error");

    assert!(matches!(
        err,
        Error::Functional(details) if details.status() == Some(404)
    ));
}

#[tokio::test]
async fn abort_the_created_payment() {
    let ctx = TestContext::start().await;
    let tracker = helpers::new_tracker();
    let mut payment = helpers::create_payment(&ctx, &tracker).await.unwrap();
    let id = payment.id().map(str::to_string);
    let amount = payment.amount();

    let aborted = payment.send_abort().await.unwrap();

    assert_eq!(aborted.id().map(str::to_string), id);
    assert_eq!(aborted.tracker(), Some(tracker.as_str()));
    assert_eq!(aborted.amount(), amount);
    assert!(aborted.failure().is_some());
    assert_eq!(aborted.failure_code(), Some(Payment::ABORT_STATUS));
    assert!(aborted.failure_message().is_some());
    assert!(aborted.is_failed());
    assert!(aborted.is_aborted());
}

#[tokio::test]
async fn abort_all_pending_payments_concurrently() {
    let ctx = TestContext::start().await;
    for _ in 0..3 {
        helpers::create_payment(&ctx, &helpers::new_tracker())
            .await
            .unwrap();
    }

    let mut list = Payment::list(&ctx.client, None, None).await.unwrap();
    let aborted = try_join_all(
        list.iter_mut()
            .filter(|p| !p.is_failed() && !p.is_paid())
            .map(|p| p.send_abort()),
    )
    .await
    .unwrap();

    assert!(aborted.len() >= 3);
    assert!(aborted.iter().all(|p| p.is_aborted()));
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn list_skips_payments_without_tracker() {
    let ctx = TestContext::start().await;
    let tracker = helpers::new_tracker();
    let payment = helpers::create_payment(&ctx, &tracker).await.unwrap();
    ctx.insert_gateway_payment(serde_json::json!({
        "id": "pay_foreign",
        "object": "payment",
        "amount": 500,
        "currency": "EUR",
        "metadata": { "order": "42" }
    }));

    let list = Payment::list(&ctx.client, Some(10), Some(0)).await.unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id(), payment.id());
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn list_pages() {
    let ctx = TestContext::start().await;
    let mut trackers = Vec::new();
    for _ in 0..3 {
        let tracker = helpers::new_tracker();
        helpers::create_payment(&ctx, &tracker).await.unwrap();
        trackers.push(tracker);
    }

    let first = Payment::list_page(&ctx.client, Some(2), None).await.unwrap();
    let second = Payment::list_page(&ctx.client, Some(2), Some(1)).await.unwrap();

    // Newest first
    assert!(first.has_more);
    assert_eq!(
        first.payments.iter().map(|p| p.tracker()).collect::<Vec<_>>(),
        vec![Some(trackers[2].as_str()), Some(trackers[1].as_str())]
    );
    assert!(!second.has_more);
    assert_eq!(second.payments.len(), 1);
    assert_eq!(second.payments[0].tracker(), Some(trackers[0].as_str()));
}
