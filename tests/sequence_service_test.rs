mod common;

use sea_orm::TransactionTrait;
use stallkeeper_api::services::sequence;

use common::TestApp;

#[tokio::test]
async fn serialized_assignments_are_strictly_increasing_from_one() {
    let app = TestApp::new().await;

    for expected in 1..=5i64 {
        let txn = app.state.db.begin().await.unwrap();
        let order_no = sequence::next_order_no(&txn).await.unwrap();
        txn.commit().await.unwrap();
        assert_eq!(order_no, expected.to_string());
    }
}

#[tokio::test]
async fn rolled_back_transaction_does_not_consume_a_number() {
    let app = TestApp::new().await;

    let txn = app.state.db.begin().await.unwrap();
    let first = sequence::next_order_no(&txn).await.unwrap();
    assert_eq!(first, "1");
    txn.rollback().await.unwrap();

    let txn = app.state.db.begin().await.unwrap();
    let retried = sequence::next_order_no(&txn).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(retried, "1");
}

#[tokio::test]
async fn observing_a_numeric_order_no_advances_the_counter() {
    let app = TestApp::new().await;

    let txn = app.state.db.begin().await.unwrap();
    sequence::observe_order_no(&txn, "99").await.unwrap();
    txn.commit().await.unwrap();

    let txn = app.state.db.begin().await.unwrap();
    let next = sequence::next_order_no(&txn).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(next, "100");
}

#[tokio::test]
async fn observing_a_smaller_number_never_rewinds() {
    let app = TestApp::new().await;

    let txn = app.state.db.begin().await.unwrap();
    sequence::observe_order_no(&txn, "50").await.unwrap();
    sequence::observe_order_no(&txn, "7").await.unwrap();
    txn.commit().await.unwrap();

    let txn = app.state.db.begin().await.unwrap();
    let next = sequence::next_order_no(&txn).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(next, "51");
}

#[tokio::test]
async fn non_numeric_order_no_is_ignored() {
    let app = TestApp::new().await;

    let txn = app.state.db.begin().await.unwrap();
    sequence::observe_order_no(&txn, "counter-special").await.unwrap();
    txn.commit().await.unwrap();

    let txn = app.state.db.begin().await.unwrap();
    let next = sequence::next_order_no(&txn).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(next, "1");
}
