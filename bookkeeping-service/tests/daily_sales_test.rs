mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn list_by_day_and_by_month() {
    let app = TestApp::spawn().await;
    app.create_daily_sale("2024-05-01", 100.0, 10.0).await;
    app.create_daily_sale("2024-05-01", 50.0, 5.0).await;
    app.create_daily_sale("2024-05-31", 20.0, 2.0).await;
    app.create_daily_sale("2024-06-01", 999.0, 99.0).await;

    let day: Vec<Value> = app
        .get("/daily-sales?date=2024-05-01")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(day.len(), 2);

    let month: Vec<Value> = app
        .get("/daily-sales?month=2024-05")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(month.len(), 3);
    assert_eq!(month[2]["date"], "2024-05-31");
}

#[tokio::test]
async fn edit_and_delete_entry() {
    let app = TestApp::spawn().await;
    let id = app.create_daily_sale("2024-05-01", 100.0, 10.0).await;

    let response = app
        .put_json(
            &format!("/daily-sales/{}", id),
            &json!({ "date": "2024-05-02", "amount": 80.0, "vat_amount": 8.0 }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let listed: Vec<Value> = app
        .get("/daily-sales?date=2024-05-02")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(listed[0]["amount"], 80.0);

    let response = app.delete(&format!("/daily-sales/{}", id)).await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .put_json(
            &format!("/daily-sales/{}", id),
            &json!({ "date": "2024-05-02", "amount": 1.0, "vat_amount": 0.0 }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn amount_is_required() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/daily-sales", &json!({ "date": "2024-05-01", "vat_amount": 1.0 }))
        .await;
    assert_eq!(response.status().as_u16(), 422);
}
