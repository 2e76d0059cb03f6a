mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn seed_quarter(app: &TestApp) {
    app.create_daily_sale("2024-01-05", 100.0, 10.0).await;
    app.create_daily_sale("2024-02-05", 200.0, 20.0).await;
    app.create_daily_sale("2024-03-05", 300.0, 30.0).await;
    app.create_daily_sale("2024-04-01", 999.0, 99.0).await;
}

#[tokio::test]
async fn month_summary_without_override_uses_daily_entries() {
    let app = TestApp::spawn().await;
    let supplier_id = app.create_supplier("Acme", "GB1").await;
    app.create_invoice(&supplier_id, "2024-05-02", "A", 120.0, 20.0).await;
    app.create_invoice(&supplier_id, "2024-05-09", "B", 60.0, 10.0).await;
    app.create_daily_sale("2024-05-01", 60.0, 6.0).await;
    app.create_daily_sale("2024-05-20", 40.0, 4.0).await;

    let response = app.get("/summaries/monthly/2024-05").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["purchases"]["total_with_vat"], 180.0);
    assert_eq!(body["purchases"]["total_vat"], 30.0);
    assert_eq!(body["sales"]["total_sales"], 100.0);
    assert_eq!(body["sales"]["total_vat_collected"], 10.0);
    assert_eq!(body["sales"]["source"], "computed");
    assert!(body["sales_override"].is_null());
    assert_eq!(body["invoices"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn partial_month_override_falls_back_per_field() {
    let app = TestApp::spawn().await;
    app.create_daily_sale("2024-05-01", 100.0, 10.0).await;

    let response = app
        .put_json(
            "/summaries/monthly/2024-05/override",
            &json!({ "total_sales": 150.0 }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sales"]["total_sales"], 150.0);
    assert_eq!(body["sales"]["total_vat_collected"], 10.0);
    assert_eq!(body["sales"]["source"], "partial_override");
    assert_eq!(body["computed_sales"]["total_sales"], 100.0);

    let response = app.delete("/summaries/monthly/2024-05/override").await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sales"]["total_sales"], 100.0);
    assert_eq!(body["sales"]["source"], "computed");
}

#[tokio::test]
async fn quarter_baseline_spans_year_end() {
    let app = TestApp::spawn().await;
    app.create_daily_sale("2024-11-15", 100.0, 10.0).await;
    app.create_daily_sale("2024-12-01", 50.0, 5.0).await;
    app.create_daily_sale("2025-01-31", 25.0, 2.5).await;
    app.create_daily_sale("2025-02-01", 999.0, 99.0).await;

    let body: Value = app
        .get("/summaries/quarterly/2024-11")
        .await
        .json()
        .await
        .unwrap();

    let months: Vec<&str> = body["months"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["month"].as_str().unwrap())
        .collect();
    assert_eq!(months, ["2024-11", "2024-12", "2025-01"]);
    assert_eq!(body["baseline_sales"]["total_sales"], 175.0);
    assert_eq!(body["sales"]["total_vat_collected"], 17.5);
}

#[tokio::test]
async fn monthly_override_feeds_quarter_baseline() {
    let app = TestApp::spawn().await;
    seed_quarter(&app).await;

    app.put_json(
        "/summaries/monthly/2024-02/override",
        &json!({ "total_sales": 250.0, "total_vat_collected": 25.0 }),
    )
    .await;

    let body: Value = app
        .get("/summaries/quarterly/2024-01")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["baseline_sales"]["total_sales"], 650.0);
    assert_eq!(body["baseline_sales"]["total_vat_collected"], 65.0);
    assert_eq!(body["months"][1]["overridden"], true);
}

#[tokio::test]
async fn zero_quarterly_override_is_ignored() {
    let app = TestApp::spawn().await;
    seed_quarter(&app).await;

    let response = app
        .put_json(
            "/summaries/quarterly/2024-01/override",
            &json!({ "total_sales": 0.0, "total_vat_collected": 40.0 }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sales"]["total_sales"], 600.0);
    assert_eq!(body["sales"]["total_vat_collected"], 60.0);
    assert_eq!(body["sales"]["source"], "computed");
}

#[tokio::test]
async fn quarterly_override_replaces_and_clear_restores_baseline() {
    let app = TestApp::spawn().await;
    seed_quarter(&app).await;

    let before: Value = app
        .get("/summaries/quarterly/2024-01")
        .await
        .json()
        .await
        .unwrap();

    let overridden: Value = app
        .put_json(
            "/summaries/quarterly/2024-01/override",
            &json!({ "total_sales": 500.0, "total_vat_collected": 40.0 }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(overridden["sales"]["total_sales"], 500.0);
    assert_eq!(overridden["sales"]["total_vat_collected"], 40.0);
    assert_eq!(overridden["sales"]["source"], "override");

    let response = app.delete("/summaries/quarterly/2024-01/override").await;
    assert_eq!(response.status().as_u16(), 200);
    let cleared: Value = response.json().await.unwrap();

    assert_eq!(cleared["sales"], before["sales"]);
    assert_eq!(cleared["baseline_sales"], before["baseline_sales"]);
    assert!(cleared["sales_override"].is_null());

    // Clearing again is harmless
    let again: Value = app
        .delete("/summaries/quarterly/2024-01/override")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(again["sales"], before["sales"]);
}

#[tokio::test]
async fn malformed_period_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.get("/summaries/monthly/2024-5").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.get("/summaries/quarterly/abc").await;
    assert_eq!(response.status().as_u16(), 400);
}
