mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn empty_month_export_reports_no_data() {
    let app = TestApp::spawn().await;
    app.create_daily_sale("2024-05-01", 100.0, 10.0).await;

    let response = app.get("/exports/monthly/2024-05").await;
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.headers().get("content-disposition").is_none());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No data to export");
}

#[tokio::test]
async fn empty_quarter_export_reports_no_data() {
    let app = TestApp::spawn().await;

    let response = app.get("/exports/quarterly/2024-01").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn month_export_is_csv_attachment() {
    let app = TestApp::spawn().await;
    let supplier_id = app.create_supplier("Acme", "GB1").await;
    app.create_invoice(&supplier_id, "2024-05-09", "B", 60.0, 10.0).await;
    app.create_invoice(&supplier_id, "2024-05-02", "A", 120.0, 20.0).await;
    app.create_daily_sale("2024-05-01", 100.0, 10.0).await;
    app.put_json(
        "/summaries/monthly/2024-05/override",
        &json!({ "total_sales": 150.0 }),
    )
    .await;

    let response = app.get("/exports/monthly/2024-05").await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"invoices-2024-05.csv\""
    );

    let text = response.text().await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Supplier,Invoice No,VAT No,Amount (with VAT),VAT Amount"
    );
    assert_eq!(lines[1], "2024-05-02,Acme,A,GB1,120.00,20.00");
    assert_eq!(lines[2], "2024-05-09,Acme,B,GB1,60.00,10.00");
    assert_eq!(lines[3], "");
    assert_eq!(
        &lines[4..],
        [
            "Total Purchase,180.00",
            "Total Sales,150.00",
            "Total VAT Given,30.00",
            "Total VAT Collected,10.00",
        ]
    );
}

#[tokio::test]
async fn quarter_export_groups_by_month_with_custom_name() {
    let app = TestApp::spawn().await;
    let supplier_id = app.create_supplier("Acme", "GB1").await;
    app.create_invoice(&supplier_id, "2024-11-02", "N1", 10.0, 1.0).await;
    app.create_invoice(&supplier_id, "2025-01-05", "J1", 30.0, 3.0).await;
    app.create_daily_sale("2024-12-01", 200.0, 20.0).await;

    let response = app
        .get("/exports/quarterly/2024-11?filename=q4-report")
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"q4-report.csv\""
    );

    let text = response.text().await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Month,Date,Supplier,Invoice No,VAT No,Amount (with VAT),VAT Amount"
    );
    assert_eq!(lines[1], "2024-11,,,,,,");
    assert_eq!(lines[2], ",2024-11-02,Acme,N1,GB1,10.00,1.00");
    assert!(text.contains(",2024-11-02,Acme,N1,GB1,10.00,1.00\n\n\n\n\n\n\n2024-12,,,,,,\n"));
    assert!(text.contains(",2025-01-05,Acme,J1,GB1,30.00,3.00\n"));
    assert!(text.ends_with(
        "Total Purchase,40.00\nTotal Sales,200.00\nTotal VAT Given,4.00\nTotal VAT Collected,20.00\n"
    ));
}
