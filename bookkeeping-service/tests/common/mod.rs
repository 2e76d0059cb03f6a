#![allow(dead_code)]

use bookkeeping_service::config::{BookkeepingConfig, MongoConfig, ObservabilityConfig, StoreBackend};
use bookkeeping_service::startup::Application;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

pub fn test_config(store: StoreBackend, uri: &str, database: &str) -> BookkeepingConfig {
    BookkeepingConfig {
        common: CoreConfig { port: 0 },
        mongodb: MongoConfig {
            uri: uri.to_string(),
            database: database.to_string(),
        },
        store,
        observability: ObservabilityConfig {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    /// Spawns the service on a random port over a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(StoreBackend::Memory, "", "")).await
    }

    pub async fn spawn_with(config: BookkeepingConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Creates a supplier and returns its id.
    pub async fn create_supplier(&self, name: &str, vat_no: &str) -> String {
        let response = self
            .post_json("/suppliers", &json!({ "name": name, "vat_no": vat_no }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("supplier id").to_string()
    }

    pub async fn create_invoice(
        &self,
        supplier_id: &str,
        date: &str,
        invoice_no: &str,
        amount_with_vat: f64,
        vat_amount: f64,
    ) -> Response {
        self.post_json(
            "/invoices",
            &json!({
                "date": date,
                "supplier_id": supplier_id,
                "invoice_no": invoice_no,
                "amount_with_vat": amount_with_vat,
                "vat_amount": vat_amount,
            }),
        )
        .await
    }

    pub async fn create_daily_sale(&self, date: &str, amount: f64, vat_amount: f64) -> String {
        let response = self
            .post_json(
                "/daily-sales",
                &json!({ "date": date, "amount": amount, "vat_amount": vat_amount }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("entry id").to_string()
    }
}
