use crate::models::{Collection, INVOICE_UNIQUE_FIELDS};
use crate::services::metrics::record_store_operation;
use crate::services::store::{
    duplicate_conflict, record_not_found, Condition, Operator, Record, RecordStore,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReplaceOptions},
    Client as MongoClient, Database, IndexModel,
};
use service_core::error::AppError;
use uuid::Uuid;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for bookkeeping-service");

        let invoices = self.collection(Collection::Invoices);

        let month_index = IndexModel::builder()
            .keys(doc! { "month": 1, "date": 1 })
            .options(
                IndexOptions::builder()
                    .name("invoice_month_lookup".to_string())
                    .build(),
            )
            .build();

        invoices.create_index(month_index, None).await.map_err(|e| {
            tracing::error!("Failed to create month index on invoices collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on invoices.(month, date)");

        let mut duplicate_keys = Document::new();
        for field in INVOICE_UNIQUE_FIELDS {
            duplicate_keys.insert(field, 1);
        }
        let duplicate_index = IndexModel::builder()
            .keys(duplicate_keys)
            .options(
                IndexOptions::builder()
                    .name("invoice_duplicate_guard".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        // Fails when legacy data already holds duplicates; the lookup before
        // each write still applies in that case.
        match invoices.create_index(duplicate_index, None).await {
            Ok(_) => tracing::info!("Created unique index on invoices.(invoiceNo, amountWithVAT, vatAmount)"),
            Err(e) => tracing::warn!(
                error = %e,
                "Could not create unique invoice index, relying on write-time duplicate checks"
            ),
        }

        let date_index = IndexModel::builder()
            .keys(doc! { "date": 1 })
            .options(
                IndexOptions::builder()
                    .name("daily_sales_date_lookup".to_string())
                    .build(),
            )
            .build();

        self.collection(Collection::DailySales)
            .create_index(date_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create date index on dailySales collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on dailySales.date");

        let override_month_index = IndexModel::builder()
            .keys(doc! { "month": 1 })
            .options(
                IndexOptions::builder()
                    .name("monthly_sales_month_lookup".to_string())
                    .build(),
            )
            .build();

        self.collection(Collection::MonthlySales)
            .create_index(override_month_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create month index on monthlySales collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on monthlySales.month");

        Ok(())
    }

    pub fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.as_str())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Conflict for a duplicate-key rejection. Only invoices carry a compound
/// unique index; anywhere else the clash is on `_id`.
fn duplicate_key_conflict(collection: Collection) -> AppError {
    match collection {
        Collection::Invoices => duplicate_conflict(collection, &INVOICE_UNIQUE_FIELDS),
        _ => duplicate_conflict(collection, &["_id"]),
    }
}

/// Records the outcome and maps driver errors onto the service taxonomy.
fn observe<T>(
    collection: Collection,
    operation: &'static str,
    result: Result<T, mongodb::error::Error>,
) -> Result<T, AppError> {
    record_store_operation(collection.as_str(), operation, result.is_ok());

    result.map_err(|e| {
        if is_duplicate_key(&e) {
            tracing::warn!(collection = %collection, operation, "Duplicate key rejected by MongoDB");
            return duplicate_key_conflict(collection);
        }
        tracing::error!(collection = %collection, operation, "MongoDB operation failed: {}", e);
        AppError::from(e)
    })
}

/// Builds a filter document, merging several operators on the same field.
fn filter_for(conditions: &[Condition]) -> Document {
    let mut filter = Document::new();

    for condition in conditions {
        let (operator, value) = match &condition.op {
            Operator::Eq(v) => ("$eq", v.clone()),
            Operator::Gte(v) => ("$gte", v.clone()),
            Operator::Lt(v) => ("$lt", v.clone()),
            Operator::In(values) => ("$in", Bson::Array(values.clone())),
        };

        match filter.get_mut(&condition.field) {
            Some(Bson::Document(operators)) => {
                operators.insert(operator, value);
            }
            _ => {
                filter.insert(condition.field.clone(), doc! { operator: value });
            }
        }
    }

    filter
}

fn into_record(mut document: Document) -> Option<Record> {
    let id = match document.remove("_id")? {
        Bson::String(id) => id,
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    };
    Some(Record::new(id, document))
}

#[async_trait]
impl RecordStore for MongoDb {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, AppError> {
        self.get_where(collection, &[]).await
    }

    async fn get_where(
        &self,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<Vec<Record>, AppError> {
        let cursor = observe(
            collection,
            "find",
            self.collection(collection)
                .find(filter_for(conditions), None)
                .await,
        )?;
        let documents: Vec<Document> =
            observe(collection, "collect", cursor.try_collect().await)?;

        Ok(documents.into_iter().filter_map(into_record).collect())
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, AppError> {
        let document = observe(
            collection,
            "find_one",
            self.collection(collection)
                .find_one(doc! { "_id": id }, None)
                .await,
        )?;
        Ok(document.and_then(into_record))
    }

    async fn insert(&self, collection: Collection, mut fields: Document) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        fields.insert("_id", id.clone());

        observe(
            collection,
            "insert_one",
            self.collection(collection).insert_one(fields, None).await,
        )?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<(), AppError> {
        fields.remove("_id");

        let result = observe(
            collection,
            "update_one",
            self.collection(collection)
                .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
                .await,
        )?;

        if result.matched_count == 0 {
            return Err(record_not_found(collection, id));
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let result = observe(
            collection,
            "delete_one",
            self.collection(collection)
                .delete_one(doc! { "_id": id }, None)
                .await,
        )?;
        Ok(result.deleted_count > 0)
    }

    async fn batch_delete(&self, collection: Collection, ids: &[String]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = observe(
            collection,
            "delete_many",
            self.collection(collection)
                .delete_many(doc! { "_id": { "$in": ids } }, None)
                .await,
        )?;
        Ok(result.deleted_count)
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<(), AppError> {
        fields.insert("_id", id);
        let options = ReplaceOptions::builder().upsert(true).build();

        observe(
            collection,
            "replace_one",
            self.collection(collection)
                .replace_one(doc! { "_id": id }, fields, options)
                .await,
        )?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_name_the_clashing_fields() {
        let invoice = duplicate_key_conflict(Collection::Invoices).to_string();
        assert!(invoice.contains("invoiceNo, amountWithVAT, vatAmount"));

        let monthly = duplicate_key_conflict(Collection::MonthlySales).to_string();
        assert!(monthly.contains("_id"));
        assert!(!monthly.contains("invoiceNo"));
        assert!(matches!(
            duplicate_key_conflict(Collection::QuarterlySales),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn filter_merges_range_on_one_field() {
        let filter = filter_for(&[
            Condition::gte("date", "2024-02-01"),
            Condition::lt("date", "2024-03-01"),
        ]);
        assert_eq!(
            filter,
            doc! { "date": { "$gte": "2024-02-01", "$lt": "2024-03-01" } }
        );
    }

    #[test]
    fn filter_combines_fields() {
        let filter = filter_for(&[
            Condition::eq("invoiceNo", "A1"),
            Condition::is_in("month", ["2024-01", "2024-02"]),
        ]);
        assert_eq!(
            filter,
            doc! {
                "invoiceNo": { "$eq": "A1" },
                "month": { "$in": ["2024-01", "2024-02"] },
            }
        );
    }

    #[test]
    fn records_take_string_or_object_ids() {
        let record = into_record(doc! { "_id": "abc", "name": "x" }).unwrap();
        assert_eq!(record.id, "abc");
        assert!(record.fields.get("_id").is_none());

        let oid = mongodb::bson::oid::ObjectId::new();
        let record = into_record(doc! { "_id": oid, "name": "x" }).unwrap();
        assert_eq!(record.id, oid.to_hex());

        assert!(into_record(doc! { "name": "x" }).is_none());
    }
}
