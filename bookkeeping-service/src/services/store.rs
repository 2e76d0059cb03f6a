//! Record store adapter.
//!
//! Collections hold loosely-typed documents keyed by a string id. Typed
//! access lives in [`crate::services::Ledger`]; this layer only knows about
//! documents and simple AND-ed filters.

use crate::models::Collection;
use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_core::error::AppError;

/// A stored document and its key. `fields` never contains `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub fields: Document,
}

impl Record {
    pub fn new(id: impl Into<String>, mut fields: Document) -> Self {
        fields.remove("_id");
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, bson::de::Error> {
        let mut document = self.fields.clone();
        document.insert("_id", self.id.clone());
        bson::from_document(document)
    }
}

/// Serializes a model into storable fields, dropping any `_id`.
pub fn encode<T: Serialize>(value: &T) -> Result<Document, AppError> {
    let mut document = bson::to_document(value).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to encode record: {}", e))
    })?;
    document.remove("_id");
    Ok(document)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq(Bson),
    Gte(Bson),
    Lt(Bson),
    In(Vec<Bson>),
}

/// A single field filter. A missing field never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
}

impl Condition {
    pub fn eq(field: &str, value: impl Into<Bson>) -> Self {
        Self {
            field: field.to_string(),
            op: Operator::Eq(value.into()),
        }
    }

    pub fn gte(field: &str, value: impl Into<Bson>) -> Self {
        Self {
            field: field.to_string(),
            op: Operator::Gte(value.into()),
        }
    }

    pub fn lt(field: &str, value: impl Into<Bson>) -> Self {
        Self {
            field: field.to_string(),
            op: Operator::Lt(value.into()),
        }
    }

    pub fn is_in<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Self {
            field: field.to_string(),
            op: Operator::In(values.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, AppError>;

    async fn get_where(
        &self,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<Vec<Record>, AppError>;

    async fn get_by_id(&self, collection: Collection, id: &str)
        -> Result<Option<Record>, AppError>;

    /// Inserts a new document under a generated id and returns it.
    async fn insert(&self, collection: Collection, fields: Document) -> Result<String, AppError>;

    /// Sets the given fields on an existing document.
    async fn update(&self, collection: Collection, id: &str, fields: Document)
        -> Result<(), AppError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, AppError>;

    /// Removes all listed documents in one request and returns how many went.
    async fn batch_delete(&self, collection: Collection, ids: &[String]) -> Result<u64, AppError>;

    /// Stores `fields` under an explicit key, replacing any previous document.
    async fn upsert(&self, collection: Collection, id: &str, fields: Document)
        -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

pub fn duplicate_conflict(collection: Collection, fields: &[&str]) -> AppError {
    AppError::Conflict(anyhow::anyhow!(
        "A record in {} already has the same {}",
        collection,
        fields.join(", ")
    ))
}

pub fn record_not_found(collection: Collection, id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No record '{}' in {}", id, collection))
}
