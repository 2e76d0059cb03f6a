//! In-process record store, used by tests and the `memory` store backend.
//!
//! Filters follow the document store's rules: numbers compare across integer
//! and double encodings, strings compare lexicographically, and a missing
//! field matches nothing. Unique keys are checked under the write lock.

use crate::models::Collection;
use crate::services::store::{
    duplicate_conflict, record_not_found, Condition, Operator, Record, RecordStore,
};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use service_core::error::AppError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type Documents = BTreeMap<String, Document>;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Documents>>>,
    unique_keys: HashMap<Collection, Vec<Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes that would give two documents the same values for `fields`.
    pub fn with_unique_key(mut self, collection: Collection, fields: &[&str]) -> Self {
        self.unique_keys
            .entry(collection)
            .or_default()
            .push(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    fn check_unique(
        &self,
        collection: Collection,
        documents: &Documents,
        id: &str,
        candidate: &Document,
    ) -> Result<(), AppError> {
        let Some(keys) = self.unique_keys.get(&collection) else {
            return Ok(());
        };

        for key in keys {
            let conditions: Option<Vec<Condition>> = key
                .iter()
                .map(|field| {
                    candidate.get(field).map(|value| Condition {
                        field: field.clone(),
                        op: Operator::Eq(value.clone()),
                    })
                })
                .collect();
            let Some(conditions) = conditions else {
                continue;
            };

            let taken = documents.iter().any(|(other_id, document)| {
                other_id != id && conditions.iter().all(|c| matches(document, c))
            });
            if taken {
                let fields: Vec<&str> = key.iter().map(String::as_str).collect();
                return Err(duplicate_conflict(collection, &fields));
            }
        }

        Ok(())
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        _ if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

fn matches(document: &Document, condition: &Condition) -> bool {
    let Some(value) = document.get(&condition.field) else {
        return false;
    };

    match &condition.op {
        Operator::Eq(expected) => compare(value, expected) == Some(Ordering::Equal),
        Operator::Gte(bound) => matches!(
            compare(value, bound),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt(bound) => compare(value, bound) == Some(Ordering::Less),
        Operator::In(options) => options
            .iter()
            .any(|option| compare(value, option) == Some(Ordering::Equal)),
    }
}

fn records<'a>(documents: impl Iterator<Item = (&'a String, &'a Document)>) -> Vec<Record> {
    documents
        .map(|(id, fields)| Record::new(id.clone(), fields.clone()))
        .collect()
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| records(documents.iter()))
            .unwrap_or_default())
    }

    async fn get_where(
        &self,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<Vec<Record>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                records(
                    documents
                        .iter()
                        .filter(|(_, document)| conditions.iter().all(|c| matches(document, c))),
                )
            })
            .unwrap_or_default())
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| Record::new(id, fields.clone())))
    }

    async fn insert(&self, collection: Collection, mut fields: Document) -> Result<String, AppError> {
        fields.remove("_id");
        let id = Uuid::new_v4().to_string();

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        self.check_unique(collection, documents, &id, &fields)?;
        documents.insert(id.clone(), fields);

        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        let mut candidate = documents
            .get(id)
            .cloned()
            .ok_or_else(|| record_not_found(collection, id))?;
        for (key, value) in fields {
            if key != "_id" {
                candidate.insert(key, value);
            }
        }

        self.check_unique(collection, documents, id, &candidate)?;
        documents.insert(id.to_string(), candidate);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    async fn batch_delete(&self, collection: Collection, ids: &[String]) -> Result<u64, AppError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };

        let removed = ids
            .iter()
            .filter(|id| documents.remove(id.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<(), AppError> {
        fields.remove("_id");

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        self.check_unique(collection, documents, id, &fields)?;
        documents.insert(id.to_string(), fields);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
