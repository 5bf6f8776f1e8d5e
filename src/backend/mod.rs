use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod memory;

/// A persisted document: the store-assigned key plus the JSON body.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub name: String,
    pub data: Value,
}

impl StoredDocument {
    /// Deserialize the document body into a typed model.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
}

/// A single field condition applied by [`DocumentStore::list`].
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Gt, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Lt, value)
    }

    fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Core abstraction over the document store.
///
/// This trait defines the operations the record layer needs from the
/// surrounding persistence framework: schema-aware CRUD, projection
/// queries, and the bulk field-update escape hatch used for denormalized
/// caches. Each store implementation (in-memory, SQL, remote) implements
/// this trait.
#[async_trait]
pub trait DocumentStore: std::fmt::Debug + Send + Sync {
    /// Insert a new document and assign it a key.
    ///
    /// A non-empty `name` in the body is honored; otherwise the store
    /// generates one.
    async fn insert(&self, doctype: &str, data: Value) -> AppResult<StoredDocument>;

    /// Fetch a document by key.
    async fn get(&self, doctype: &str, name: &str) -> AppResult<Option<StoredDocument>>;

    /// Fetch a single field of a document.
    ///
    /// `None` when the document (or the field) does not exist.
    async fn get_value(&self, doctype: &str, name: &str, field: &str)
        -> AppResult<Option<Value>>;

    /// Update a single field of an existing document.
    async fn set_value(
        &self,
        doctype: &str,
        name: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()>;

    /// Replace the body of an existing document.
    async fn update(&self, doctype: &str, name: &str, data: Value) -> AppResult<StoredDocument>;

    /// Finalize a draft document (docstatus 0 -> 1).
    async fn submit(&self, doctype: &str, name: &str) -> AppResult<()>;

    /// List documents matching all `filters`, projected to `fields`.
    ///
    /// An empty `fields` slice returns full document bodies. Rows come back
    /// in creation order.
    async fn list(&self, doctype: &str, filters: &[Filter], fields: &[&str])
        -> AppResult<Vec<Value>>;

    /// The most recently created document of a doctype.
    async fn latest(&self, doctype: &str) -> AppResult<Option<StoredDocument>>;

    /// Set `field` to `value` on every document whose `key_field` equals
    /// `key`. Returns the number of rows touched.
    async fn bulk_set_field(
        &self,
        doctype: &str,
        key_field: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> AppResult<u64>;

    /// Make all writes so far durable independent of the caller's
    /// transaction.
    async fn commit(&self) -> AppResult<()>;
}

/// Factory for creating document store instances.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store based on configuration.
    pub fn create(config: &StoreConfig) -> AppResult<Arc<dyn DocumentStore>> {
        match config.store_type.as_str() {
            "memory" => Ok(Arc::new(memory::InMemoryStore::new())),
            other => Err(AppError::Configuration(format!(
                "Unsupported store type: {}",
                other
            ))),
        }
    }
}
