use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, Filter, FilterOp, StoredDocument};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
struct Row {
    data: Value,
    // Insertion order; drives latest() and list() ordering.
    seq: u64,
}

#[derive(Debug, Default)]
struct StoreInner {
    tables: HashMap<String, BTreeMap<String, Row>>,
    next_seq: u64,
}

/// In-memory implementation of [`DocumentStore`].
///
/// Documents are JSON bodies keyed by `(doctype, name)` behind a single
/// mutex. Used by tests and embedded deployments. The store does not
/// enforce the applicant-uniqueness constraint itself; the validation-time
/// check in the student lifecycle is the only guard, and the known
/// check-then-act gap between concurrent saves is accepted.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, doctype: &str, mut data: Value) -> AppResult<StoredDocument> {
        if !data.is_object() {
            return Err(AppError::BadRequest(format!(
                "{} document body must be a JSON object",
                doctype
            )));
        }

        let mut inner = self.inner.lock()?;

        let name = match data.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        data["name"] = json!(name);

        let table = inner.tables.entry(doctype.to_string()).or_default();
        if table.contains_key(&name) {
            return Err(AppError::BadRequest(format!(
                "{} {} already exists",
                doctype, name
            )));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .tables
            .entry(doctype.to_string())
            .or_default()
            .insert(
                name.clone(),
                Row {
                    data: data.clone(),
                    seq,
                },
            );

        Ok(StoredDocument { name, data })
    }

    async fn get(&self, doctype: &str, name: &str) -> AppResult<Option<StoredDocument>> {
        let inner = self.inner.lock()?;
        Ok(inner
            .tables
            .get(doctype)
            .and_then(|table| table.get(name))
            .map(|row| StoredDocument {
                name: name.to_string(),
                data: row.data.clone(),
            }))
    }

    async fn get_value(
        &self,
        doctype: &str,
        name: &str,
        field: &str,
    ) -> AppResult<Option<Value>> {
        let inner = self.inner.lock()?;
        Ok(inner
            .tables
            .get(doctype)
            .and_then(|table| table.get(name))
            .and_then(|row| row.data.get(field))
            .cloned())
    }

    async fn set_value(
        &self,
        doctype: &str,
        name: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        let mut inner = self.inner.lock()?;
        let row = inner
            .tables
            .get_mut(doctype)
            .and_then(|table| table.get_mut(name))
            .ok_or_else(|| AppError::NotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })?;
        row.data[field] = value;
        Ok(())
    }

    async fn update(&self, doctype: &str, name: &str, mut data: Value) -> AppResult<StoredDocument> {
        if !data.is_object() {
            return Err(AppError::BadRequest(format!(
                "{} document body must be a JSON object",
                doctype
            )));
        }

        let mut inner = self.inner.lock()?;
        let row = inner
            .tables
            .get_mut(doctype)
            .and_then(|table| table.get_mut(name))
            .ok_or_else(|| AppError::NotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })?;
        // The key is immutable across updates
        data["name"] = json!(name);
        row.data = data.clone();
        Ok(StoredDocument {
            name: name.to_string(),
            data,
        })
    }

    async fn submit(&self, doctype: &str, name: &str) -> AppResult<()> {
        let mut inner = self.inner.lock()?;
        let row = inner
            .tables
            .get_mut(doctype)
            .and_then(|table| table.get_mut(name))
            .ok_or_else(|| AppError::NotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })?;
        let docstatus = row.data.get("docstatus").and_then(Value::as_u64).unwrap_or(0);
        if docstatus != 0 {
            return Err(AppError::BadRequest(format!(
                "{} {} is already submitted",
                doctype, name
            )));
        }
        row.data["docstatus"] = json!(1);
        Ok(())
    }

    async fn list(
        &self,
        doctype: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> AppResult<Vec<Value>> {
        let inner = self.inner.lock()?;
        let Some(table) = inner.tables.get(doctype) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Row> = table
            .values()
            .filter(|row| filters.iter().all(|f| matches(&row.data, f)))
            .collect();
        rows.sort_by_key(|row| row.seq);

        Ok(rows
            .into_iter()
            .map(|row| project(&row.data, fields))
            .collect())
    }

    async fn latest(&self, doctype: &str) -> AppResult<Option<StoredDocument>> {
        let inner = self.inner.lock()?;
        Ok(inner
            .tables
            .get(doctype)
            .and_then(|table| {
                table
                    .iter()
                    .max_by_key(|(_, row)| row.seq)
                    .map(|(name, row)| StoredDocument {
                        name: name.clone(),
                        data: row.data.clone(),
                    })
            }))
    }

    async fn bulk_set_field(
        &self,
        doctype: &str,
        key_field: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> AppResult<u64> {
        let mut inner = self.inner.lock()?;
        let Some(table) = inner.tables.get_mut(doctype) else {
            return Ok(0);
        };

        let mut touched = 0;
        for row in table.values_mut() {
            if row.data.get(key_field).and_then(Value::as_str) == Some(key) {
                row.data[field] = value.clone();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn commit(&self) -> AppResult<()> {
        // Writes are durable as soon as the mutex is released
        debug!("commit requested on in-memory store");
        Ok(())
    }
}

fn matches(data: &Value, filter: &Filter) -> bool {
    let field_value = data.get(&filter.field);
    match filter.op {
        FilterOp::Eq => field_value == Some(&filter.value),
        FilterOp::Ne => field_value != Some(&filter.value),
        FilterOp::Gt | FilterOp::Lt => {
            let Some(field_value) = field_value else {
                return false;
            };
            match compare(field_value, &filter.value) {
                Some(Ordering::Greater) => filter.op == FilterOp::Gt,
                Some(Ordering::Less) => filter.op == FilterOp::Lt,
                _ => false,
            }
        }
    }
}

// ISO dates compare correctly as strings, so date filters need no special
// casing here.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

fn project(data: &Value, fields: &[&str]) -> Value {
    if fields.is_empty() {
        return data.clone();
    }
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = data.get(*field) {
            out.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(out)
}
