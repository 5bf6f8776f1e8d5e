use std::collections::{BTreeSet, HashMap};

pub mod definitions;

/// A doctype that references another doctype through a link field.
///
/// `fieldname` is the foreign-key field pointing back at the linked record.
/// When the link actually lives in a child table, `child_doctype` names it;
/// the child rows use the same foreign-key field.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedType {
    pub doctype: String,
    pub fieldname: String,
    pub child_doctype: Option<String>,
}

impl LinkedType {
    pub fn new(doctype: impl Into<String>, fieldname: impl Into<String>) -> Self {
        Self {
            doctype: doctype.into(),
            fieldname: fieldname.into(),
            child_doctype: None,
        }
    }

    pub fn with_child(mut self, child_doctype: impl Into<String>) -> Self {
        self.child_doctype = Some(child_doctype.into());
        self
    }
}

/// Queryable schema description.
///
/// Replaces reflection over a live metadata engine with static, fakeable
/// metadata: which doctypes link back to a given doctype, which fields a
/// doctype declares, and whether it is a singleton configuration record.
pub trait SchemaRegistry: Send + Sync {
    fn linked_types(&self, doctype: &str) -> Vec<LinkedType>;

    fn fields(&self, doctype: &str) -> BTreeSet<String>;

    fn is_singleton(&self, doctype: &str) -> bool;
}

/// Schema registry backed by in-memory tables.
///
/// Buildable piecewise for tests; `education()` loads the shipped education
/// schema from [`definitions`].
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaRegistry {
    fields: HashMap<String, BTreeSet<String>>,
    links: HashMap<String, Vec<LinkedType>>,
    singletons: BTreeSet<String>,
}

impl StaticSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The education schema: enrollment, attendance, log and group doctypes
    /// linked back to Student.
    pub fn education() -> Self {
        let mut registry = Self::new();
        for (doctype, fields) in definitions::DOCTYPE_FIELDS.iter() {
            let fields: Vec<&str> = fields.iter().copied().collect();
            registry = registry.with_doctype(doctype, &fields);
        }
        for link in definitions::STUDENT_LINKED_TYPES.iter() {
            registry = registry.with_link(definitions::STUDENT, link.clone());
        }
        registry
    }

    pub fn with_doctype(mut self, doctype: &str, fields: &[&str]) -> Self {
        self.fields.insert(
            doctype.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_link(mut self, target: &str, link: LinkedType) -> Self {
        self.links.entry(target.to_string()).or_default().push(link);
        self
    }

    pub fn with_singleton(mut self, doctype: &str, fields: &[&str]) -> Self {
        self.singletons.insert(doctype.to_string());
        self.with_doctype(doctype, fields)
    }
}

impl SchemaRegistry for StaticSchemaRegistry {
    fn linked_types(&self, doctype: &str) -> Vec<LinkedType> {
        self.links.get(doctype).cloned().unwrap_or_default()
    }

    fn fields(&self, doctype: &str) -> BTreeSet<String> {
        self.fields.get(doctype).cloned().unwrap_or_default()
    }

    fn is_singleton(&self, doctype: &str) -> bool {
        self.singletons.contains(doctype)
    }
}
