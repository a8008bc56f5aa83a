//! Declarative batch plans
//!
//! A plan describes a bulk or multi-search batch in YAML or JSON and turns into
//! request values:
//!
//! ```yaml
//! kind: bulk
//! operations:
//!   - op: index
//!     index: people
//!     type: person
//!     id: "1"
//!     params: { refresh: true }
//!     source: { name: John, age: 24 }
//!   - op: delete
//!     index: people
//!     id: "2"
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, ErrorContext};
use crate::params::QueryValues;
use crate::request::{
    BulkIndexRequest, CreateRequest, DeleteRequest, Fireable, IndexRequest, Method,
    MultiSearchRequest, SearchRequest, UpdateRequest,
};
use crate::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchPlan {
    Bulk { operations: Vec<OperationPlan> },
    Msearch { searches: Vec<SearchPlan> },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Index,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Index => "index",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationPlan {
    pub op: OperationKind,
    pub index: String,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub params: QueryValues,
    #[serde(default)]
    pub source: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPlan {
    #[serde(default)]
    pub indices: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default = "match_all")]
    pub query: Value,
    #[serde(default)]
    pub params: QueryValues,
}

fn match_all() -> Value {
    serde_json::json!({"query": {"match_all": {}}})
}

/// A request built from a plan.
#[derive(Debug)]
pub enum PlannedRequest {
    Bulk(BulkIndexRequest),
    MultiSearch(MultiSearchRequest),
}

impl BatchPlan {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str::<BatchPlan>(content).map_err(|e| {
            Error::plan_with_context(e.to_string(), ErrorContext::new().with_action("parse"))
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("Failed to read plan {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn into_request(self) -> Result<PlannedRequest> {
        match self {
            BatchPlan::Bulk { operations } => {
                let mut bulk = BulkIndexRequest::new();
                for (position, op) in operations.into_iter().enumerate() {
                    push_operation(&mut bulk, op).map_err(|e| e.at_position(position))?;
                }
                Ok(PlannedRequest::Bulk(bulk))
            }
            BatchPlan::Msearch { searches } => Ok(PlannedRequest::MultiSearch(
                searches
                    .into_iter()
                    .map(|s| SearchRequest {
                        indices: s.indices,
                        types: s.types,
                        query: s.query,
                        params: s.params,
                    })
                    .collect(),
            )),
        }
    }
}

fn push_operation(bulk: &mut BulkIndexRequest, op: OperationPlan) -> Result<()> {
    let OperationPlan {
        op: kind,
        index,
        doc_type,
        id,
        params,
        source,
    } = op;
    let action = kind.as_str();
    if index.trim().is_empty() {
        return Err(Error::plan_with_context(
            "operation needs a non-empty index",
            ErrorContext::new().with_action(action),
        ));
    }

    let require_source = |source: Option<Value>| {
        source.ok_or_else(|| {
            Error::plan_with_context("missing source", ErrorContext::new().with_action(action))
        })
    };

    match kind {
        OperationKind::Index => bulk.push(IndexRequest {
            index,
            doc_type,
            id,
            params,
            source: require_source(source)?,
        }),
        OperationKind::Create => bulk.push(CreateRequest {
            index,
            doc_type,
            id,
            params,
            source: require_source(source)?,
        }),
        OperationKind::Update => bulk.push(UpdateRequest {
            index,
            doc_type,
            id,
            params,
            source: require_source(source)?,
        }),
        OperationKind::Delete => {
            if source.is_some() {
                return Err(Error::plan_with_context(
                    "delete operations carry no source",
                    ErrorContext::new().with_action(action),
                ));
            }
            bulk.push(DeleteRequest {
                index,
                doc_type,
                id,
                params,
            })
        }
    }
    Ok(())
}

impl Fireable for PlannedRequest {
    fn method(&self) -> Method {
        match self {
            PlannedRequest::Bulk(r) => r.method(),
            PlannedRequest::MultiSearch(r) => r.method(),
        }
    }

    fn path(&self) -> String {
        match self {
            PlannedRequest::Bulk(r) => r.path(),
            PlannedRequest::MultiSearch(r) => r.path(),
        }
    }

    fn values(&self) -> QueryValues {
        match self {
            PlannedRequest::Bulk(r) => r.values(),
            PlannedRequest::MultiSearch(r) => r.values(),
        }
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        match self {
            PlannedRequest::Bulk(r) => r.serialize(w),
            PlannedRequest::MultiSearch(r) => r.serialize(w),
        }
    }
}
