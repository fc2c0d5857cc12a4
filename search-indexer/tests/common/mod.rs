//! In-memory search provider and entity source shared by the integration
//! tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_repository::{
    BulkOperation, BulkResult, DeleteResult, EntitySource, SearchIndexError, SearchIndexProvider,
    SearchResult, SourceError,
};
use search_indexer_shared::{Entity, IndexDefinition, Person};
use serde_json::Value;
use tokio::sync::mpsc::Sender;
use tokio::sync::Semaphore;

pub fn person(id: i64) -> Entity {
    Entity::Person(Person {
        id: Some(id),
        uid: format!("7000-0000-{:04}", id),
        normalized_uid: 700000000000 + id,
        surname: "Smith".to_string(),
        ..Default::default()
    })
}

pub fn definition(alias: &str, name: &str) -> IndexDefinition {
    IndexDefinition {
        alias: alias.to_string(),
        name: name.to_string(),
        config: br#"{"settings":{}}"#.to_vec(),
    }
}

/// Bytes one entity adds to a bulk body.
pub fn pair_len(entity: &Entity) -> usize {
    let action = format!("{{\"index\":{{\"_id\":\"{}\"}}}}\n", entity.id());
    action.len() + serde_json::to_vec(entity).unwrap().len() + 1
}

/// Search provider recording every call.
#[derive(Default)]
pub struct MockProvider {
    /// Index name and body of every bulk request, in order.
    pub bulk_requests: Mutex<Vec<(String, String)>>,
    /// Responses handed out to bulk requests; when empty every document
    /// succeeds.
    pub bulk_responses: Mutex<VecDeque<Result<BulkResult, SearchIndexError>>>,
    pub aliases: Mutex<HashMap<String, String>>,
    pub indices: Mutex<Vec<String>>,
    /// Every mutating call, formatted `operation arg...`.
    pub calls: Mutex<Vec<String>>,
    /// When set, each bulk request waits for one permit after it is
    /// recorded.
    pub bulk_gate: Option<Arc<Semaphore>>,
    /// `create_index` records the call and never completes.
    pub stall_create_index: bool,
}

impl MockProvider {
    /// A provider whose bulk requests wait on `gate`.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            bulk_gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn with_alias(self, alias: &str, index: &str) -> Self {
        self.aliases
            .lock()
            .unwrap()
            .insert(alias.to_string(), index.to_string());
        self.with_index(index)
    }

    pub fn with_index(self, index: &str) -> Self {
        self.indices.lock().unwrap().push(index.to_string());
        self
    }

    pub fn push_bulk_response(&self, response: Result<BulkResult, SearchIndexError>) {
        self.bulk_responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bulk_requests(&self) -> Vec<(String, String)> {
        self.bulk_requests.lock().unwrap().clone()
    }

    /// Ids of every document sent, in request order.
    pub fn indexed_ids(&self) -> Vec<String> {
        self.bulk_requests()
            .iter()
            .flat_map(|(_, body)| {
                body.lines()
                    .step_by(2)
                    .map(|line| {
                        let action: Value = serde_json::from_str(line).unwrap();
                        action["index"]["_id"].as_str().unwrap().to_string()
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn alias(&self, alias: &str) -> Option<String> {
        self.aliases.lock().unwrap().get(alias).cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SearchIndexProvider for MockProvider {
    async fn do_bulk(&self, op: &BulkOperation) -> Result<BulkResult, SearchIndexError> {
        self.bulk_requests.lock().unwrap().push((
            op.index_name().to_string(),
            String::from_utf8(op.body().to_vec()).unwrap(),
        ));

        if let Some(gate) = &self.bulk_gate {
            gate.acquire().await.unwrap().forget();
        }

        let queued = self.bulk_responses.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| {
            Ok(BulkResult {
                successful: op.document_count(),
                failed: 0,
                error: None,
            })
        })
    }

    async fn search(
        &self,
        _indices: &[String],
        _body: &Value,
    ) -> Result<SearchResult, SearchIndexError> {
        Ok(SearchResult::default())
    }

    async fn create_index(
        &self,
        name: &str,
        _config: &[u8],
        force: bool,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("create_index {} force={}", name, force));
        if self.stall_create_index {
            std::future::pending::<()>().await;
        }
        let mut indices = self.indices.lock().unwrap();
        if !indices.iter().any(|index| index == name) {
            indices.push(name.to_string());
        }
        Ok(())
    }

    async fn index_exists(&self, name: &str) -> Result<bool, SearchIndexError> {
        Ok(self.indices.lock().unwrap().iter().any(|index| index == name))
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError> {
        self.record(format!("delete_index {}", name));
        self.indices.lock().unwrap().retain(|index| index != name);
        Ok(())
    }

    async fn resolve_alias(&self, alias: &str) -> Result<String, SearchIndexError> {
        self.alias(alias)
            .ok_or_else(|| SearchIndexError::alias_missing(alias))
    }

    async fn create_alias(&self, alias: &str, index: &str) -> Result<(), SearchIndexError> {
        self.record(format!("create_alias {} {}", alias, index));
        self.aliases
            .lock()
            .unwrap()
            .insert(alias.to_string(), index.to_string());
        Ok(())
    }

    async fn update_alias(
        &self,
        alias: &str,
        old_index: &str,
        new_index: &str,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("update_alias {} {} {}", alias, old_index, new_index));
        self.aliases
            .lock()
            .unwrap()
            .insert(alias.to_string(), new_index.to_string());
        Ok(())
    }

    async fn indices(&self, pattern: &str) -> Result<Vec<String>, SearchIndexError> {
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .indices
            .lock()
            .unwrap()
            .iter()
            .filter(|index| index.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete_by_query(
        &self,
        _indices: &[String],
        _body: &Value,
    ) -> Result<DeleteResult, SearchIndexError> {
        Ok(DeleteResult::default())
    }
}

/// Entity source over a fixed list of entities.
#[derive(Default)]
pub struct MockSource {
    pub entities: Vec<Entity>,
    /// A query whose range starts here fails.
    pub fail_from: Option<i64>,
    /// Queries never complete.
    pub stall: bool,
    /// Every `query_by_id` range, in order.
    pub queries: Mutex<Vec<(i64, i64)>>,
    /// Entities accepted by the sink so far.
    pub sent: AtomicUsize,
}

impl MockSource {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<(i64, i64)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    async fn send(&self, sink: &Sender<Entity>, entity: &Entity) -> Result<(), SourceError> {
        sink.send(entity.clone())
            .await
            .map_err(|_| SourceError::SinkClosed)?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn id(entity: &Entity) -> i64 {
        entity.id().to_string().parse().unwrap()
    }
}

#[async_trait]
impl EntitySource for MockSource {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        let ids = self.entities.iter().map(Self::id);
        Ok((ids.clone().min().unwrap_or(0), ids.max().unwrap_or(0)))
    }

    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError> {
        self.queries.lock().unwrap().push((from, to));
        if self.stall {
            std::future::pending::<()>().await;
        }
        if self.fail_from == Some(from) {
            return Err(SourceError::DatabaseError(sqlx::Error::PoolTimedOut));
        }

        for entity in &self.entities {
            let id = Self::id(entity);
            if id >= from && id <= to {
                self.send(sink, entity).await?;
            }
        }
        Ok(())
    }

    async fn query_from_date(
        &self,
        sink: &Sender<Entity>,
        _from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        for entity in &self.entities {
            self.send(sink, entity).await?;
        }
        Ok(())
    }
}
