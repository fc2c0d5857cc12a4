//! Integration tests for the indexer pipeline against in-memory stores.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use common::{pair_len, person, MockProvider, MockSource};
use search_indexer::{IndexResult, IndexingError, Indexer, IndexerConfig, RunError};
use search_indexer_repository::{BulkResult, EntitySource, SearchIndexError, SourceError};
use search_indexer_shared::{Entity, Person};
use tokio::sync::mpsc::Sender;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn indexer(provider: &Arc<MockProvider>, source: MockSource) -> Indexer {
    Indexer::new(provider.clone(), Arc::new(source), "person_0123abc")
}

/// Poll `condition` until it holds, failing the test after five seconds.
async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached");
}

/// A pipeline whose bulk requests wait on `gate` and carry one document
/// each, so the consumer stalls in its first flush holding two entities.
fn gated_run(
    gate: &Arc<Semaphore>,
    batch_size: usize,
    cancel: &CancellationToken,
) -> (
    Arc<MockProvider>,
    Arc<MockSource>,
    JoinHandle<Result<IndexResult, RunError>>,
) {
    let provider = Arc::new(MockProvider::gated(gate.clone()));
    let entities: Vec<Entity> = (1..=9).map(person).collect();
    let config = IndexerConfig {
        max_payload_size: pair_len(&entities[0]),
    };
    let source = Arc::new(MockSource::new(entities));
    let indexer =
        Indexer::new(provider.clone(), source.clone(), "person_0123abc").with_config(config);

    let cancel = cancel.clone();
    let run = tokio::spawn(async move { indexer.by_id(1, 9, batch_size, &cancel).await });
    (provider, source, run)
}

#[tokio::test]
async fn test_bulk_body_is_action_then_document() {
    let provider = Arc::new(MockProvider::default());
    let entity = person(1);

    let result = indexer(&provider, MockSource::new(vec![entity.clone()]))
        .by_id(1, 1, 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.successful, 1);
    assert_eq!(result.failed, 0);

    let requests = provider.bulk_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "person_0123abc");
    let expected = format!(
        "{{\"index\":{{\"_id\":\"1\"}}}}\n{}\n",
        serde_json::to_string(&entity).unwrap()
    );
    assert_eq!(requests[0].1, expected);
}

#[tokio::test]
async fn test_requests_split_at_payload_ceiling_in_order() {
    let provider = Arc::new(MockProvider::default());
    let entities: Vec<Entity> = (1..=5).map(person).collect();
    let config = IndexerConfig {
        max_payload_size: pair_len(&entities[0]) * 2,
    };

    let result = indexer(&provider, MockSource::new(entities))
        .with_config(config)
        .by_id(1, 5, 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.successful, 5);
    let sizes: Vec<usize> = provider
        .bulk_requests()
        .iter()
        .map(|(_, body)| body.lines().count() / 2)
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(provider.indexed_ids(), vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn test_all_walks_the_source_id_range() {
    let provider = Arc::new(MockProvider::default());
    let source = Arc::new(MockSource::new((1..=5).map(person).collect()));
    let indexer = Indexer::new(provider.clone(), source.clone(), "person_0123abc");

    let result = indexer.all(2, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.successful, 5);
    assert_eq!(source.queries(), vec![(1, 2), (3, 4), (5, 5)]);
}

#[tokio::test]
async fn test_source_failure_returns_partial_totals() {
    let provider = Arc::new(MockProvider::default());
    let source = MockSource {
        fail_from: Some(3),
        ..MockSource::new((1..=5).map(person).collect())
    };

    let err = indexer(&provider, source)
        .by_id(1, 5, 2, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.error,
        IndexingError::Source(SourceError::DatabaseError(_))
    ));
    let partial = err.partial.expect("partial totals");
    assert_eq!(partial.successful, 2);
    assert_eq!(provider.indexed_ids(), vec!["1", "2"]);
}

#[tokio::test]
async fn test_failed_bulk_request_is_recorded_and_run_continues() {
    let provider = Arc::new(MockProvider::default());
    let entities: Vec<Entity> = (1..=4).map(person).collect();
    provider.push_bulk_response(Err(SearchIndexError::TooManyRequests));
    provider.push_bulk_response(Ok(BulkResult {
        successful: 1,
        failed: 1,
        error: Some("mapper_parsing_exception: failed to parse".to_string()),
    }));
    let config = IndexerConfig {
        max_payload_size: pair_len(&entities[0]) * 2,
    };

    let result = indexer(&provider, MockSource::new(entities))
        .with_config(config)
        .by_id(1, 4, 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(provider.bulk_requests().len(), 2);
    assert_eq!(result.successful, 1);
    assert_eq!(result.failed, 3);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].contains("Too many requests"));
    assert_eq!(result.errors[1], "mapper_parsing_exception: failed to parse");
}

#[tokio::test]
async fn test_oversized_document_is_skipped() {
    let provider = Arc::new(MockProvider::default());
    let huge = Entity::Person(Person {
        id: Some(2),
        surname: "x".repeat(4096),
        ..Default::default()
    });
    let entities = vec![person(1), huge, person(3)];
    let config = IndexerConfig {
        max_payload_size: pair_len(&entities[0]) * 4,
    };

    let result = indexer(&provider, MockSource::new(entities))
        .with_config(config)
        .by_id(1, 3, 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.successful, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("document 2 encodes"));
    assert_eq!(provider.indexed_ids(), vec!["1", "3"]);
}

#[tokio::test]
async fn test_cancellation_stops_a_stalled_run() {
    let provider = Arc::new(MockProvider::default());
    let source = MockSource {
        stall: true,
        ..MockSource::new(vec![person(1)])
    };
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        indexer(&provider, source).by_id(1, 10, 10, &cancel),
    )
    .await
    .expect("run should stop once cancelled")
    .unwrap_err();

    canceller.await.unwrap();
    assert!(matches!(err.error, IndexingError::Cancelled));
    assert_eq!(err.partial.map(|p| p.successful), Some(0));
    assert!(provider.bulk_requests().is_empty());
}

#[tokio::test]
async fn test_cancelled_before_start_reads_nothing() {
    let provider = Arc::new(MockProvider::default());
    let source = Arc::new(MockSource::new(vec![person(1)]));
    let indexer = Indexer::new(provider.clone(), source.clone(), "person_0123abc");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = indexer.all(10, &cancel).await.unwrap_err();

    assert!(matches!(err.error, IndexingError::Cancelled));
    assert!(err.partial.is_none());
    assert!(source.queries().is_empty());
}

#[tokio::test]
async fn test_from_date_indexes_everything_the_source_sends() {
    let provider = Arc::new(MockProvider::default());
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let result = indexer(&provider, MockSource::new((1..=3).map(person).collect()))
        .from_date(from, 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.successful, 3);
    assert_eq!(provider.indexed_ids(), vec!["1", "2", "3"]);
}

struct ByIdOnly;

#[async_trait]
impl EntitySource for ByIdOnly {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        Ok((0, 0))
    }

    async fn query_by_id(
        &self,
        _sink: &Sender<Entity>,
        _from: i64,
        _to: i64,
    ) -> Result<(), SourceError> {
        Ok(())
    }

    async fn query_from_date(
        &self,
        _sink: &Sender<Entity>,
        _from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        Err(SourceError::unsupported("firms cannot be queried by date"))
    }
}

#[tokio::test]
async fn test_from_date_on_unsupported_source_fails_without_writes() {
    let provider = Arc::new(MockProvider::default());
    let indexer = Indexer::new(provider.clone(), Arc::new(ByIdOnly), "firm_0123abc");

    let err = indexer
        .from_date(Utc::now(), 10, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.error,
        IndexingError::Source(SourceError::Unsupported(_))
    ));
    assert_eq!(err.partial.map(|p| p.successful), Some(0));
    assert!(provider.bulk_requests().is_empty());
}

#[tokio::test]
async fn test_producer_waits_while_the_channel_is_full() {
    let gate = Arc::new(Semaphore::new(0));
    let batch_size = 2;
    let (provider, source, run) = gated_run(&gate, batch_size, &CancellationToken::new());

    wait_until(|| provider.bulk_requests().len() == 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // two entities held by the stalled consumer, the rest buffered
    assert_eq!(source.sent(), 2 + batch_size);

    gate.add_permits(100);
    let result = run.await.unwrap().unwrap();

    assert_eq!(result.successful, 9);
    assert_eq!(source.sent(), 9);
    assert_eq!(
        provider.indexed_ids(),
        vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]
    );
}

#[tokio::test]
async fn test_cancellation_during_bulk_request_keeps_partial_totals() {
    let gate = Arc::new(Semaphore::new(1));
    let cancel = CancellationToken::new();
    let (provider, _source, run) = gated_run(&gate, 10, &cancel);

    wait_until(|| provider.bulk_requests().len() == 2).await;
    cancel.cancel();

    let err = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run should stop once cancelled")
        .unwrap()
        .unwrap_err();

    assert!(matches!(err.error, IndexingError::Cancelled));
    let partial = err.partial.expect("partial totals");
    assert_eq!(partial.successful, 1);
    assert_eq!(partial.failed, 0);
    assert_eq!(provider.bulk_requests().len(), 2);
}

#[tokio::test]
async fn test_cancelled_consumer_releases_a_blocked_producer() {
    let gate = Arc::new(Semaphore::new(0));
    let cancel = CancellationToken::new();
    let (provider, source, run) = gated_run(&gate, 1, &cancel);

    // consumer holds two entities in its flush, the channel holds a third
    wait_until(|| provider.bulk_requests().len() == 1 && source.sent() == 3).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(source.sent(), 3);

    cancel.cancel();

    let err = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run should not hang on the producer")
        .unwrap()
        .unwrap_err();

    assert!(matches!(err.error, IndexingError::Cancelled));
    assert_eq!(source.sent(), 3);
}
