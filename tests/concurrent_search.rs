use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cinedex::config::{QueryConfig, ScoringConfig};
use cinedex::query::{QueryBuilder, Searcher};
use cinedex::{
    Analyzer, EngineConfig, MovieIndexer, MovieRecord, SearchEvent, SearchRequest, SearchService,
};

fn seed() -> Vec<MovieRecord> {
    (1..=50)
        .map(|i| {
            MovieRecord::new(i, format!("Station {}", i))
                .with_release_date("2000-01-01")
                .with_genres(["Drama"])
        })
        .collect()
}

#[test]
fn test_snapshot_ignores_later_commits() {
    let indexer = MovieIndexer::build(&seed(), EngineConfig::default()).unwrap();
    let before = indexer.snapshot();

    indexer
        .add_documents(&[MovieRecord::new(999, "Lighthouse")])
        .unwrap();

    let query = QueryBuilder::new(Analyzer::default(), QueryConfig::default())
        .build(&SearchRequest::boosted("lighthouse"))
        .unwrap()
        .unwrap();

    let old = Searcher::new(Arc::clone(&before), &ScoringConfig::default()).search(&query, 30);
    let new = Searcher::new(indexer.snapshot(), &ScoringConfig::default()).search(&query, 30);

    assert!(old.is_empty());
    assert_eq!(new.len(), 1);
    assert_eq!(before.doc_count(), 50);
    assert_eq!(before.generation() + 1, indexer.generation());
}

#[test]
fn test_concurrent_reads_during_writes() {
    let indexer = Arc::new(MovieIndexer::build(&seed(), EngineConfig::default()).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let indexer = Arc::clone(&indexer);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_generation = 0;
                let mut searches = 0u32;
                while !done.load(Ordering::Acquire) || searches == 0 {
                    let snapshot = indexer.snapshot();
                    assert!(snapshot.generation() >= last_generation);
                    last_generation = snapshot.generation();

                    // Every committed batch is fully visible or not at all
                    assert_eq!(snapshot.doc_count() % 10, 0);

                    let hits = indexer.search_by_year_with_limit("2000", 1_000).unwrap();
                    assert!(hits.len() >= 50);
                    searches += 1;
                }
                searches
            })
        })
        .collect();

    for batch in 0..20u64 {
        let records: Vec<MovieRecord> = (0..10)
            .map(|i| {
                let id = 1_000 + batch * 10 + i;
                MovieRecord::new(id, format!("Harbor {}", id)).with_release_date("2000-02-02")
            })
            .collect();
        indexer.add_documents(&records).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(indexer.doc_count(), 250);
    assert_eq!(indexer.search_by_year_with_limit("2000", 1_000).unwrap().len(), 250);
}

#[test]
fn test_service_interleaves_ingest_and_search() {
    let indexer = Arc::new(MovieIndexer::build(&seed(), EngineConfig::default()).unwrap());
    let (tx, rx) = crossbeam::channel::unbounded();
    let service = SearchService::with_events(Arc::clone(&indexer), tx).unwrap();

    let ingest = service.submit_ingest(vec![MovieRecord::new(500, "Lighthouse Keeper")]);
    let commit = ingest.wait().unwrap().unwrap();
    assert_eq!(commit.total_docs, 51);

    let search = service.submit_search(SearchRequest::boosted("lighthouse"));
    let results = search
        .wait_timeout(Duration::from_secs(10))
        .expect("search did not finish")
        .unwrap();
    assert_eq!(results[0].id, 500);

    service.shutdown();
    let events: Vec<SearchEvent> = rx.iter().collect();
    assert_eq!(
        events,
        vec![
            SearchEvent::LoadingStarted,
            SearchEvent::ResultsReady(results),
            SearchEvent::LoadingFinished,
        ]
    );
}

#[test]
fn test_abandoned_search_does_not_block_service() {
    let indexer = Arc::new(MovieIndexer::build(&seed(), EngineConfig::default()).unwrap());
    let service = SearchService::start(Arc::clone(&indexer)).unwrap();

    for _ in 0..10 {
        drop(service.submit_search(SearchRequest::boosted("station")));
    }
    let results = service
        .submit_search_with_limit(SearchRequest::year("2000"), 5)
        .wait()
        .unwrap();
    assert_eq!(results.len(), 5);
}
