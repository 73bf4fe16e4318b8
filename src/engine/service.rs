//! Background workers for searching and ingestion
//!
//! Callers submit work and get a `TaskHandle` back instead of blocking their
//! own thread. One worker thread serves searches and another applies
//! ingestion batches, each fed by its own channel.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, error, info, warn};

use super::events::SearchEvent;
use super::indexer::MovieIndexer;
use crate::error::{CinedexError, Result};
use crate::models::{MovieRecord, MovieResult};
use crate::query::SearchRequest;
use crate::segment::CommitInfo;

/// Pending result of submitted work
///
/// Dropping the handle abandons the result. Work already queued still runs.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    fn new() -> (Sender<Result<T>>, Self) {
        let (tx, rx) = channel::bounded(1);
        (tx, Self { rx })
    }

    /// Block until the result is available
    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .unwrap_or(Err(CinedexError::WorkerUnavailable))
    }

    /// Block for at most `timeout`; `None` if the work is still running
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(CinedexError::WorkerUnavailable)),
        }
    }

    /// Take the result if it is already available
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CinedexError::WorkerUnavailable)),
        }
    }
}

struct SearchJob {
    request: SearchRequest,
    limit: usize,
    reply: Sender<Result<Vec<MovieResult>>>,
}

struct IngestJob {
    records: Vec<MovieRecord>,
    reply: Sender<Result<Option<CommitInfo>>>,
}

/// Runs searches and ingestion off the caller's thread
pub struct SearchService {
    indexer: Arc<MovieIndexer>,
    search_tx: Option<Sender<SearchJob>>,
    ingest_tx: Option<Sender<IngestJob>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl SearchService {
    /// Start the workers without an event listener
    pub fn start(indexer: Arc<MovieIndexer>) -> Result<Self> {
        Self::spawn(indexer, None)
    }

    /// Start the workers, reporting search progress on `events`
    pub fn with_events(indexer: Arc<MovieIndexer>, events: Sender<SearchEvent>) -> Result<Self> {
        Self::spawn(indexer, Some(events))
    }

    fn spawn(indexer: Arc<MovieIndexer>, events: Option<Sender<SearchEvent>>) -> Result<Self> {
        let (search_tx, search_rx) = channel::unbounded::<SearchJob>();
        let (ingest_tx, ingest_rx) = channel::unbounded::<IngestJob>();

        let search_worker = {
            let indexer = Arc::clone(&indexer);
            thread::Builder::new()
                .name("cinedex-search".to_string())
                .spawn(move || run_searches(&indexer, search_rx, events.as_ref()))?
        };
        let ingest_worker = {
            let indexer = Arc::clone(&indexer);
            thread::Builder::new()
                .name("cinedex-ingest".to_string())
                .spawn(move || run_ingestion(&indexer, ingest_rx))?
        };

        info!("Search service started");
        Ok(Self {
            indexer,
            search_tx: Some(search_tx),
            ingest_tx: Some(ingest_tx),
            workers: vec![search_worker, ingest_worker],
        })
    }

    pub fn indexer(&self) -> &Arc<MovieIndexer> {
        &self.indexer
    }

    /// Queue a search with the configured default limit
    pub fn submit_search(&self, request: SearchRequest) -> TaskHandle<Vec<MovieResult>> {
        let limit = self.indexer.config().default_limit;
        self.submit_search_with_limit(request, limit)
    }

    pub fn submit_search_with_limit(
        &self,
        request: SearchRequest,
        limit: usize,
    ) -> TaskHandle<Vec<MovieResult>> {
        let (reply, handle) = TaskHandle::new();
        let job = SearchJob {
            request,
            limit,
            reply,
        };
        if let Some(tx) = &self.search_tx {
            if let Err(e) = tx.send(job) {
                warn!("search worker gone: {}", e);
            }
        }
        handle
    }

    /// Queue records for indexing as one commit
    pub fn submit_ingest(&self, records: Vec<MovieRecord>) -> TaskHandle<Option<CommitInfo>> {
        let (reply, handle) = TaskHandle::new();
        let job = IngestJob { records, reply };
        if let Some(tx) = &self.ingest_tx {
            if let Err(e) = tx.send(job) {
                warn!("ingest worker gone: {}", e);
            }
        }
        handle
    }

    /// Stop accepting work, drain queued jobs and join the workers
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.search_tx.take();
        self.ingest_tx.take();
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                error!(worker = %name, "Worker thread panicked");
            }
        }
        debug!("Search service stopped");
    }
}

impl Drop for SearchService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn emit(events: Option<&Sender<SearchEvent>>, event: SearchEvent) {
    if let Some(tx) = events {
        // A listener that went away just stops receiving
        let _ = tx.send(event);
    }
}

fn run_searches(
    indexer: &MovieIndexer,
    rx: Receiver<SearchJob>,
    events: Option<&Sender<SearchEvent>>,
) {
    while let Ok(job) = rx.recv() {
        emit(events, SearchEvent::LoadingStarted);
        let result = indexer.execute(&job.request, job.limit);
        match &result {
            Ok(results) => emit(events, SearchEvent::ResultsReady(results.clone())),
            Err(e) => {
                error!(mode = job.request.mode(), "Search failed: {}", e);
                emit(events, SearchEvent::SearchFailed(e.to_string()));
            }
        }
        emit(events, SearchEvent::LoadingFinished);
        let _ = job.reply.send(result);
    }
}

fn run_ingestion(indexer: &MovieIndexer, rx: Receiver<IngestJob>) {
    while let Ok(job) = rx.recv() {
        // Runs to completion even when nobody waits for the outcome
        let result = indexer.add_documents(&job.records);
        if let Err(e) = &result {
            error!(records = job.records.len(), "Ingestion failed: {}", e);
        }
        let _ = job.reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn service() -> SearchService {
        let indexer = MovieIndexer::build(
            &[MovieRecord::new(1, "Alien").with_release_date("1979-05-25")],
            EngineConfig::default(),
        )
        .unwrap();
        SearchService::start(Arc::new(indexer)).unwrap()
    }

    #[test]
    fn test_submit_search() {
        let service = service();
        let results = service
            .submit_search(SearchRequest::boosted("alien"))
            .wait()
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
        service.shutdown();
    }

    #[test]
    fn test_ingest_then_search() {
        let service = service();
        let info = service
            .submit_ingest(vec![MovieRecord::new(2, "Aliens")])
            .wait()
            .unwrap()
            .unwrap();
        assert_eq!(info.total_docs, 2);

        let handle = service.submit_search(SearchRequest::boosted("aliens"));
        let results = handle
            .wait_timeout(Duration::from_secs(10))
            .expect("search timed out")
            .unwrap();
        assert!(results.iter().any(|r| r.id == 2));
    }

    #[test]
    fn test_dropped_ingest_handle_still_commits() {
        let service = service();
        drop(service.submit_ingest(vec![MovieRecord::new(2, "Aliens")]));
        let indexer = Arc::clone(service.indexer());
        service.shutdown();
        assert_eq!(indexer.doc_count(), 2);
    }

    #[test]
    fn test_events() {
        let indexer = MovieIndexer::build(&[MovieRecord::new(1, "Alien")], EngineConfig::default())
            .unwrap();
        let (tx, rx) = channel::unbounded();
        let service = SearchService::with_events(Arc::new(indexer), tx).unwrap();

        service
            .submit_search(SearchRequest::boosted("alien"))
            .wait()
            .unwrap();
        service.shutdown();

        let events: Vec<SearchEvent> = rx.iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SearchEvent::LoadingStarted);
        assert!(matches!(&events[1], SearchEvent::ResultsReady(r) if r.len() == 1));
        assert!(events[2].is_terminal());
    }

    #[test]
    fn test_restart_over_shared_indexer() {
        let service = service();
        let indexer = Arc::clone(service.indexer());
        service.shutdown();

        let service = SearchService::start(indexer).unwrap();
        let handle = service.submit_search(SearchRequest::year("1979"));
        assert_eq!(handle.wait().unwrap().len(), 1);
    }
}
