// src/state.rs
//! Observable request state for the screens.
//!
//! Each controller owns one in-flight task at a time. Starting a new request
//! aborts the previous one, and dropping the controller aborts whatever is
//! still running. Every transition is published exactly once, in order, to
//! all subscribers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{AnalysisError, CareerMatchError};
use crate::job_search::{JobSearchQuery, JobSearchService};
use crate::recommendation::RecommendationPipeline;
use crate::types::{AnalysisResult, JobPosting, UserId};

const CHANNEL_CAPACITY: usize = 64;

/// Current value plus a stream of every later value.
pub struct Observable<T: Clone> {
    current: Mutex<T>,
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            current: Mutex::new(initial),
            sender,
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn publish(&self, value: T) {
        self.update(|_| Some(value));
    }

    /// Computes the next value from the current one under the lock.
    /// Returning `None` publishes nothing.
    pub fn update(&self, next: impl FnOnce(&T) -> Option<T>) -> bool {
        let mut current = self.lock();
        let Some(value) = next(&current) else {
            return false;
        };
        *current = value.clone();
        // No receivers is fine; the snapshot still holds the value
        let _ = self.sender.send(value);
        true
    }

    /// Waits until the value satisfies `done` and returns it.
    pub async fn wait_until(&self, done: impl Fn(&T) -> bool) -> T {
        let mut receiver = self.subscribe();
        let current = self.snapshot();
        if done(&current) {
            return current;
        }

        loop {
            match receiver.recv().await {
                Ok(value) if done(&value) => return value,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("State subscriber lagged by {} updates", skipped);
                    let current = self.snapshot();
                    if done(&current) {
                        return current;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return self.snapshot(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T, E> {
    Idle,
    Requesting,
    Completed(T),
    Failed(E),
}

impl<T, E> RequestState<T, E> {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

/// Holds at most one running task.
#[derive(Default)]
pub struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the previous task, if any, and keeps `handle` instead.
    pub fn replace(&self, handle: JoinHandle<()>) {
        let mut slot = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = slot.replace(handle) {
            if !previous.is_finished() {
                debug!("Cancelling in-flight task");
            }
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        let mut slot = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub type AnalysisState = RequestState<AnalysisResult, AnalysisError>;

/// Drives compatibility analysis for one signed-in user.
pub struct AnalysisController {
    pipeline: Arc<RecommendationPipeline>,
    uid: UserId,
    state: Arc<Observable<AnalysisState>>,
    generation: Arc<AtomicU64>,
    slot: TaskSlot,
}

impl AnalysisController {
    pub fn new(pipeline: Arc<RecommendationPipeline>, uid: UserId) -> Self {
        Self {
            pipeline,
            uid,
            state: Arc::new(Observable::new(RequestState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            slot: TaskSlot::new(),
        }
    }

    pub fn state(&self) -> Arc<Observable<AnalysisState>> {
        self.state.clone()
    }

    /// Starts an analysis, cancelling and replacing any in flight.
    pub fn request(&self, job_description: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.slot.cancel();
        self.state.publish(RequestState::Requesting);

        let pipeline = self.pipeline.clone();
        let uid = self.uid.clone();
        let state = self.state.clone();
        let latest = self.generation.clone();
        let job_description = job_description.to_string();

        let handle = tokio::spawn(async move {
            let outcome = match pipeline.analyze(&uid, &job_description).await {
                Ok(result) => RequestState::Completed(result),
                Err(e) => RequestState::Failed(e),
            };
            state.update(|_| (latest.load(Ordering::SeqCst) == generation).then_some(outcome));
        });
        self.slot.replace(handle);
    }

    /// Back to idle, dropping any result.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.slot.cancel();
        self.state.publish(RequestState::Idle);
    }

    pub async fn settled(&self) -> AnalysisState {
        self.state.wait_until(RequestState::is_settled).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub jobs: Vec<JobPosting>,
    pub loading: bool,
    pub error: Option<CareerMatchError>,
}

/// Drives job search. A failed search keeps the previous job list.
pub struct SearchController {
    service: Arc<JobSearchService>,
    state: Arc<Observable<SearchState>>,
    generation: Arc<AtomicU64>,
    slot: TaskSlot,
}

impl SearchController {
    pub fn new(service: Arc<JobSearchService>) -> Self {
        Self {
            service,
            state: Arc::new(Observable::new(SearchState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            slot: TaskSlot::new(),
        }
    }

    pub fn state(&self) -> Arc<Observable<SearchState>> {
        self.state.clone()
    }

    /// Any search in flight is superseded, including by a query that fails
    /// validation.
    pub fn search(&self, title: &str, location: &str, limit: Option<u32>, offset: Option<u32>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.slot.cancel();

        let query = match JobSearchQuery::new(title, location) {
            Ok(query) => query.with_page(limit, offset),
            Err(e) => {
                self.state.update(|current| {
                    Some(SearchState {
                        jobs: current.jobs.clone(),
                        loading: false,
                        error: Some(e),
                    })
                });
                return;
            }
        };

        self.state.update(|current| {
            Some(SearchState {
                loading: true,
                error: None,
                ..current.clone()
            })
        });

        let service = self.service.clone();
        let state = self.state.clone();
        let latest = self.generation.clone();

        let handle = tokio::spawn(async move {
            let outcome = service.run(&query).await;
            state.update(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return None;
                }
                Some(match outcome {
                    Ok(jobs) => SearchState {
                        jobs,
                        loading: false,
                        error: None,
                    },
                    Err(e) => SearchState {
                        jobs: current.jobs.clone(),
                        loading: false,
                        error: Some(e),
                    },
                })
            });
        });
        self.slot.replace(handle);
    }

    pub async fn settled(&self) -> SearchState {
        self.state.wait_until(|s| !s.loading).await
    }
}
