//! # Movie Data Fetcher
//!
//! Resolves the detail record and the recommendation list for the movie a
//! view is showing, and publishes the result through a `watch` channel:
//! 1. `observe(id)` bumps the ticket and publishes `Loading` for `id`
//! 2. A task runs both requests concurrently with `tokio::try_join!`
//! 3. On completion the task publishes `Ready` or `Failed`, but only if its
//!    ticket is still the current one
//!
//! Step 3 is a compare-and-write inside `send_if_modified`, so a request for
//! a movie the view has already navigated away from can finish at any time
//! without touching the state of the movie now on screen. Superseded tasks
//! are left to finish rather than aborted.

use std::sync::{Arc, Mutex};

use catalog::{Movie, MovieId};
use tmdb_client::{FetchError, MovieService};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::{FetchState, MovieDetails, Observation};

pub struct MovieDataFetcher<S> {
    service: Arc<S>,
    state: Arc<watch::Sender<Observation>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: MovieService + 'static> MovieDataFetcher<S> {
    pub fn new(service: S) -> Self {
        Self::from_shared(Arc::new(service))
    }

    /// Build a fetcher over a service handle shared with other components
    pub fn from_shared(service: Arc<S>) -> Self {
        let (state, _) = watch::channel(Observation::idle());
        Self {
            service,
            state: Arc::new(state),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// One request for the movie's detail record
    pub async fn fetch_detail(&self, id: MovieId) -> Result<Movie, FetchError> {
        debug!("Fetching detail for movie {}", id);
        self.service.fetch_detail(id).await
    }

    /// One request for the first page of recommendations
    pub async fn fetch_recommendations(&self, id: MovieId) -> Result<Vec<Movie>, FetchError> {
        debug!("Fetching recommendations for movie {}", id);
        self.service.fetch_recommendations(id).await
    }

    /// Start loading `id` and return a receiver for its state.
    ///
    /// Any earlier observation is superseded: its results are dropped when
    /// they arrive. Must be called from within a tokio runtime.
    pub fn observe(&self, id: MovieId) -> watch::Receiver<Observation> {
        // Ticket allocation and the Loading write happen under one lock
        let mut ticket = 0;
        self.state.send_modify(|current| {
            ticket = current.ticket + 1;
            *current = Observation {
                ticket,
                id: Some(id),
                state: FetchState::Loading,
            };
        });
        info!("Observing movie {} (ticket {})", id, ticket);

        let receiver = self.state.subscribe();

        let service = self.service.clone();
        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            let outcome = tokio::try_join!(
                service.fetch_detail(id),
                service.fetch_recommendations(id)
            );

            let next = match outcome {
                Ok((movie, recommendations)) => {
                    debug!(
                        "Movie {} resolved with {} recommendations",
                        id,
                        recommendations.len()
                    );
                    FetchState::Ready(MovieDetails {
                        movie,
                        recommendations,
                    })
                }
                Err(e) => {
                    warn!("Loading movie {} failed: {}", id, e);
                    FetchState::Failed(e)
                }
            };

            let applied = state.send_if_modified(|current| {
                if current.ticket != ticket {
                    return false;
                }
                current.state = next;
                true
            });
            if !applied {
                debug!("Discarded stale result for movie {} (ticket {})", id, ticket);
            }
        });

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.retain(|task| !task.is_finished());
            tasks.push(handle);
        }

        receiver
    }

    /// Another receiver on the same state, without starting a request
    pub fn subscribe(&self) -> watch::Receiver<Observation> {
        self.state.subscribe()
    }

    /// Snapshot of the latest observation
    pub fn current(&self) -> Observation {
        self.state.borrow().clone()
    }
}

impl<S> Drop for MovieDataFetcher<S> {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.get_mut() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}
