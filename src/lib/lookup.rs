use super::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{spawn, JoinHandle};
use std::time::{Duration, Instant};

/// Message sent by a lookup worker once its request has settled.
#[derive(Debug)]
pub struct Completion {
    pub id: u64,
    pub query: Query,
    pub result: Result<Vec<CountryRecord>, FetchError>,
    pub elapsed: Duration,
}

/// Issues lookups on worker threads and keeps track of which one is current.
///
/// Every lookup gets a fresh id. Only the completion carrying the id of the
/// most recently issued lookup is handed back by `accept`; everything else
/// is stale and dropped.
pub struct Lookups {
    source: Arc<dyn CountrySource>,
    workers: Vec<(u64, JoinHandle<()>)>,
    channel: (Sender<Completion>, Receiver<Completion>),
    current: Option<(u64, Query)>,
    id: u64,
}

impl Lookups {
    /// Create a new `Lookups` fetching from `source`.
    pub fn new(source: Arc<dyn CountrySource>) -> Self {
        Self {
            source,
            workers: vec![],
            channel: unbounded(),
            current: None,
            id: 0,
        }
    }

    /// Spawn a worker for `query` and make it the current lookup.
    pub fn issue(&mut self, query: Query) -> u64 {
        let id = self.id;
        self.id += 1;

        let tx = self.channel.0.clone();
        let source = self.source.clone();

        log::debug!("Issuing lookup {} for {}", id, query);
        self.current = Some((id, query.clone()));
        self.workers.push((
            id,
            spawn(move || {
                let start = Instant::now();
                let result = source.fetch(&query);
                let completion = Completion {
                    id,
                    query,
                    result,
                    elapsed: start.elapsed(),
                };
                if tx.send(completion).is_err() {
                    log::debug!("Could not send the lookup completion. This most likely happened because the session was dropped.")
                }
            }),
        ));
        id
    }

    /// Forget the current lookup. Whatever is still in flight becomes stale.
    pub fn invalidate(&mut self) {
        if let Some((id, _)) = self.current.take() {
            log::debug!("Invalidating lookup {}", id);
        }
    }

    /// Whether the current lookup has not settled yet.
    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// The query of the current lookup, if one is running.
    pub fn current_query(&self) -> Option<&Query> {
        self.current.as_ref().map(|(_, query)| query)
    }

    /// Receiving end of the completion channel, for use in `select!`.
    pub fn completions(&self) -> &Receiver<Completion> {
        &self.channel.1
    }

    /// Join the worker of `completion` and return it if it is current.
    pub fn accept(&mut self, completion: Completion) -> Option<Completion> {
        self.join(completion.id);

        if self.current.as_ref().map(|(id, _)| *id) == Some(completion.id) {
            self.current = None;
            Some(completion)
        } else {
            log::trace!(
                "Discarding stale lookup {} for {}",
                completion.id,
                completion.query
            );
            None
        }
    }

    fn join(&mut self, id: u64) {
        if let Some(i) = self.workers.iter().position(|w| w.0 == id) {
            let (_, handle) = self.workers.remove(i);
            if let Err(e) = handle.join() {
                log::error!(
                    "Failed to join lookup worker thread for {}. Reason:\r\n{:?}",
                    id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
struct Fixed(Vec<CountryRecord>);

#[cfg(test)]
impl CountrySource for Fixed {
    fn fetch(&self, _query: &Query) -> Result<Vec<CountryRecord>, FetchError> {
        Ok(self.0.clone())
    }
}

#[test]
fn only_the_latest_lookup_is_accepted() {
    let mut lookups = Lookups::new(Arc::new(Fixed(vec![country::germany()])));

    let first = lookups.issue(Query::name("germany"));
    let second = lookups.issue(Query::name("germany"));
    assert!(lookups.in_flight());
    assert_eq!(lookups.current_query(), Some(&Query::name("germany")));

    let mut accepted = vec![];
    for _ in 0..2 {
        let completion = lookups.completions().recv().unwrap();
        if let Some(c) = lookups.accept(completion) {
            accepted.push(c.id);
        }
    }

    assert_ne!(first, second);
    assert_eq!(accepted, vec![second]);
    assert!(!lookups.in_flight());
    assert!(lookups.workers.is_empty());
}

#[test]
fn invalidated_lookups_are_discarded() {
    let mut lookups = Lookups::new(Arc::new(Fixed(vec![])));

    lookups.issue(Query::region("europe"));
    lookups.invalidate();
    assert!(!lookups.in_flight());

    let completion = lookups.completions().recv().unwrap();
    assert!(lookups.accept(completion).is_none());
}
