//! Worker-thread engine: one background search at a time, with pondering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use kestrel_core::{Move, Position};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::options::SearchOptions;
use crate::search::control::SearchControl;
use crate::search::{SearchInfo, SearchResult, Searcher};
use crate::time::{SearchConfig, control_from_config};

/// Receives search progress. Called from the worker thread.
pub trait SearchObserver: Send + Sync {
    /// After every completed iteration.
    fn on_info(&self, _info: &SearchInfo) {}

    /// Once per search that is not discarded by a ponder miss.
    fn on_best_move(&self, _best: Move, _ponder: Option<Move>) {}

    /// Whenever the table is (re)allocated, with the size actually in use.
    fn on_hash_resized(&self, _megabytes: usize) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

/// A search running on its own thread. The worker owns the [`Searcher`]
/// and hands it back on join.
struct Worker {
    handle: JoinHandle<(Searcher, SearchResult)>,
    control: Arc<SearchControl>,
    discard: Arc<AtomicBool>,
}

/// Runs searches on a background thread and reports through a
/// [`SearchObserver`].
pub struct Engine {
    searcher: Option<Searcher>,
    options: SearchOptions,
    observer: Arc<dyn SearchObserver>,
    worker: Option<Worker>,
    /// Options changed while the worker held the searcher.
    pending_options: bool,
    pending_clear: bool,
}

impl Engine {
    pub fn new(options: SearchOptions, observer: Arc<dyn SearchObserver>) -> Engine {
        let searcher = Searcher::new(options.clone());
        observer.on_hash_resized(searcher.tt().megabytes());
        Engine {
            searcher: Some(searcher),
            options,
            observer,
            worker: None,
            pending_options: false,
            pending_clear: false,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Start searching a copy of `pos` in the background.
    ///
    /// Returns once the worker has initialized. A search already running
    /// is stopped first (its best move is still reported).
    pub fn start_search(&mut self, pos: &Position, config: SearchConfig) -> Result<(), EngineError> {
        if self.worker.is_some() {
            debug!("start requested while searching, stopping the running search");
            self.stop()?;
        }

        let mut searcher = self.take_searcher();
        let mut pos = pos.clone();
        let control = Arc::new(control_from_config(&config, &pos, Arc::new(AtomicBool::new(false))));
        let discard = Arc::new(AtomicBool::new(false));
        let (latch_tx, latch_rx) = mpsc::sync_channel::<()>(1);

        let observer = Arc::clone(&self.observer);
        let worker_control = Arc::clone(&control);
        let worker_discard = Arc::clone(&discard);

        info!(ponder = config.ponder, infinite = config.infinite, depth = ?config.depth, "search started");
        let handle = thread::Builder::new().name("kestrel-search".into()).spawn(move || {
            searcher.prepare();
            let _ = latch_tx.send(());
            let result = searcher.run(&mut pos, &config, &worker_control, |info| observer.on_info(info));
            if !worker_discard.load(Ordering::Acquire) {
                observer.on_best_move(result.best_move, result.ponder_move);
            }
            (searcher, result)
        })?;

        self.worker = Some(Worker { handle, control, discard });
        if latch_rx.recv().is_err() {
            warn!("search worker exited before initializing");
            return self.stop().and(Err(EngineError::WorkerLost));
        }
        Ok(())
    }

    /// Stop the running search and return its result; `None` when idle.
    pub fn stop(&mut self) -> Result<Option<SearchResult>, EngineError> {
        match self.worker.take() {
            Some(worker) => {
                worker.control.stop();
                self.join(worker).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Block until the running search finishes on its own. Never returns
    /// for an infinite search or an unanswered ponder search.
    pub fn wait(&mut self) -> Result<Option<SearchResult>, EngineError> {
        match self.worker.take() {
            Some(worker) => self.join(worker).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.handle.is_finished())
    }

    /// The opponent played the expected move: start the clock of the
    /// running ponder search. Returns whether a ponder search was running.
    pub fn ponder_hit(&self) -> bool {
        match &self.worker {
            Some(worker) if worker.control.is_pondering() => {
                info!("ponder hit");
                worker.control.activate();
                true
            }
            _ => {
                warn!("ponder hit without a ponder search");
                false
            }
        }
    }

    /// The opponent played something else: stop the ponder search and drop
    /// its result without reporting a best move.
    pub fn ponder_miss(&mut self) -> Result<(), EngineError> {
        if let Some(worker) = &self.worker {
            info!("ponder miss");
            worker.discard.store(true, Ordering::Release);
        }
        self.stop().map(|_| ())
    }

    /// Replace the tunables. Applied right away when idle, otherwise when
    /// the running search returns.
    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
        self.pending_options = true;
        if self.worker.is_none() {
            self.apply_pending();
        }
    }

    pub fn resize_hash(&mut self, megabytes: usize) {
        let options = SearchOptions { hash_mb: megabytes, ..self.options.clone() };
        self.set_options(options);
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.pending_clear = true;
        if self.worker.is_none() {
            self.apply_pending();
        }
    }

    fn take_searcher(&mut self) -> Searcher {
        match self.searcher.take() {
            Some(searcher) => searcher,
            None => {
                let searcher = Searcher::new(self.options.clone());
                self.observer.on_hash_resized(searcher.tt().megabytes());
                searcher
            }
        }
    }

    fn join(&mut self, worker: Worker) -> Result<SearchResult, EngineError> {
        match worker.handle.join() {
            Ok((searcher, result)) => {
                debug!(best = %result.best_move, "search worker joined");
                self.searcher = Some(searcher);
                self.apply_pending();
                Ok(result)
            }
            Err(_) => {
                warn!("search worker panicked");
                self.pending_options = false;
                self.pending_clear = false;
                Err(EngineError::WorkerLost)
            }
        }
    }

    fn apply_pending(&mut self) {
        let Some(searcher) = self.searcher.as_mut() else {
            return;
        };
        if std::mem::take(&mut self.pending_options) {
            let resized = searcher.options().hash_mb != self.options.hash_mb;
            searcher.set_options(self.options.clone());
            if resized {
                self.observer.on_hash_resized(searcher.tt().megabytes());
            }
        }
        if std::mem::take(&mut self.pending_clear) {
            searcher.clear_tt();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.control.stop();
            let _ = worker.handle.join();
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("searching", &self.is_searching())
            .finish()
    }
}
