//! Search control: stop flag, deadlines and node budget.
//!
//! Deadlines are checked against a monotonic clock from inside the search
//! every [`CHECK_INTERVAL`] nodes; no timer thread is involved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Nodes between clock reads. Must be a power of two.
pub const CHECK_INTERVAL: u64 = 1024;

/// Decides when a running search must give up.
///
/// Three clock modes:
/// - **Unlimited**: only the stop flag and the node budget end the search.
/// - **Timed**: the clock starts at construction.
/// - **Ponder**: limits are known but the clock stays off until
///   [`activate`](SearchControl::activate) is called on a ponder hit.
///
/// Infinite and ponder searches that run out of work on their own wait
/// for the caller (see [`must_wait`](SearchControl::must_wait)) instead of
/// reporting early.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    clock_active: AtomicBool,
    pondering: AtomicBool,
    infinite: bool,
    start: Mutex<Option<Instant>>,
    created: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    fn build(stopped: Arc<AtomicBool>, soft: Option<Duration>, hard: Option<Duration>, clock: bool) -> Self {
        let now = Instant::now();
        SearchControl {
            stopped,
            clock_active: AtomicBool::new(clock),
            pondering: AtomicBool::new(false),
            infinite: false,
            start: Mutex::new(clock.then_some(now)),
            created: now,
            soft_limit: soft,
            hard_limit: hard,
            node_limit: None,
        }
    }

    /// No time limit: depth- or node-limited searches and `infinite`.
    pub fn new_unlimited(stopped: Arc<AtomicBool>) -> Self {
        Self::build(stopped, None, None, false)
    }

    /// Soft and hard limits with the clock running from now.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self::build(stopped, Some(soft), Some(hard), true)
    }

    /// Limits that only start counting on [`activate`](Self::activate).
    pub fn new_ponder(stopped: Arc<AtomicBool>, soft: Option<Duration>, hard: Option<Duration>) -> Self {
        let control = Self::build(stopped, soft, hard, false);
        control.pondering.store(true, Ordering::Release);
        control
    }

    /// Keep searching (and then wait) until stopped from outside.
    pub fn with_infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self
    }

    pub fn with_node_limit(mut self, nodes: Option<u64>) -> Self {
        self.node_limit = nodes;
        self
    }

    /// Ponder hit: start the clock now and stop pondering.
    pub fn activate(&self) {
        *self.start.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.clock_active.store(true, Ordering::Release);
        self.pondering.store(false, Ordering::Release);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn is_pondering(&self) -> bool {
        self.pondering.load(Ordering::Acquire)
    }

    /// Whether the search must abort now.
    ///
    /// The flag is read every call; the node budget and the hard deadline
    /// are checked every [`CHECK_INTERVAL`] nodes and latch the flag when
    /// they trip.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.is_stopped() {
            return true;
        }
        if nodes & (CHECK_INTERVAL - 1) != 0 {
            return false;
        }
        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stop();
            return true;
        }
        if self.clock_active.load(Ordering::Acquire)
            && let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stop();
            return true;
        }
        false
    }

    /// Whether to skip starting another iteration: stopped, or the soft
    /// deadline has passed.
    pub fn should_stop_iterating(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if !self.clock_active.load(Ordering::Acquire) {
            return false;
        }
        self.soft_limit.is_some_and(|soft| self.elapsed() >= soft)
    }

    /// Whether a search that has finished on its own must hold its result
    /// back: infinite searches until stopped, ponder searches until a hit
    /// or a stop.
    pub fn must_wait(&self) -> bool {
        !self.is_stopped() && (self.infinite || self.is_pondering())
    }

    /// Time on the clock since it was started, or zero while inactive.
    pub fn elapsed(&self) -> Duration {
        self.start
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Wall time since construction, regardless of the clock mode.
    pub fn wall_time(&self) -> Duration {
        self.created.elapsed()
    }

    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
