//! Evaluation, transposition table, search and the worker-thread engine.

pub mod engine;
pub mod error;
pub mod eval;
pub mod options;
pub mod search;
pub mod time;

pub use engine::{Engine, NullObserver, SearchObserver};
pub use error::EngineError;
pub use eval::evaluate;
pub use options::SearchOptions;
pub use search::control::SearchControl;
pub use search::{MATE_SCORE, ScoreReport, SearchInfo, SearchPhase, SearchResult, SearchStats, Searcher};
pub use time::SearchConfig;
