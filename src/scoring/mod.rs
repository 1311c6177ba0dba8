//! Score fusion and ranking
//!
//! `fuser` turns oracle relevance into fused scores using the graph's
//! structural confidence; `ranker` orders the result deterministically.
//! `ppr` ranks concepts by personalized PageRank over the relation graph
//! and `mmr` picks diverse, relevant passages.

pub mod fuser;
pub mod mmr;
pub mod normalise;
pub mod ppr;
pub mod ranker;

pub use fuser::{fuse, validate_depth_decay, ScoreFuser, DEFAULT_DEPTH_DECAY};
pub use mmr::MmrReranker;
pub use normalise::logistic;
pub use ppr::{personalization, PersonalizedPageRank};
pub use ranker::{compare_scored, rank, Ranker};
