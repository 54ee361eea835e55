//! Source orchestration.
//!
//! This module wires the individual price sources into a complete refresh:
//! the oracle chain and fiat fetcher composed as a [`RatePipeline`].

mod pipeline;

pub use pipeline::{PipelineBuilder, RatePipeline, ORACLE_TIMEOUT_FACTOR};
