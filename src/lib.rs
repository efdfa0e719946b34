// survey-topics: topic discovery for free-text survey responses
//
// This is the library root. Each module corresponds to one stage of the
// pipeline, plus the shared config, error and output plumbing.

pub mod cluster;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod topics;
