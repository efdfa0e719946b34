// Topic discovery pipeline: normalize -> embed -> group -> keywords -> rank.
//
// Each stage is fully materialized before the next one starts, and
// responses keep their input order the whole way through. The embedder is
// the only stage that touches the outside world, so it is the only one
// behind a trait object.

pub mod analyze;

pub use analyze::{analyze, decode_input, TopicPipeline};
