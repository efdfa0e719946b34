// Sentence embeddings: trait-based abstraction over the embedding model.
//
// The Embedder trait is what the pipeline depends on. OnnxEmbedder runs
// all-MiniLM-L6-v2 locally; download fetches its files.

pub mod download;
pub mod onnx;
pub mod traits;

pub use traits::Embedder;
