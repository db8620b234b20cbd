// Resume matching: skill extraction, semantic similarity, score fusion, and the
// per-submission pipeline that ties them to storage.
// All embedding calls go through the `Embedder` trait; nothing here loads a model directly.

pub mod embedding;
pub mod handlers;
pub mod pipeline;
pub mod scoring;
pub mod skills;
