//! Sentence embeddings behind the `Embedder` trait, used for semantic similarity.
//!
//! Default: `FastEmbedder` (all-MiniLM-L6-v2 via fastembed, loaded once at startup).
//!
//! `AppState` holds the embedder as `Arc<dyn Embedder>` inside the `Matcher`.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding model failed: {0}")]
    Model(String),

    #[error("Embedding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Model returned no embedding")]
    Empty,

    #[error("Embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Encodes a whole text into one dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// fastembed-backed encoder. The ONNX session is used by one caller at a time.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Loads (downloading on first use) the all-MiniLM-L6-v2 model. Blocking.
    pub fn load(cache_dir: &Path) -> Result<Self, EmbeddingError> {
        info!("Loading embedding model all-MiniLM-L6-v2 from {}", cache_dir.display());
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir.to_path_buf())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::Model(e.to_string()))?;
        info!("Embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let model = lock_model(&model);
            let mut vectors = model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Model(e.to_string()))?;
            vectors.pop().ok_or(EmbeddingError::Empty)
        })
        .await?
    }
}

/// A panic inside a previous `embed` call leaves the session itself intact,
/// so a poisoned lock is taken over instead of failing every later request.
fn lock_model<T>(model: &Mutex<T>) -> MutexGuard<'_, T> {
    model.lock().unwrap_or_else(|poisoned| {
        warn!("Embedding model lock was poisoned by a panicked call; recovering");
        model.clear_poison();
        PoisonError::into_inner(poisoned)
    })
}

/// Cosine similarity between two embeddings, rejecting mismatched dimensions.
pub fn semantic_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(crate::matching::scoring::cosine_similarity(a, b))
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Deterministic bag-of-letters embedder: texts sharing letters point the same way.
    pub struct LetterEmbedder;

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut v = vec![0.0_f32; 26];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
            }
            Ok(v)
        }
    }

    /// Fails whenever the text contains the marker, succeeds like `LetterEmbedder` otherwise.
    pub struct FailingEmbedder {
        pub marker: &'static str,
    }

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.contains(self.marker) {
                return Err(EmbeddingError::Model("refused".to_string()));
            }
            LetterEmbedder.embed(text).await
        }
    }
}
