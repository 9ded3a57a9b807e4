use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;
use wikiembed_core::{EmbedFailure, Embedder, Embedding};

/// Deterministic bag-of-tokens embedder: same text, same L2-normalized vector.
pub struct FakeEmbedder {
    dim: usize,
    id: String,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1), id: format!("fake:d{}", dim.max(1)) }
    }

    pub fn dim(&self) -> usize { self.dim }
}

impl Embedder for FakeEmbedder {
    fn embedder_id(&self) -> &str { &self.id }

    fn embed(&self, text: &str) -> Result<Embedding, EmbedFailure> {
        let mut v = vec![0f64; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = f64::from((h >> 32) as u32) / f64::from(u32::MAX);
            v[idx] += val + (i % 3) as f64 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        Ok(v)
    }
}
