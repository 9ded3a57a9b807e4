//! wikiembed-client
//!
//! Embedding Client implementations behind the `wikiembed_core::Embedder`
//! trait: a blocking HTTP client for a text-embeddings endpoint and a
//! deterministic fake for tests and offline runs.
pub mod fake;
pub mod http;
pub mod response;
pub mod retry;

pub use fake::FakeEmbedder;
pub use http::HttpEmbedder;
pub use response::parse_embedding;
pub use retry::RetryPolicy;

use tracing::info;
use wikiembed_core::config::EmbedSettings;
use wikiembed_core::{Embedder, Result};

pub const FAKE_EMBEDDING_DIM: usize = 1024;

/// Build the embedder described by `settings`.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) swaps the HTTP client for
/// `FakeEmbedder` so the whole pipeline can run without a server.
pub fn get_default_embedder(settings: &EmbedSettings) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake {
        info!(dim = FAKE_EMBEDDING_DIM, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(FAKE_EMBEDDING_DIM)));
    }
    let retry = RetryPolicy::from_settings(&settings.retry);
    Ok(Box::new(HttpEmbedder::new(&settings.endpoint, settings.timeout(), retry)?))
}
