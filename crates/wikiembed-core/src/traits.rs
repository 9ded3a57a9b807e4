use crate::error::EmbedFailure;
use crate::types::Embedding;

/// Turns one text into one vector. Implementations make exactly the attempts
/// their retry policy allows and report every failure as an `EmbedFailure`
/// instead of panicking or returning a fatal error.
pub trait Embedder: Send + Sync {
    /// Stable identifier for logs (e.g. `http:<endpoint>`).
    fn embedder_id(&self) -> &str;
    fn embed(&self, text: &str) -> Result<Embedding, EmbedFailure>;
}
