//! Shared entry point for the wikiembed binaries.
use tracing::error;
use wikiembed_core::logging::init_tracing;

/// Install logging, run `f`, and on error log the cause chain and exit 1.
pub fn run_main(f: impl FnOnce() -> anyhow::Result<()>) {
    init_tracing();

    if let Err(err) = f() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}
