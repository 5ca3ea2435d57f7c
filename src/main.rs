// Entrypoint for the CLI application.
// - Keeps `main` small: open the catalog store and hand it to the UI loop.
// - Returns `anyhow::Result` to simplify error handling at the boundary.

use anyhow::Context;
use librarian_cli::{store::Library, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Log level comes from RUST_LOG, defaulting to `info`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    // Backing file path from the environment variable `LIBRARY_DATA_FILE`
    // or default to library_data.txt in the working directory.
    let path =
        std::env::var("LIBRARY_DATA_FILE").unwrap_or_else(|_| "library_data.txt".to_string());
    let mut library =
        Library::open(&path).with_context(|| format!("loading catalog from {path}"))?;

    // Run the interactive menu. This call blocks until the user exits.
    let session = main_menu(&mut library);

    // Final flush runs on every exit path, including a UI error, so the
    // in-memory catalog is never lost to an early return.
    if let Err(e) = library.save() {
        eprintln!("Warning: could not save data: {e}");
    }
    session
}
