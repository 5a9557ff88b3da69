pub mod clean;
pub mod export;

use std::io::Write;

use anyhow::Result;
use tracing::warn;

use crate::error::SourceError;

/// A missing or unrecognised root resource ends the run quietly.
fn report_unavailable(out: &mut impl Write, what: &str, err: &SourceError) -> Result<()> {
    warn!(reason = err.kind(), error = %err, "{what} unavailable");
    match err {
        SourceError::ResourceMissing { path } => {
            writeln!(out, "{what} not found at {}", path.display())?
        }
        other => writeln!(out, "{what} could not be read: {other}")?,
    }
    Ok(())
}
