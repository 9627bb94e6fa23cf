//! Text output ahead of the diagnostics

use std::io::Write;

use miette::{IntoDiagnostic, Result};

use hintrun_core::Resolution;

/// Marks the start of lint output.
pub const OUTPUT_MARKER: &str = "*** JSHint output ***";

/// Writes configuration notices, the resolved globals and options, and the
/// output marker.
pub fn write_preamble<W: Write>(out: &mut W, resolution: &Resolution) -> Result<()> {
    for notice in resolution.notices() {
        writeln!(out, "{}", notice).into_diagnostic()?;
    }

    let config = &resolution.configuration;
    writeln!(
        out,
        "Using JSHint globals: {}",
        serde_json::to_string(&config.globals).into_diagnostic()?
    )
    .into_diagnostic()?;
    writeln!(
        out,
        "Using JSHint options: {}",
        serde_json::to_string_pretty(&config.options).into_diagnostic()?
    )
    .into_diagnostic()?;
    writeln!(out, "{}", OUTPUT_MARKER).into_diagnostic()?;

    Ok(())
}
