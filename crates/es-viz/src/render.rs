//! Image rendering through the Graphviz command line tools.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{VizError, VizResult};
use crate::options::Layout;

/// Lay out `dot` with the program for `layout` and write a `format` image
/// (`svg`, `png`, `pdf`, ...) to `output`.
///
/// The Graphviz executables must be on `PATH`.
pub fn render(dot: &str, layout: Layout, format: &str, output: &Path) -> VizResult<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let program = layout.program();
    tracing::debug!(program, format, output = %output.display(), "rendering graph");

    let mut child = Command::new(program)
        .arg(format!("-T{}", format))
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| VizError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot.as_bytes())?;
    }

    let result = child.wait_with_output()?;
    if !result.status.success() {
        return Err(VizError::Graphviz {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }
    Ok(())
}
