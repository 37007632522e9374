//! Execution-log loading.
//!
//! The instrumentation pass (a separate mode of the tooling, outside this
//! crate) injects a per-method tracer into the target and collects one
//! line per distinct executed method: the method's full name, UTF-8,
//! newline-delimited, no header. This module reads that file back as the
//! root set for reachability.

use std::path::Path;

use rustc_hash::FxHashSet;

use crate::{Error, Result};

/// Loads the set of executed-method full names from an execution log.
///
/// Duplicate lines collapse into one entry; line order is insignificant.
/// Empty lines are kept as empty keys — they match no method and fall out
/// of the analysis naturally. Trailing `\r` from Windows-produced logs is
/// stripped.
///
/// # Errors
///
/// Returns [`Error::TraceRead`] if the file cannot be opened or is not
/// valid UTF-8. This is the pipeline's only fatal condition.
pub fn load_roots(path: impl AsRef<Path>) -> Result<FxHashSet<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::TraceRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content.lines().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_deduplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "System.Void Game.Boot::Init()").unwrap();
        writeln!(file, "System.Void Game.Player::Update()").unwrap();
        writeln!(file, "System.Void Game.Boot::Init()").unwrap();
        writeln!(file).unwrap();
        file.flush().unwrap();

        let roots = load_roots(file.path()).unwrap();
        assert_eq!(roots.len(), 3); // two methods plus the empty key
        assert!(roots.contains("System.Void Game.Boot::Init()"));
        assert!(roots.contains("System.Void Game.Player::Update()"));
        assert!(roots.contains(""));
    }

    #[test]
    fn windows_line_endings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "System.Void A::M()\r\nSystem.Void B::N()\r\n").unwrap();
        file.flush().unwrap();

        let roots = load_roots(file.path()).unwrap();
        assert!(roots.contains("System.Void A::M()"));
        assert!(roots.contains("System.Void B::N()"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let error = load_roots("/nonexistent/trace.log").unwrap_err();
        let Error::TraceRead { path, .. } = error;
        assert!(path.contains("trace.log"));
    }
}
