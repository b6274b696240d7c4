//! The result of one launcher run, returned to the caller for display.

use std::fmt;

/// Counts of what a run did. Fatal errors abort the run instead, so a summary
/// only ever describes a run that completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files created or replaced by write directives.
    pub files_written: usize,
    /// Base64 write directives ignored because their content did not decode.
    pub decode_failures: usize,
    /// Values set inside structured files.
    pub mutations_applied: usize,
    /// Set directives whose file no format could edit.
    pub mutations_skipped: usize,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        *self == RunSummary::default()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No directives applied");
        }
        write!(
            f,
            "Wrote {} file(s), set {} value(s)",
            self.files_written, self.mutations_applied
        )?;
        if self.mutations_skipped > 0 {
            write!(f, ", skipped {} value(s) in unsupported files", self.mutations_skipped)?;
        }
        if self.decode_failures > 0 {
            write!(f, ", ignored {} invalid base64 file(s)", self.decode_failures)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty() {
        assert_eq!(RunSummary::default().to_string(), "No directives applied");
    }

    #[test]
    fn display_counts() {
        let summary = RunSummary {
            files_written: 1,
            decode_failures: 0,
            mutations_applied: 3,
            mutations_skipped: 0,
        };
        assert_eq!(summary.to_string(), "Wrote 1 file(s), set 3 value(s)");
    }

    #[test]
    fn display_mentions_skips_and_failures() {
        let summary = RunSummary {
            files_written: 0,
            decode_failures: 2,
            mutations_applied: 1,
            mutations_skipped: 1,
        };
        assert_eq!(
            summary.to_string(),
            "Wrote 0 file(s), set 1 value(s), skipped 1 value(s) in unsupported files, ignored 2 invalid base64 file(s)"
        );
    }
}
