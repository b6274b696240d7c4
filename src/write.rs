//! Whole-file writes. These run before any mutation so a `SETVALUE` can target
//! a file that a `WRITEFILE` in the same environment creates.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, info_span, warn};

use crate::error::UdlError;
use crate::ops::RunSummary;
use crate::persist::FileStore;
use crate::types::{WriteContent, WriteDirective};

/// Write every directive in order.
///
/// Content that is not valid base64 is logged and skipped; any I/O failure
/// stops the batch.
pub fn apply_writes(
    writes: &[WriteDirective],
    store: &dyn FileStore,
    summary: &mut RunSummary,
) -> Result<(), UdlError> {
    for directive in writes {
        let _span = info_span!("directive", env_var = %directive.env_var).entered();

        let bytes = match &directive.content {
            WriteContent::Literal(text) => text.as_bytes().to_vec(),
            WriteContent::Base64(encoded) => match STANDARD.decode(encoded.trim()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    let err = UdlError::Decode {
                        path: directive.path.clone(),
                        source: e,
                    };
                    warn!(error = %err, "Ignoring directive");
                    summary.decode_failures += 1;
                    continue;
                }
            },
        };

        store
            .write(&directive.path, &bytes)
            .map_err(|e| e.in_directive(&directive.env_var))?;
        info!(path = %directive.path.display(), bytes = bytes.len(), "Wrote file");
        summary.files_written += 1;
    }
    Ok(())
}
