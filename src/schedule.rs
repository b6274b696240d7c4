//! Ordering and dispatch of `SETVALUE` directives.
//!
//! Directives are grouped by accessor depth and applied shallowest first, so a
//! directive that replaces a whole sequence lands before directives that set
//! its elements. Within one depth they run in the order they were found. Each
//! directive is a separate read-modify-write of its file.

use std::collections::BTreeMap;

use tracing::{debug, info, info_span, warn};

use crate::error::UdlError;
use crate::formats::Format;
use crate::ops::RunSummary;
use crate::persist::{FileStore, can_handle, persist_value};
use crate::types::MutationDirective;

/// Group directives by depth, shallowest first.
pub fn by_depth(mutations: &[MutationDirective]) -> BTreeMap<usize, Vec<&MutationDirective>> {
    let mut buckets: BTreeMap<usize, Vec<&MutationDirective>> = BTreeMap::new();
    for directive in mutations {
        buckets.entry(directive.depth()).or_default().push(directive);
    }
    buckets
}

/// Apply every mutation, shallow to deep.
///
/// Each directive goes to the first format in `formats` that can handle its
/// file. A file no format can edit (missing, unreadable, or unparseable) is
/// logged and skipped. The first failing mutation aborts the batch; earlier
/// mutations stay applied.
pub fn apply_mutations(
    mutations: &[MutationDirective],
    formats: &[Box<dyn Format>],
    store: &dyn FileStore,
    summary: &mut RunSummary,
) -> Result<(), UdlError> {
    for (depth, bucket) in by_depth(mutations) {
        debug!(depth, count = bucket.len(), "Applying mutations");

        for directive in bucket {
            let _span = info_span!("directive", env_var = %directive.env_var).entered();

            let Some(format) = formats
                .iter()
                .map(Box::as_ref)
                .find(|f| can_handle(*f, &directive.file, store))
            else {
                warn!(file = %directive.file.display(), "No supported format can edit this file, skipping");
                summary.mutations_skipped += 1;
                continue;
            };

            persist_value(
                format,
                &directive.file,
                &directive.accessor,
                &directive.value,
                store,
            )
            .map_err(|e| e.in_directive(&directive.env_var))?;

            info!(
                file = %directive.file.display(),
                format = format.name(),
                accessor = %directive.accessor,
                "Set value"
            );
            summary.mutations_applied += 1;
        }
    }
    Ok(())
}
