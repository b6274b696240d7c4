use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::UdlError;
use crate::types::{Directives, MutationDirective, WriteContent, WriteDirective};

/// `UDL_WRITEFILE[<path>]`, `UDL_WRITEB64FILE[<path>]`
static NAMED_WRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UDL_(WRITEFILE|WRITEB64FILE)\[([^\[\]]+)\]$").expect("literal regex")
});

/// `UDL_SETVALUE[<path>][<accessor>]`, `UDL_SKIPEMPTY_SETVALUE[<path>][<accessor>]`
static NAMED_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UDL_(SKIPEMPTY_)?SETVALUE\[([^\[\]]+)\]\[([^\[\]]+)\]$").expect("literal regex")
});

/// `UDL_<FAMILY>_<id>`, whose value carries the brackets instead.
static KEYED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UDL_(WRITEFILE|WRITEB64FILE|SETVALUE|SKIPEMPTY_SETVALUE)_(.+)$")
        .expect("literal regex")
});

/// `[<path>]<content>`; content may span lines.
static VALUE_WRITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\[([^\[\]]+)\](.*)$").expect("literal regex"));

/// `[<path>][<accessor>]<value>`; the value may span lines.
static VALUE_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\[([^\[\]]+)\]\[([^\[\]]+)\](.*)$").expect("literal regex")
});

/// The name each value-encoded directive must carry after its prefix.
const DIRECTIVE_NAMESPACE: &str = "UDL_";

/// Collect directives from environment variables.
///
/// A variable is considered when its name, after removing the first prefix in
/// `prefixes` that leaves a `UDL_` name, names a directive family. Both the
/// bracket-in-name form (`UDL_SETVALUE[file][accessor]=value`) and the
/// bracket-in-value form (`UDL_SETVALUE_ID=[file][accessor]value`) are
/// recognized.
///
/// A value-encoded write whose value is not `[path]content` is an error, since
/// silently skipping it would leave the container without a file it needs.
/// Malformed set directives are skipped. Skip-empty set directives with a blank
/// value are dropped here and never reach the scheduler.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn scan(
    prefixes: &[String],
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Directives, UdlError> {
    let mut directives = Directives::default();

    for (key, value) in vars {
        let Some(name) = strip_prefix(prefixes, &key) else {
            continue;
        };

        if let Some(caps) = NAMED_WRITE.captures(name) {
            directives
                .writes
                .push(write_directive(&key, &caps[1], &caps[2], value));
        } else if let Some(caps) = NAMED_SET.captures(name) {
            let skip_empty = caps.get(1).is_some();
            push_mutation(&mut directives, &key, skip_empty, &caps[2], &caps[3], &value);
        } else if let Some(caps) = KEYED.captures(name) {
            match &caps[1] {
                family @ ("WRITEFILE" | "WRITEB64FILE") => {
                    let parts =
                        VALUE_WRITE
                            .captures(&value)
                            .ok_or_else(|| UdlError::MalformedDirective {
                                env_var: key.clone(),
                                reason: "value must look like [<path>]<content>".into(),
                            })?;
                    directives.writes.push(write_directive(
                        &key,
                        family,
                        &parts[1],
                        parts[2].to_string(),
                    ));
                }
                family => match VALUE_SET.captures(&value) {
                    Some(parts) => push_mutation(
                        &mut directives,
                        &key,
                        family == "SKIPEMPTY_SETVALUE",
                        &parts[1],
                        &parts[2],
                        &parts[3],
                    ),
                    None => {
                        debug!(env_var = %key, "Skipping value that does not look like [<path>][<accessor>]<value>");
                    }
                },
            }
        } else {
            trace!(env_var = %key, "Not a directive");
        }
    }

    Ok(directives)
}

/// Remove the first prefix that leaves a `UDL_` name.
fn strip_prefix<'a>(prefixes: &[String], key: &'a str) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| {
        key.strip_prefix(prefix.as_str())
            .filter(|rest| rest.starts_with(DIRECTIVE_NAMESPACE))
    })
}

fn write_directive(env_var: &str, family: &str, path: &str, content: String) -> WriteDirective {
    let content = if family == "WRITEB64FILE" {
        WriteContent::Base64(content)
    } else {
        WriteContent::Literal(content)
    };
    WriteDirective {
        env_var: env_var.to_string(),
        path: PathBuf::from(path),
        content,
    }
}

fn push_mutation(
    directives: &mut Directives,
    env_var: &str,
    skip_empty: bool,
    file: &str,
    accessor: &str,
    value: &str,
) {
    if skip_empty && value.trim().is_empty() {
        debug!(env_var, "Skipping empty value");
        return;
    }
    directives.mutations.push(MutationDirective {
        env_var: env_var.to_string(),
        file: PathBuf::from(file),
        accessor: accessor.to_string(),
        value: value.to_string(),
    });
}
