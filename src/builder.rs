use tracing::{debug, info};

use crate::env;
use crate::error::UdlError;
use crate::formats::{self, Format};
use crate::ops::RunSummary;
use crate::persist::{DiskStore, FileStore};
use crate::schedule;
use crate::write;

/// Prefixes stripped from variable names when none are configured: none at
/// all, and the one Azure App Service prepends to application settings.
pub const DEFAULT_PREFIXES: [&str; 2] = ["", "APPSETTING_"];

/// Applies the directives found in an environment.
pub struct Launcher {
    prefixes: Vec<String>,
    formats: Vec<Box<dyn Format>>,
    store: Box<dyn FileStore>,
}

impl Launcher {
    pub fn builder() -> LauncherBuilder {
        LauncherBuilder::new()
    }

    /// Scan `vars` for directives, write files, then set values.
    ///
    /// Writes all happen before any mutation, and mutations run shallow to
    /// deep. The first fatal error stops the run; what was already written
    /// stays written.
    pub fn apply(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<RunSummary, UdlError> {
        let directives = env::scan(&self.prefixes, vars)?;
        debug!(
            writes = directives.writes.len(),
            mutations = directives.mutations.len(),
            "Found directives"
        );

        let mut summary = RunSummary::default();
        write::apply_writes(&directives.writes, self.store.as_ref(), &mut summary)?;
        schedule::apply_mutations(
            &directives.mutations,
            &self.formats,
            self.store.as_ref(),
            &mut summary,
        )?;

        info!(%summary, "Directives applied");
        Ok(summary)
    }
}

/// Builder for a [`Launcher`].
///
/// Every setting has a default, so `Launcher::builder().build()` reads and
/// writes the real file system, strips [`DEFAULT_PREFIXES`], and tries the
/// formats in [`formats::default_formats`] order.
pub struct LauncherBuilder {
    prefixes: Option<Vec<String>>,
    formats: Option<Vec<Box<dyn Format>>>,
    store: Option<Box<dyn FileStore>>,
}

impl LauncherBuilder {
    fn new() -> Self {
        Self {
            prefixes: None,
            formats: None,
            store: None,
        }
    }

    /// Replace the variable-name prefixes entirely.
    ///
    /// Prefixes are tried in order and the first one that leaves a `UDL_`
    /// name wins. Include `""` to also accept unprefixed names.
    pub fn prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    /// Append a prefix without replacing the defaults.
    /// If no prefixes have been set yet, starts from [`DEFAULT_PREFIXES`].
    pub fn add_prefix(mut self, prefix: &str) -> Self {
        self.prefixes
            .get_or_insert_with(default_prefixes)
            .push(prefix.to_string());
        self
    }

    /// Replace the formats tried for each `SETVALUE` file, in precedence order.
    pub fn formats(mut self, formats: Vec<Box<dyn Format>>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// Read and write files through `store` instead of the file system.
    pub fn store(mut self, store: impl FileStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    fn effective_prefixes(&self) -> Vec<String> {
        match &self.prefixes {
            Some(prefixes) => prefixes.clone(),
            None => default_prefixes(),
        }
    }

    pub fn build(self) -> Launcher {
        let prefixes = self.effective_prefixes();
        Launcher {
            prefixes,
            formats: self.formats.unwrap_or_else(formats::default_formats),
            store: self.store.unwrap_or_else(|| Box::new(DiskStore)),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::fixtures::test::MemoryStore;
    use crate::formats::{IniFormat, JsonFormat, TomlFormat, YamlFormat};
    use std::fs;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn launcher(store: &MemoryStore) -> Launcher {
        Launcher::builder().store(store.clone()).build()
    }

    #[test]
    fn default_prefixes_are_used() {
        let builder = Launcher::builder();
        assert_eq!(
            builder.effective_prefixes(),
            vec![String::new(), "APPSETTING_".to_string()]
        );
    }

    #[test]
    fn prefixes_replace() {
        let builder = Launcher::builder().prefixes(vec!["K8S_".into()]);
        assert_eq!(builder.effective_prefixes(), vec!["K8S_".to_string()]);
    }

    #[test]
    fn add_prefix_appends_to_defaults() {
        let builder = Launcher::builder().add_prefix("K8S_");
        assert_eq!(
            builder.effective_prefixes(),
            vec![String::new(), "APPSETTING_".to_string(), "K8S_".to_string()]
        );
    }

    #[test]
    fn add_prefix_appends_to_existing_list() {
        let builder = Launcher::builder()
            .prefixes(vec!["A_".into()])
            .add_prefix("B_");
        assert_eq!(
            builder.effective_prefixes(),
            vec!["A_".to_string(), "B_".to_string()]
        );
    }

    #[test]
    fn empty_environment_does_nothing() {
        let store = MemoryStore::default();
        let summary = launcher(&store).apply(vars(&[("PATH", "/bin")])).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn write_then_set_in_one_run() {
        let store = MemoryStore::default();
        let summary = launcher(&store)
            .apply(vars(&[
                ("UDL_SETVALUE[/tmp/myapp/config.json][whatever]", "5"),
                ("UDL_WRITEFILE[/tmp/myapp/config.json]", r#"{"whatever":"value"}"#),
            ]))
            .unwrap();

        assert_eq!(
            store.contents("/tmp/myapp/config.json").as_deref(),
            Some(r#"{"whatever":"5"}"#)
        );
        assert_eq!(summary.files_written, 1);
        assert_eq!(summary.mutations_applied, 1);
    }

    #[test]
    fn value_encoded_directives() {
        let store = MemoryStore::default();
        launcher(&store)
            .apply(vars(&[
                ("UDL_WRITEFILE_CONFIG", "[/app/config.yaml]server:\n  port: 80\n"),
                ("UDL_SETVALUE_PORT", "[/app/config.yaml][server:port]8080"),
            ]))
            .unwrap();

        let doc = YamlFormat
            .parse(&store.contents("/app/config.yaml").unwrap())
            .unwrap();
        assert_eq!(
            doc.get("server").and_then(|s| s.get("port")),
            Some(&Document::Integer(8080))
        );
    }

    #[test]
    fn base64_write() {
        let store = MemoryStore::default();
        launcher(&store)
            .apply(vars(&[("UDL_WRITEB64FILE[/app/config.json]", "eyJhIjoxfQ==")]))
            .unwrap();
        assert_eq!(store.contents("/app/config.json").as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn invalid_base64_is_not_fatal() {
        let store = MemoryStore::default().with_file("/app/config.json", r#"{"a":1}"#);
        let summary = launcher(&store)
            .apply(vars(&[
                ("UDL_WRITEB64FILE[/app/blob]", "%%%"),
                ("UDL_SETVALUE[/app/config.json][a]", "2"),
            ]))
            .unwrap();

        assert_eq!(summary.decode_failures, 1);
        assert_eq!(store.contents("/app/config.json").as_deref(), Some(r#"{"a":2}"#));
    }

    #[test]
    fn skipempty_leaves_key_unset() {
        let store = MemoryStore::default().with_file("/tmp/myapp/config.json", r#"{"whatever":"value"}"#);
        launcher(&store)
            .apply(vars(&[
                ("UDL_SKIPEMPTY_SETVALUE[/tmp/myapp/config.json][blah]", ""),
                ("UDL_SKIPEMPTY_SETVALUE_TWO", "[/tmp/myapp/config.json][other]   "),
            ]))
            .unwrap();

        let doc = JsonFormat
            .parse(&store.contents("/tmp/myapp/config.json").unwrap())
            .unwrap();
        assert!(doc.get("blah").is_none());
        assert!(doc.get("other").is_none());
    }

    #[test]
    fn platform_prefix() {
        let store = MemoryStore::default().with_file("/app/config.json", r#"{"a":"x"}"#);
        launcher(&store)
            .apply(vars(&[("APPSETTING_UDL_SETVALUE_A", "[/app/config.json][a]y")]))
            .unwrap();
        assert_eq!(store.contents("/app/config.json").as_deref(), Some(r#"{"a":"y"}"#));
    }

    #[test]
    fn out_of_bounds_is_fatal_and_leaves_file_untouched() {
        let original = r#"{"whatever":["hi"]}"#;
        let store = MemoryStore::default().with_file("/app/config.json", original);
        let err = launcher(&store)
            .apply(vars(&[("UDL_SETVALUE[/app/config.json][whatever:1]", "there")]))
            .unwrap_err();

        assert!(matches!(err, UdlError::Directive { .. }));
        assert_eq!(store.contents("/app/config.json").as_deref(), Some(original));
    }

    #[test]
    fn malformed_write_is_fatal() {
        let store = MemoryStore::default();
        let err = launcher(&store)
            .apply(vars(&[("UDL_WRITEFILE_X", "/app/config.json")]))
            .unwrap_err();
        assert!(matches!(err, UdlError::MalformedDirective { .. }));
    }

    #[test]
    fn custom_format_list() {
        let store = MemoryStore::default().with_file("/app/config.json", r#"{"a":"x"}"#);
        let summary = Launcher::builder()
            .store(store.clone())
            .formats(vec![Box::new(TomlFormat)])
            .build()
            .apply(vars(&[("UDL_SETVALUE[/app/config.json][a]", "y")]))
            .unwrap();

        assert_eq!(summary.mutations_skipped, 1);
        assert_eq!(store.contents("/app/config.json").as_deref(), Some(r#"{"a":"x"}"#));
    }

    #[test]
    fn every_format_on_disk() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("config.json");
        let yaml = dir.path().join("config.yaml");
        let toml = dir.path().join("config.toml");
        let ini = dir.path().join("config.ini");
        fs::write(&json, r#"{"port":80}"#).unwrap();
        fs::write(&yaml, "port: 80\n").unwrap();
        fs::write(&toml, "port = 80\n").unwrap();
        fs::write(&ini, "[server]\nport = 80\n").unwrap();

        let set = |path: &std::path::Path, accessor: &str| {
            (
                format!("UDL_SETVALUE[{}][{accessor}]", path.display()),
                "8080".to_string(),
            )
        };
        let summary = Launcher::builder()
            .build()
            .apply(vec![
                set(&json, "port"),
                set(&yaml, "port"),
                set(&toml, "port"),
                set(&ini, "server:port"),
            ])
            .unwrap();
        assert_eq!(summary.mutations_applied, 4);

        let read = |path: &std::path::Path| fs::read_to_string(path).unwrap();
        assert_eq!(read(&json), r#"{"port":8080}"#);
        assert_eq!(
            YamlFormat.parse(&read(&yaml)).unwrap().get("port"),
            Some(&Document::Integer(8080))
        );
        assert_eq!(
            TomlFormat.parse(&read(&toml)).unwrap().get("port"),
            Some(&Document::Integer(8080))
        );
        assert_eq!(
            IniFormat
                .parse(&read(&ini))
                .unwrap()
                .get("server")
                .and_then(|s| s.get("port"))
                .and_then(Document::as_str),
            Some("8080")
        );
    }
}
