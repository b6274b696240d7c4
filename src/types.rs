use std::path::PathBuf;

use crate::path::depth_of;

/// What a write directive puts in its file.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteContent {
    /// Written byte-for-byte.
    Literal(String),
    /// Standard base64, decoded before writing.
    Base64(String),
}

/// Replace a file's contents (`UDL_WRITEFILE`, `UDL_WRITEB64FILE`).
#[derive(Debug, Clone, PartialEq)]
pub struct WriteDirective {
    /// The environment variable this came from, for logs and errors.
    pub env_var: String,
    pub path: PathBuf,
    pub content: WriteContent,
}

/// Set one value inside a structured file (`UDL_SETVALUE`, `UDL_SKIPEMPTY_SETVALUE`).
#[derive(Debug, Clone, PartialEq)]
pub struct MutationDirective {
    /// The environment variable this came from, for logs and errors.
    pub env_var: String,
    pub file: PathBuf,
    pub accessor: String,
    pub value: String,
}

impl MutationDirective {
    /// Number of `:`-separated segments in the accessor. Shallower mutations
    /// run first.
    pub fn depth(&self) -> usize {
        depth_of(&self.accessor)
    }
}

/// All directives found in one environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    pub writes: Vec<WriteDirective>,
    pub mutations: Vec<MutationDirective>,
}

impl Directives {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.mutations.is_empty()
    }
}

/// The program the launcher hands over to, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}
