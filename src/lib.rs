//! A container entrypoint that configures an image from its environment, then
//! runs the image's real program.
//!
//! Most images ship with configuration files baked in, and most platforms only
//! let you change a container through environment variables. `udl` bridges the
//! two: it reads `UDL_*` variables, writes or patches the files they name, and
//! then starts the wrapped program with the environment untouched.
//!
//! ```text
//! ENTRYPOINT ["udl", "nginx", "-g", "daemon off;"]
//! ```
//!
//! ```text
//! UDL_WRITEFILE[/etc/app/config.json]={"port":80,"debug":false}
//! UDL_SETVALUE[/etc/app/config.json][port]=8080
//! UDL_SETVALUE[/etc/app/config.json][debug]=true
//! ```
//!
//! After those three variables, `/etc/app/config.json` is
//! `{"port":8080,"debug":true}`: the number stays a number and the boolean
//! stays a boolean, because each replacement takes the type of the value it
//! replaces.
//!
//! # Directives
//!
//! | variable                                  | effect                                   |
//! |-------------------------------------------|------------------------------------------|
//! | `UDL_WRITEFILE[<path>]=<content>`         | replace the file with `content`          |
//! | `UDL_WRITEB64FILE[<path>]=<base64>`       | replace the file with decoded bytes      |
//! | `UDL_SETVALUE[<path>][<accessor>]=<value>`| set one value inside a structured file   |
//! | `UDL_SKIPEMPTY_SETVALUE[...]=<value>`     | same, but a blank value is ignored       |
//!
//! Platforms that forbid brackets in variable names (Kubernetes among them)
//! can use the value-encoded form instead: any suffix after an underscore
//! names the variable and the brackets move into the value.
//!
//! ```text
//! UDL_SETVALUE_PORT=[/etc/app/config.json][port]8080
//! UDL_WRITEFILE_CERT=[/etc/ssl/app.pem]-----BEGIN CERTIFICATE-----...
//! ```
//!
//! Names may carry a platform prefix. By default both unprefixed names and
//! Azure App Service's `APPSETTING_` prefix are recognized; see
//! [`LauncherBuilder::prefixes`].
//!
//! # Accessors
//!
//! An accessor is a `:`-separated path of mapping keys, optionally ending in a
//! sequence index: `database:hosts:0`. Every key before the last must already
//! exist; the last key may be new. An index must address an existing element,
//! so sequences are never extended. See [`path::AccessorPath`].
//!
//! # Formats
//!
//! JSON, YAML, TOML and INI files are supported. The format of a file is found
//! by trying each adapter in turn (INI, JSON, YAML, TOML) and keeping the first
//! that accepts the file name and parses the content; INI and TOML also
//! require their usual extension. A file no adapter can read is skipped with a
//! warning. See [`formats`].
//!
//! # Ordering
//!
//! 1. All write directives run first, so a file can be created and patched by
//!    the same environment.
//! 2. Set directives run grouped by accessor depth, shallowest first. Replacing
//!    a whole sequence therefore happens before setting its elements.
//! 3. Each set directive is a separate read-modify-write of its file.
//!
//! Any failure in steps 1 and 2 (other than undecodable base64) stops the
//! launcher before the program starts, with a message naming the variable.
//!
//! # Library use
//!
//! The binary is a thin layer over [`Launcher`], which takes the environment
//! as an iterator so it can be driven from tests or other tools:
//!
//! ```ignore
//! let summary = udl::Launcher::builder()
//!     .prefixes(vec!["".into(), "MYPLATFORM_".into()])
//!     .build()
//!     .apply(std::env::vars())?;
//! println!("{summary}");
//! ```
//!
//! The clap-based command line lives in the `cli` module, behind the `clap`
//! Cargo feature (on by default).

pub mod document;
pub mod error;
pub mod exec;
pub mod formats;
pub mod logging;
pub mod mutate;
pub mod path;
pub mod persist;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod ops;
mod schedule;
mod settings;
mod write;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_PREFIXES, Launcher, LauncherBuilder};
#[cfg(feature = "clap")]
pub use cli::Cli;
pub use document::Document;
pub use env::scan;
pub use error::{DocumentError, UdlError};
pub use ops::RunSummary;
pub use settings::Settings;
pub use types::{Directives, Invocation, MutationDirective, WriteContent, WriteDirective};
