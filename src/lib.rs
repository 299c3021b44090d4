//! make-ssh-config - layered ssh_config generation
//!
//! Compiles a YAML sequence of *layer* records into a flat OpenSSH client configuration.
//! Records can inherit from earlier records, parameterize values with templates, and
//! optionally emit a `Host` or `Match` block.
//!
//! # Input Format
//!
//! ```yaml
//! - name: defaults            # template-only layer: registered, never written
//!   vars:
//!     user: deploy
//!   config:
//!     User: "{{ user }}"
//!     ServerAliveInterval: 30
//!
//! - name: bastion
//!   merge: defaults
//!   host: bastion.example.com
//!
//! - merge: defaults
//!   host: ["*.internal"]
//!   config:
//!     ProxyJump: bastion.example.com
//!     ServerAliveInterval: ~  # null removes an inherited option
//!
//! - match: { canonical: true, all: true }
//!   config:
//!     IdentitiesOnly: yes
//! ```
//!
//! Each record may carry `name`, `merge` (a name or list of names), `vars`, `config`, and at
//! most one of `host` or `match`. Option keywords merge case-insensitively, keeping the
//! casing first written.
//!
//! # Modules
//!
//! - [`value`] - the decoded value tree
//! - [`layer`] - layers, config merging and `Match` criteria
//! - [`templating`] - the template capability and recursive renderer
//! - [`maker`] - the per-record builder and registry
//! - [`writer`] - ssh_config serialization
//! - [`cli`] - command-line interface
//! - [`core`] - error types
//! - [`utils`] - file output helpers
//!
//! # Library Usage
//!
//! ```rust
//! let yaml = "- host: example.com\n  config: { Port: 2222 }\n";
//! let text = make_ssh_config::compile(yaml).unwrap();
//! assert_eq!(text, "Host example.com\n    Port 2222\n\n");
//! ```

pub mod cli;
pub mod core;
pub mod layer;
pub mod maker;
pub mod templating;
pub mod utils;
pub mod value;
pub mod writer;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use maker::{ConfigMaker, compile};
