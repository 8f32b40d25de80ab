//! A parser and applier for a self-describing, `*** Begin Patch` /
//! `*** End Patch` dialect of unified diff.
//!
//! The pipeline is strictly linear: raw text flows through the [`parser`]
//! (which reads originals via an injected [`backend::FileBackend`]) into a
//! [`model::Patch`], through the [`planner`] into a [`model::Commit`], and
//! finally through the [`driver`], which writes mutations back via the same
//! backend. No stage calls back upstream.
//!
//! ```
//! use unipatch::backend::InMemoryBackend;
//! use unipatch::driver::apply_patch;
//! use std::path::PathBuf;
//!
//! let backend = InMemoryBackend::with_files([
//!     (PathBuf::from("greeting.py"), "print('hi')".to_string()),
//! ]);
//! let patch = "*** Begin Patch\n\
//!              *** Update File: greeting.py\n\
//!              -print('hi')\n\
//!              +print('hello')\n\
//!              *** End Patch";
//! let receipt = apply_patch(patch, &backend).unwrap();
//! assert!(receipt.contains("greeting.py"));
//! assert_eq!(backend.read(std::path::Path::new("greeting.py")).unwrap(), "print('hello')");
//! ```

pub mod backend;
pub mod canon;
pub mod driver;
pub mod error;
pub mod locator;
pub mod model;
pub mod planner;
pub mod rewriter;
pub mod scanner;

mod parser;

pub use backend::{BackendError, FileBackend, FsBackend, InMemoryBackend};
pub use driver::{apply_patch, parse_only, plan_patch};
pub use error::DiffError;
pub use model::{Chunk, Commit, FileChange, FileSnapshot, Patch, PatchAction};
