//! # Formulate Core Library
//!
//! This crate contains the formula-defining logic of a package manager: a declarative
//! [`FormulaDescriptor`] plus its two single-shot actions, [`install`] and [`test_formula`].
//!
//! Installing a formula copies one script from an already-fetched staging directory into a
//! private library directory and generates a thin `bash` wrapper in the shared `bin` directory.
//! The wrapper execs the script through an interpreter taken from a resolved dependency
//! (`python@3.11` by default) and forwards all arguments unchanged.
//!
//! Fetching, dependency graph resolution and caching belong to the host package manager.
//! The formula only asks a [`DependencyResolver`] for prefixes it was handed.
//!
//! ## Modules Overview
//! - [`formula`] – Formula descriptors and their TOML representation
//! - [`installer`] – The install and uninstall steps
//! - [`wrapper`] – Rendering and writing the wrapper script
//! - [`resolver`] – Resolving dependency prefixes
//! - [`smoke`] – Post-install smoke test
//! - [`layout`] – Directory layout of an installation prefix
//! - [`builtin`] – Formulas shipped with the crate
//! - [`config`] – User configuration and global directories
//! - [`error`] – The [`FormulaError`] type


pub mod error;
pub mod formula;
pub mod resolver;
pub mod wrapper;
pub mod installer;
pub mod smoke;
pub mod layout;
pub mod builtin;
pub mod config;

pub use error::*;
pub use formula::*;
pub use resolver::*;
pub use wrapper::*;
pub use installer::*;
pub use smoke::*;
pub use layout::*;
pub use builtin::*;
pub use config::Config;
