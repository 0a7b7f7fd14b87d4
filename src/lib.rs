//! Semtypes – the datatype registry of a semantic knowledge store.
//!
//! Every property value in a semantic wiki has a *type*, and every type
//! reduces to one of a small, closed set of primitive *data item kinds*
//! used for storage and comparison. This crate keeps track of how the
//! different coordinates of a type relate:
//! * the localized label an editor types (`"Number"`, `"Zahl"`) and its aliases,
//! * the stable internal identifier (`_num`),
//! * the value handler that parses, validates, formats and compares values,
//! * the [`dataitem::DataItemKind`] the type is stored as.
//!
//! ## Modules
//! * [`registry`] – The [`registry::TypeRegistry`] and the built-in types.
//! * [`system`] – [`system::TypeSystem`], which owns the shared registry,
//!   builds it lazily, runs extension initializers and can be cleared.
//! * [`dataitem`] – Data item kinds and the primitive values themselves.
//! * [`datavalue`] – The [`datavalue::DataValue`] trait and built-in handlers.
//! * [`factory`] – Creating and formatting values through the registry.
//! * [`language`] – Localized label and alias tables.
//! * [`settings`] – Settings read from `semtypes.toml` and the environment.
//! * [`query`] – The contract between API requests and an external query engine.
//!
//! ## Identifiers
//! Identifiers starting with `_` are internal and may carry a label, while
//! identifiers starting with `__` are hidden system types that never do.
//!
//! ## Quick Start
//! ```
//! use semtypes::dataitem::DataItemKind;
//! use semtypes::language::LanguageTables;
//! use semtypes::system::TypeSystem;
//! let system = TypeSystem::new(LanguageTables::english());
//! let registry = system.instance().unwrap();
//! let registry = registry.read().unwrap();
//! assert_eq!(registry.find_type_id("Number", true), "_num");
//! assert_eq!(registry.data_item_id("_num"), DataItemKind::Number);
//! ```

pub mod dataitem;
pub mod datavalue;
pub mod error;
pub mod factory;
pub mod language;
pub mod query;
pub mod registry;
pub mod settings;
pub mod system;
