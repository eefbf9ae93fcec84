#![doc = include_str!("../README.md")]

pub mod augment;
pub mod error;
pub mod expander;
pub mod finalize;
pub mod leafref;
pub mod linker;
pub mod order;
pub mod path;
pub mod resolver;

pub use error::{LinkError, LinkResult, ReferenceKind};
pub use expander::{expand, Expansion};
pub use finalize::finalize_schema;
pub use linker::{link, FilePhase, LinkReport, Linker};
pub use order::emission_order;
pub use resolver::{lookup_definition, DefinitionKind, LinkMode, Resolvable, Site};
