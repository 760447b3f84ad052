//! docimport-docserver: the docserver side of an import
//!
//! Holds the canonical document model importers produce and the
//! collections they check for existing documents and write into.

pub mod collection;
pub mod model;
pub mod store;

pub use collection::{Collection, DocumentSink, IdentifierLookup};
pub use model::*;
pub use store::{StoreLayout, TargetStore};
