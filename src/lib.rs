// k8s-schema-fixup/src/lib.rs
//! Post-processing for JSON Schema documents that describe Kubernetes resources.

pub mod config;
pub mod document;
pub mod error;
pub mod kind_enum;
pub mod one_of;
pub mod refs;

pub use error::{Result, SchemaError};
pub use kind_enum::{backfill, short_name, BackfillReport, Strictness};
pub use one_of::{aggregate, RefBase};
pub use refs::{dangling_refs, DanglingRef};
