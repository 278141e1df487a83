//! Core contracts for sqlbridge.
//!
//! This crate defines the dialect list, the native and SQL type descriptors,
//! canonical type names, and the provider-override mini-language shared by the
//! type maps and the CLI.

pub mod canonical;
pub mod descriptor;
pub mod dialect;
pub mod error;
pub mod overrides;
pub mod tokenize;
pub mod types;

pub use canonical::{parse_canonical_name, render_canonical_name};
pub use descriptor::{Length, NativeTypeDescriptor, SqlTypeDescriptor, base_type_name};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use overrides::{ProviderOverrides, parse_overrides};
pub use tokenize::split_respecting_nesting;
pub use types::{
    DomainType, EnumType, GenericType, GeometryKind, MAX_ARRAY_RANK, NativeType, PrimitiveKind,
};
