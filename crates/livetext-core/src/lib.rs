//! # livetext-core
//!
//! Shared vocabulary for the livetext crates.
//!
//! - **Subjects**: [`subject::SubjectStore`] is the host-owned arena of live
//!   display subjects; [`ids::SubjectId`] is a generational, non-owning handle
//!   into it
//! - **Metadata**: [`metadata::TranslationMetadata`] with [`metadata::PluralForm`]
//!   and the `none` sentinel
//! - **Text**: [`text::format_with_args`] for positional format arguments
//! - **Errors**: [`errors::CoreError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] and in-memory capture for tests
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other livetext crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;
pub mod metadata;
pub mod subject;
pub mod text;

pub use errors::{CoreError, Result};
pub use ids::SubjectId;
pub use metadata::{
    PLURAL_NONE, PluralCategory, PluralForm, TextTarget, TranslationMetadata, VisibleMetadata,
};
pub use subject::{Subject, SubjectKind, SubjectStore};
