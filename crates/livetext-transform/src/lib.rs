//! # livetext-transform
//!
//! Capability-based transformation of host subjects.
//!
//! - **Pipeline**: [`pipeline::TransformPipeline`] folds each new subject
//!   through the registered [`transformer::Transformer`]s whose
//!   [`capability::Capability`] accepts it, in registration order
//! - **Weak tracking**: [`weak_map::WeakSubjectMap`] records translation
//!   metadata per subject without keeping subjects alive
//! - **Built-ins**: [`text::TextTransformer`] and [`toolbar::ToolbarTransformer`]
//!   resolve `@string/` and `@plurals/` references through a
//!   [`strings::StringRepository`]
//!
//! ## Crate Position
//!
//! Depends on livetext-core. Depended on by livetext-realtime.

#![deny(unsafe_code)]

pub mod attributes;
pub mod capability;
pub mod errors;
pub mod listener;
pub mod pipeline;
pub mod registry;
pub mod strings;
pub mod text;
pub mod toolbar;
mod tracked;
pub mod transformer;
pub mod weak_map;

pub use attributes::{
    ATTR_FORMAT_ARGS, ATTR_HINT, ATTR_QUANTITY, ATTR_SUBTITLE, ATTR_TEXT, ATTR_TITLE, Attributes,
    ResourceRef,
};
pub use capability::Capability;
pub use errors::TransformError;
pub use listener::ChangeListener;
pub use pipeline::TransformPipeline;
pub use registry::TransformerRegistry;
pub use strings::{StringRepository, StringTable};
pub use text::TextTransformer;
pub use toolbar::ToolbarTransformer;
pub use transformer::Transformer;
pub use weak_map::WeakSubjectMap;
