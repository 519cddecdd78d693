//! The DRY template engine: layered template resolution for Asterisk builds.
//!
//! Given a (version, distribution) pair and a template store, the engine
//! resolves which layers apply, deep-merges them in fixed precedence order,
//! and applies version-triggered override rules. The whole pipeline is a
//! deterministic, synchronous function of its inputs: no caching, no shared
//! mutable state, a fresh document on every request.

pub mod error;
pub mod merge;
pub mod overrides;
pub mod store;
pub mod variant;
pub mod version;

pub use error::TemplateError;
pub use merge::{deep_merge, merge_layers};
pub use overrides::apply_overrides;
pub use store::{FsTemplateStore, LayerKind, MemoryTemplateStore, TemplateStore};
pub use variant::{resolve_distribution, resolve_variant, variant_for, Variant};
pub use version::{ReleaseKind, VersionId, GIT_EFFECTIVE_MAJOR};
