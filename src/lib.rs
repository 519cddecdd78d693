pub mod cli;
pub mod config;
pub mod switchboard;
pub mod template;

// Re-export main types for easier access
pub use switchboard::common::{SwitchboardMessager, SwitchboardMessaging};
pub use switchboard::{ConfigGenerator, Features, MenuselectPlan, SupportedBuilds, SwitchboardApp};
pub use template::{
    FsTemplateStore, LayerKind, MemoryTemplateStore, TemplateError, TemplateStore, Variant,
    VersionId,
};
