pub mod case;
pub mod config;
pub mod merge;
pub mod normalize;
pub mod types;

// Re-export commonly used types
pub use config::{
    ConditionalDescriptor, Config, ConfigError, PropertyDescriptor, PropertyFn, PropertyParams,
    PropertyTarget, Syntax, ValueEntry, ValueTemplate,
};
pub use types::{Breakpoint, Declaration};
