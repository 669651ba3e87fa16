pub mod alias;
pub mod context;
pub mod dom;
pub mod engine;
pub mod rule;
pub mod value;
pub mod variant;

// Re-export main types
pub use context::ClassContext;
pub use dom::{DomApplier, DomBinding, DomEvent, PseudoState, StyleTarget, Trigger};
pub use engine::{ClassList, Engine, EngineError};
pub use rule::{CssRules, ProcessedStyle, RuleResolver};
pub use value::ValueResolver;
pub use variant::{VariantResolver, Wrapper};
