pub mod escape;
pub mod parser;
pub mod pattern;
pub mod types;

// Re-export main types
pub use escape::{escape, unescape};
pub use parser::ClassParser;
pub use pattern::{ClassPattern, PatternError};
pub use types::ParsedClass;
