pub mod builders;

// Re-export commonly used items
pub use builders::{sample_result, MockLlm};
