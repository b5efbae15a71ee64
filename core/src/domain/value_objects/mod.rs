//! Value objects representing immutable domain concepts.

pub mod login;
pub mod subject;

// Re-export commonly used types
pub use login::LoginIdentifier;
pub use subject::SubjectId;
