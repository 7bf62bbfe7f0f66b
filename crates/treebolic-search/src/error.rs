use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Producer panicked: {0}")]
    Panicked(String),
    #[error("Failed to start producer thread: {0}")]
    Spawn(String),
}
