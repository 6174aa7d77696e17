pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(
        "Input too large: {lines} lines / {bytes} bytes (limits: {max_lines} lines / {max_bytes} bytes)"
    )]
    InputTooLarge {
        lines: usize,
        bytes: usize,
        max_lines: usize,
        max_bytes: usize,
    },

    #[error("A condition needs at least one step in its first branch")]
    EmptyBranch,

    #[error("Invalid engine config: {message}")]
    InvalidConfig { message: String },
}
