use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cohort data must contain at least one step")]
    EmptyInput,

    #[error("step {index} has more participants ({count}) than the previous step ({previous})")]
    InvalidSequence {
        index: usize,
        count: u64,
        previous: u64,
    },

    #[error("unknown built-in style '{style}'. Available styles: {available}")]
    UnknownStyle { style: String, available: String },

    #[error("style config file does not exist: {}", path.display())]
    StyleFileMissing { path: PathBuf },

    #[error("invalid style config: {message}")]
    InvalidStyleConfig { message: String },

    #[error("unsupported color '{value}'. Use hex colors like '#88ccff' or a recognised color name")]
    InvalidColor { value: String },
}
