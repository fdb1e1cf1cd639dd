#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("word_width must be between 1 and 32. Got {0}")]
    InvalidWordWidth(u32),
}
