use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid codepoint value '{raw}': '{inner}'")]
    MalformedCodepoint { raw: String, inner: ParseIntError },
}
