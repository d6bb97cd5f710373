use crate::utils::error::{PhonebookError, Result};
use std::fs;
use std::io::Read;

/// Pseudo path selecting standard input.
pub const STDIN_PATH: &str = "-";

/// Read the whole input source into memory.
///
/// Empty input is rejected: every subcommand needs at least one record or
/// card to work on, and silently producing empty output would hide a wiring
/// mistake in a shell pipeline.
pub fn read_input(path: &str) -> Result<String> {
    let data = if path == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|_| PhonebookError::ReadInput { path: path.into() })?;
        buffer
    } else {
        fs::read_to_string(path).map_err(|_| PhonebookError::ReadInput { path: path.into() })?
    };

    if data.trim().is_empty() {
        return Err(PhonebookError::EmptyInput { path: path.into() });
    }

    Ok(data)
}
