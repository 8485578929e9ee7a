use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Parse one line of operator input as an index below `count`.
pub fn parse_selection(line: &str, count: usize) -> Option<usize> {
    line.trim().parse::<usize>().ok().filter(|&i| i < count)
}

/// Block until the operator enters a valid index in `[0, count)`.
///
/// Anything else re-prompts. Fails only on an empty range, a closed input
/// stream, or an I/O error.
pub fn select_index<R: BufRead, W: Write>(input: &mut R, out: &mut W, count: usize) -> Result<usize> {
    if count == 0 {
        return Err(Error::NoCredentials);
    }
    // Raw bytes: a line that is not UTF-8 is just another bad entry.
    let mut line = Vec::new();
    loop {
        write!(out, "Enter index to test authentication with [0-{}]: ", count - 1)?;
        out.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        match std::str::from_utf8(&line).ok().and_then(|s| parse_selection(s, count)) {
            Some(index) => {
                writeln!(out)?;
                return Ok(index);
            }
            None => tracing::debug!(
                input = %String::from_utf8_lossy(&line).trim(),
                "Rejected selection"
            ),
        }
    }
}
