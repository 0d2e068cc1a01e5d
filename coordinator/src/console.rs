// console.rs - Operator prompt for the generation count

use std::io::{self, BufRead, Write};

use log::debug;
use thiserror::Error;

pub const PROMPT: &str = "Enter the number of generations: ";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read the number of generations. Exiting.")]
    Unreadable,
    #[error("Invalid number of generations. Exiting.")]
    Invalid(i64),
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Prompt on `output` and read one positive generation count from `input`.
///
/// Blank lines are skipped. The count is the leading integer of the first
/// token, so `12abc` reads as 12; a token with no leading digits, or end of
/// input, is `Unreadable`. Zero, negative and values beyond `u32::MAX` are
/// `Invalid`.
pub fn read_generation_count<R, W>(input: &mut R, output: &mut W) -> Result<u32, InputError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?; // Prompt must show before we block on input

    let mut line = String::new();
    let leading = loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("operator input closed before a generation count arrived");
            return Err(InputError::Unreadable);
        }
        if let Some(token) = line.split_whitespace().next() {
            break leading_integer(token);
        }
    };

    let value = leading.ok_or(InputError::Unreadable)?;
    match u32::try_from(value) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(InputError::Invalid(value)),
    }
}

/// Optional sign followed by at least one digit, ignoring whatever trails.
/// Out-of-range values saturate.
fn leading_integer(token: &str) -> Option<i64> {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let sign_len = token.len() - unsigned.len();
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let number = &token[..sign_len + digits];
    Some(number.parse().unwrap_or(if token.starts_with('-') { i64::MIN } else { i64::MAX }))
}
