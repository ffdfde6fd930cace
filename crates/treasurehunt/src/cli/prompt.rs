//! Interactive prompts for treasure fields.
//!
//! The `add` command gathers field values from the terminal. Numeric and
//! over-long inputs are re-prompted; end of input is an error.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::error::Result;
use crate::record::{Treasure, CLUE_MAX, OWNER_MAX};

/// Prompt on the terminal for the fields of a new treasure.
///
/// # Errors
///
/// Returns an error if standard input ends or an I/O error occurs.
pub fn prompt_treasure(id: i32) -> Result<Treasure> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_treasure_from(&mut stdin.lock(), &mut stdout.lock(), id)
}

/// Prompt for treasure fields on the given input/output pair.
///
/// # Errors
///
/// Returns an error if the input ends or an I/O error occurs.
pub fn prompt_treasure_from<R, W>(input: &mut R, output: &mut W, id: i32) -> Result<Treasure>
where
    R: BufRead,
    W: Write,
{
    let owner = prompt_text(input, output, "Enter owner", OWNER_MAX)?;
    let latitude = prompt_parsed(input, output, "Enter latitude")?;
    let longitude = prompt_parsed(input, output, "Enter longitude")?;
    let clue = prompt_text(input, output, "Enter clue text", CLUE_MAX)?;
    let value = prompt_parsed(input, output, "Enter value")?;

    Ok(Treasure {
        id,
        owner,
        latitude,
        longitude,
        clue,
        value,
    })
}

/// Read one line, stripped of its trailing newline.
fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "unexpected end of input",
        )
        .into());
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Prompt for a text field, re-prompting while it exceeds `max` bytes.
fn prompt_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    max: usize,
) -> Result<String> {
    loop {
        let text = read_line(input, output, label)?;
        if text.len() <= max {
            return Ok(text);
        }
        writeln!(output, "Input is longer than {max} bytes, try again.")?;
    }
}

/// Prompt for a value, re-prompting until it parses.
fn prompt_parsed<R, W, T>(input: &mut R, output: &mut W, label: &str) -> Result<T>
where
    R: BufRead,
    W: Write,
    T: FromStr,
{
    loop {
        let line = read_line(input, output, label)?;
        if let Ok(value) = line.trim().parse() {
            return Ok(value);
        }
        writeln!(output, "Invalid input, try again.")?;
    }
}
