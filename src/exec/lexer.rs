//! POSIX-style word splitting.
//!
//! Space, tab, carriage return and newline separate words; other Unicode
//! whitespace such as U+00A0 is part of the word. Single quotes are
//! literal, double quotes allow `\"` and `\\` escapes, and a backslash
//! outside quotes escapes the next character. Nothing else is special: no
//! globbing, no variables, no pipes, and `#` is an ordinary character.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("missing closing {0} quote")]
    UnclosedQuote(char),

    #[error("trailing backslash with nothing to escape")]
    TrailingEscape,
}

pub fn split(input: &str) -> Result<Vec<String>, LexError> {
    let mut words = Vec::new();
    let mut word = String::new();
    // Tracks `''` and `""` so empty quoted arguments survive.
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(LexError::UnclosedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(LexError::UnclosedQuote('"')),
                        },
                        Some(c) => word.push(c),
                        None => return Err(LexError::UnclosedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => word.push(c),
                    None => return Err(LexError::TrailingEscape),
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }

    if in_word {
        words.push(word);
    }
    Ok(words)
}
