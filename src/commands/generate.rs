use std::collections::BTreeSet;

use gitpass::error::{GitPassError, Result};
use gitpass::generator::{self, CharacterClass, GeneratorOptions};

/// Generate and print a random password.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    min_length: u64,
    max_length: u64,
    exclude: Option<&str>,
    no_lowercase: bool,
    no_uppercase: bool,
    no_numbers: bool,
    no_special: bool,
) -> Result<()> {
    if min_length == 0 || min_length > max_length {
        return Err(GitPassError::Other(format!(
            "invalid password length bounds [{}, {}]",
            min_length, max_length
        )));
    }

    let mut classes = Vec::new();
    if !no_lowercase {
        classes.push(CharacterClass::Lowercase);
    }
    if !no_uppercase {
        classes.push(CharacterClass::Uppercase);
    }
    if !no_numbers {
        classes.push(CharacterClass::Numbers);
    }
    if !no_special {
        classes.push(CharacterClass::Special);
    }

    let excluded_characters: BTreeSet<char> = exclude
        .map(|characters| characters.chars().collect())
        .unwrap_or_default();

    let options = GeneratorOptions {
        classes,
        min_length,
        max_length,
        excluded_characters,
    };
    println!("{}", generator::generate_password(&options)?);
    Ok(())
}
