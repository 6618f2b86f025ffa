//! # Password Generation
//!
//! Random password strings drawn from a configurable alphabet: a union of
//! character classes minus an exclusion set. Length and characters are both
//! sampled with the unbiased ranged RNG, so every admissible password of a
//! given length is equally likely.

use std::collections::BTreeSet;

use crate::error::CryptoError;
use crate::rng::{self, RandomQuality};

const LOWERCASE_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE_CHARACTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBER_CHARACTERS: &str = "1234567890";
const SPECIAL_CHARACTERS: &str = "`~!@#$%^&*()-_=+/[{]}\\|;:'\",<.>?";

/// One selectable character class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Numbers,
    Special,
}

impl CharacterClass {
    fn characters(self) -> &'static str {
        match self {
            CharacterClass::Lowercase => LOWERCASE_CHARACTERS,
            CharacterClass::Uppercase => UPPERCASE_CHARACTERS,
            CharacterClass::Numbers => NUMBER_CHARACTERS,
            CharacterClass::Special => SPECIAL_CHARACTERS,
        }
    }
}

/// Password generation policy.
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    /// Classes contributing to the alphabet.
    pub classes: Vec<CharacterClass>,
    /// Inclusive bounds on the generated length.
    pub min_length: u64,
    pub max_length: u64,
    /// Characters removed from the alphabet after the class union.
    pub excluded_characters: BTreeSet<char>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            classes: vec![
                CharacterClass::Lowercase,
                CharacterClass::Uppercase,
                CharacterClass::Numbers,
                CharacterClass::Special,
            ],
            min_length: 8,
            max_length: 32,
            excluded_characters: BTreeSet::new(),
        }
    }
}

fn effective_alphabet(options: &GeneratorOptions) -> Vec<char> {
    let mut included: BTreeSet<char> = BTreeSet::new();
    for class in &options.classes {
        included.extend(class.characters().chars());
    }
    included
        .difference(&options.excluded_characters)
        .copied()
        .collect()
}

/// Generate a password according to `options`.
pub fn generate_password(options: &GeneratorOptions) -> Result<String, CryptoError> {
    let alphabet = effective_alphabet(options);
    if alphabet.is_empty() {
        return Err(CryptoError::EmptyAlphabet);
    }

    let length = rng::random_u64_in(
        options.min_length,
        options.max_length,
        RandomQuality::Strong,
    )? as usize;

    let mut password = String::with_capacity(length);
    for _ in 0..length {
        let index =
            rng::random_u64_in(0, (alphabet.len() - 1) as u64, RandomQuality::Strong)? as usize;
        password.push(alphabet[index]);
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_bounds_and_alphabet() {
        let options = GeneratorOptions::default();
        let alphabet: BTreeSet<char> = effective_alphabet(&options).into_iter().collect();
        assert_eq!(alphabet.len(), 26 + 26 + 10 + 32);

        for _ in 0..100 {
            let password = generate_password(&options).unwrap();
            let length = password.chars().count() as u64;
            assert!((options.min_length..=options.max_length).contains(&length));
            assert!(password.chars().all(|c| alphabet.contains(&c)));
        }
    }

    #[test]
    fn test_single_class() {
        let options = GeneratorOptions {
            classes: vec![CharacterClass::Numbers],
            min_length: 12,
            max_length: 12,
            excluded_characters: BTreeSet::new(),
        };
        let password = generate_password(&options).unwrap();
        assert_eq!(password.len(), 12);
        assert!(password.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_excluded_characters_never_appear() {
        let options = GeneratorOptions {
            classes: vec![CharacterClass::Lowercase],
            min_length: 1,
            max_length: 1,
            excluded_characters: ['f'].into_iter().collect(),
        };

        for _ in 0..1000 {
            let password = generate_password(&options).unwrap();
            assert_eq!(password.len(), 1);
            let c = password.chars().next().unwrap();
            assert!(c.is_ascii_lowercase());
            assert_ne!(c, 'f');
        }
    }

    #[test]
    fn test_duplicate_classes_are_harmless() {
        let options = GeneratorOptions {
            classes: vec![CharacterClass::Lowercase, CharacterClass::Lowercase],
            min_length: 4,
            max_length: 8,
            excluded_characters: BTreeSet::new(),
        };
        let password = generate_password(&options).unwrap();
        assert!(password.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_empty_alphabet_is_an_error() {
        let options = GeneratorOptions {
            classes: vec![CharacterClass::Lowercase],
            min_length: 8,
            max_length: 8,
            excluded_characters: LOWERCASE_CHARACTERS.chars().collect(),
        };
        assert!(matches!(
            generate_password(&options).unwrap_err(),
            CryptoError::EmptyAlphabet
        ));
    }

    #[test]
    fn test_no_classes_is_an_error() {
        let options = GeneratorOptions {
            classes: vec![],
            min_length: 8,
            max_length: 8,
            excluded_characters: BTreeSet::new(),
        };
        assert!(matches!(
            generate_password(&options).unwrap_err(),
            CryptoError::EmptyAlphabet
        ));
    }
}
