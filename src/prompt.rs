//! # Passphrase Prompting
//!
//! The repository never caches the user's passphrase; it asks for it
//! through a [`PassphrasePrompt`] every time a master key is needed. The
//! terminal implementation disables echo; tests inject a canned passphrase
//! instead.

use zeroize::Zeroizing;

use crate::error::Result;

/// Source of the user's passphrase.
pub trait PassphrasePrompt {
    /// Ask for a passphrase. With `confirm` set, ask twice and keep asking
    /// until both answers match.
    fn prompt(&self, message: &str, confirm: bool) -> Result<Zeroizing<String>>;
}

/// Prompts on the controlling terminal with echo disabled.
pub struct TerminalPrompt;

impl PassphrasePrompt for TerminalPrompt {
    fn prompt(&self, message: &str, confirm: bool) -> Result<Zeroizing<String>> {
        loop {
            let first = Zeroizing::new(rpassword::prompt_password(message)?);
            if !confirm {
                return Ok(first);
            }
            let second = Zeroizing::new(rpassword::prompt_password("Confirm: ")?);
            if first.as_str() == second.as_str() {
                return Ok(first);
            }
            eprintln!("Passphrases do not match; try again.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPrompt(&'static str);

    impl PassphrasePrompt for StaticPrompt {
        fn prompt(&self, _message: &str, _confirm: bool) -> Result<Zeroizing<String>> {
            Ok(Zeroizing::new(self.0.to_string()))
        }
    }

    #[test]
    fn test_prompt_is_object_safe() {
        let prompt: Box<dyn PassphrasePrompt> = Box::new(StaticPrompt("hunter2"));
        assert_eq!(prompt.prompt("Passphrase: ", false).unwrap().as_str(), "hunter2");
    }
}
