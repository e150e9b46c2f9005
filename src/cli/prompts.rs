//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Input, Password};

/// Source of login credentials for the interactive login loop.
///
/// The terminal implementation is [`TerminalPrompt`]; tests supply canned
/// answers instead.
pub trait CredentialPrompt {
    fn username(&mut self) -> Result<String>;
    fn client_id(&mut self) -> Result<String>;
    /// Must not echo the typed characters.
    fn password(&mut self) -> Result<String>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn username(&mut self) -> Result<String> {
        let username: String = Input::new()
            .with_prompt("Machine ID or Username(Email)")
            .allow_empty(true)
            .interact_text()?;
        Ok(username)
    }

    fn client_id(&mut self) -> Result<String> {
        let client_id: String = Input::new()
            .with_prompt("Enter Client ID/AppKey")
            .allow_empty(true)
            .interact_text()?;
        Ok(client_id)
    }

    fn password(&mut self) -> Result<String> {
        let password = Password::new()
            .with_prompt("Enter Password")
            .allow_empty_password(true)
            .interact()?;
        Ok(password)
    }
}
