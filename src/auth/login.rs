//! Interactive login loop
//!
//! Keeps asking for credentials until the token endpoint hands out a token
//! or the user presses Ctrl+C. Credentials are wiped from the configuration
//! after every attempt, so a failed attempt always re-prompts.

use anyhow::Result;
use console::style;
use tokio::runtime::{Handle, RuntimeFlavor};

use super::{AuthFailure, Authorizer, Token};
use crate::cancel::CancelSignal;
use crate::cli::CredentialPrompt;
use crate::config::{non_empty, AppConfig};
use crate::utils::{create_spinner, print_error, print_rule};

/// How the login loop ended
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Token),
    Cancelled,
}

impl LoginOutcome {
    pub fn token(&self) -> Option<&Token> {
        match self {
            LoginOutcome::Authenticated(token) => Some(token),
            LoginOutcome::Cancelled => None,
        }
    }
}

/// Run the login loop.
///
/// `connect` builds a fresh authorizer for every attempt; it is dropped when
/// the attempt finishes. A refresh token in `config` takes precedence over
/// the password grant.
///
/// Returns `Err` only when prompting itself fails (for example stdin is
/// closed), since retrying cannot recover from that.
pub async fn attempt_login<P, A, F>(
    config: &mut AppConfig,
    prompt: &mut P,
    mut connect: F,
    cancel: &CancelSignal,
) -> Result<LoginOutcome>
where
    P: CredentialPrompt + ?Sized,
    A: Authorizer,
    F: FnMut(&AppConfig) -> Result<A>,
{
    loop {
        println!();
        println!(
            "    {} {}",
            style("Sign in to the data platform.").cyan().bold(),
            style("Press Ctrl+C to cancel").dim()
        );
        print_rule();

        if cancel.is_cancelled() {
            return Ok(LoginOutcome::Cancelled);
        }

        match prompt_blocking(|| collect_credentials(config, prompt, cancel)) {
            Ok(()) => {}
            Err(err) if cancel.is_cancelled() || is_interrupt(&err) => {
                cancel.cancel();
                return Ok(LoginOutcome::Cancelled);
            }
            Err(err) => return Err(err),
        }
        print_rule();

        if cancel.is_cancelled() {
            return Ok(LoginOutcome::Cancelled);
        }

        let result = login_once(config, &mut connect, cancel).await;
        config.clear_credentials();

        match result {
            Ok(token) => return Ok(LoginOutcome::Authenticated(token)),
            Err(AuthFailure::Cancelled) => {}
            Err(failure @ AuthFailure::Rejected { .. }) => print_error(&failure.to_string()),
            Err(failure) => {
                tracing::debug!("Login attempt failed: {:#}", failure);
                print_error(&format!("Get {} Error {:#}", failure.kind(), failure));
            }
        }

        if cancel.is_cancelled() {
            return Ok(LoginOutcome::Cancelled);
        }
    }
}

/// Run a blocking terminal prompt without stalling the runtime's other tasks.
///
/// `block_in_place` is only available on the multi-threaded runtime; on a
/// current-thread runtime the prompt runs inline.
fn prompt_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

fn collect_credentials<P>(
    config: &mut AppConfig,
    prompt: &mut P,
    cancel: &CancelSignal,
) -> Result<()>
where
    P: CredentialPrompt + ?Sized,
{
    match non_empty(&config.username) {
        Some(username) => println!("    Machine ID or Username(Email): {}", username),
        None => config.username = Some(prompt.username()?),
    }

    match non_empty(&config.client_id) {
        Some(client_id) => println!("    Client ID: {}", client_id),
        None => config.client_id = Some(prompt.client_id()?),
    }

    if !cancel.is_cancelled() && !config.has_refresh_token() && !config.has_password() {
        config.password = Some(prompt.password()?);
    }
    Ok(())
}

async fn login_once<A, F>(
    config: &AppConfig,
    connect: &mut F,
    cancel: &CancelSignal,
) -> Result<Token, AuthFailure>
where
    A: Authorizer,
    F: FnMut(&AppConfig) -> Result<A>,
{
    let authorizer = connect(config)?;

    let username = non_empty(&config.username).unwrap_or_default();
    let call = async {
        match non_empty(&config.refresh_token) {
            Some(refresh_token) => authorizer.refresh_grant(username, refresh_token).await,
            None => {
                let password = config.password.as_deref().unwrap_or_default();
                let client_id = non_empty(&config.client_id).unwrap_or_default();
                authorizer.password_grant(username, password, client_id).await
            }
        }
    };

    let spinner = create_spinner("Logging in to the platform, please wait...");
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthFailure::Cancelled),
        result = call => result,
    };
    spinner.finish_and_clear();
    result
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::Interrupted)
    })
}
