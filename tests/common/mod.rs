//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use symbology_convert::auth::{AuthErrorDetail, AuthFailure, Authorizer, Token};
use symbology_convert::cli::CredentialPrompt;
use symbology_convert::symbology::{ConversionResult, Header};

/// Write `contents` to `name` inside `dir` and return the path
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn token(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: Some("refresh".to_string()),
        expires_in: Some(300),
        scope: Some("trapi".to_string()),
        token_type: Some("Bearer".to_string()),
        expires_at: None,
    }
}

pub fn rejected(status: u16) -> AuthFailure {
    AuthFailure::Rejected {
        status,
        detail: AuthErrorDetail {
            error: Some("invalid_grant".to_string()),
            error_description: Some("Invalid username or password.".to_string()),
            error_uri: None,
        },
    }
}

/// A conversion result with two columns and two rows, one with a null
pub fn sample_result() -> ConversionResult {
    serde_json::from_value(json!({
        "links": {"count": 2},
        "universe": [
            {"Common Name": "INTERNATIONAL BUSINESS MACHINES CORP", "Instrument": "IBM.N",
             "Organization PermID": "4295904307", "Reporting Currency": "USD"}
        ],
        "headers": [
            {"name": "RIC", "title": "RIC"},
            {"name": "ISIN", "title": "ISIN"}
        ],
        "data": [
            ["IBM.N", "US4592001014"],
            ["MSFT.O", null]
        ]
    }))
    .unwrap()
}

pub fn header(title: &str) -> Header {
    Header {
        name: title.to_string(),
        title: title.to_string(),
    }
}

/// Credential prompt answering from a fixed script, counting each question
#[derive(Default)]
pub struct CannedPrompt {
    pub answers: VecDeque<String>,
    pub asked: Vec<&'static str>,
}

impl CannedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    fn answer(&mut self, question: &'static str) -> Result<String> {
        self.asked.push(question);
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("prompt script exhausted at {}", question))
    }
}

impl CredentialPrompt for CannedPrompt {
    fn username(&mut self) -> Result<String> {
        self.answer("username")
    }

    fn client_id(&mut self) -> Result<String> {
        self.answer("client_id")
    }

    fn password(&mut self) -> Result<String> {
        self.answer("password")
    }
}

/// Authorizer returning one scripted outcome per attempt
pub struct ScriptedAuthorizer {
    outcome: Mutex<Option<Result<Token, AuthFailure>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAuthorizer {
    pub fn new(outcome: Result<Token, AuthFailure>, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            calls,
        }
    }

    fn take(&self) -> Result<Token, AuthFailure> {
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(anyhow::anyhow!("authorizer reused across attempts").into()))
    }
}

#[async_trait]
impl Authorizer for ScriptedAuthorizer {
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<Token, AuthFailure> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("password {} {} {}", username, password, client_id));
        self.take()
    }

    async fn refresh_grant(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<Token, AuthFailure> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("refresh {} {}", username, refresh_token));
        self.take()
    }
}
