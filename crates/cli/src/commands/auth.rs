//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! ATELIER_PASSWORD=... atelier login -e admin@example.com
//! atelier whoami
//! atelier logout
//! ```

use std::io::{BufRead, Write};

use atelier_client::{AdminGate, ApiClient};
use secrecy::SecretString;

use super::{CommandError, require_admin};

const PASSWORD_VAR: &str = "ATELIER_PASSWORD";

pub async fn health(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    let health = api.health().await?;
    writeln!(
        out,
        "{} ({})",
        health.status,
        health.message.as_deref().unwrap_or("no message")
    )?;
    if !health.is_healthy() {
        tracing::warn!(status = %health.status, "Backend reports unhealthy");
    }
    Ok(())
}

pub async fn login(api: &ApiClient, email: &str) -> Result<(), CommandError> {
    let password = read_password()?;
    AdminGate::new(api.clone()).login(email, &password).await?;
    tracing::info!("Logged in as {email}");
    Ok(())
}

pub async fn logout(api: &ApiClient) -> Result<(), CommandError> {
    AdminGate::new(api.clone()).logout().await?;
    Ok(())
}

pub async fn whoami(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    let admin = require_admin(api).await?;
    writeln!(out, "{} (admin #{})", admin.email, admin.id)?;
    Ok(())
}

/// Password from the environment, or one line from stdin.
fn read_password() -> Result<SecretString, CommandError> {
    if let Ok(password) = std::env::var(PASSWORD_VAR) {
        return Ok(SecretString::from(password));
    }

    let mut prompt = std::io::stderr().lock();
    write!(prompt, "Password: ")?;
    prompt.flush()?;
    drop(prompt);
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}
