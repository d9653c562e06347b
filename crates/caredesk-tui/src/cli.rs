//! Non-interactive entry points: `--login`, `--logout` and `--status`.

use std::io::{self, Write};

use anyhow::{bail, Result};
use tracing::warn;

use caredesk_core::auth::SubmitOutcome;
use caredesk_core::models::{Credentials, PrincipalKind};
use caredesk_core::Config;

use crate::app::{build_controller, Prefill};

/// Prompt for credentials on the terminal and sign in
pub async fn login(config: &mut Config, kind: PrincipalKind) -> Result<()> {
    println!("\n=== CareDesk {} Sign-in ===\n", kind.label());

    let prefill = Prefill::from_env();
    let default_email = prefill.email.or_else(|| config.last_identifier.clone());
    let email = prompt_email(default_email.as_deref())?;
    if email.is_empty() {
        bail!("Email is required");
    }

    let password = match prefill.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        bail!("Password is required");
    }

    println!("\nAuthenticating...");

    let controller = build_controller(config)?;
    match controller.login(kind, Credentials::new(email.as_str(), password)).await {
        Ok(SubmitOutcome::Navigate(_)) => {}
        Ok(SubmitOutcome::Busy) => bail!("Another sign-in is already in progress"),
        Ok(SubmitOutcome::Discarded) => bail!("Signed out before the sign-in finished"),
        Err(e) => bail!("{}", e.user_message()),
    }

    config.remember(&email, kind);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let name = controller
        .sessions()
        .load(kind)
        .ok()
        .flatten()
        .map(|s| s.principal.display_name)
        .unwrap_or(email);
    println!("Signed in as {} ({}).\n", name, kind.label());
    Ok(())
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

/// Sign out and clear local session state
pub async fn logout(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    controller.logout().await;

    match controller.status().error() {
        Some(message) => println!("Signed out on this device. Server said: {}", message),
        None => println!("Signed out."),
    }
    Ok(())
}

/// Print which sessions are stored
pub fn status(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let sessions = controller.sessions();

    for kind in [PrincipalKind::Admin, PrincipalKind::User] {
        match sessions.load(kind)? {
            Some(session) => {
                let principal = &session.principal;
                let email = principal.email.as_deref().unwrap_or("no email");
                println!(
                    "{:<14} {} <{}>, {}",
                    kind.label(),
                    principal.display_name,
                    email,
                    principal.role_display()
                );
            }
            None => println!("{:<14} not signed in", kind.label()),
        }
    }
    Ok(())
}
