//! CLI module graph.

pub mod backend;
pub mod command;
pub mod config;
pub mod history;
pub mod movement;
pub mod notifier;
pub mod output;
pub mod paths;
pub mod stats;
pub mod tire;

use std::io::IsTerminal;
use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::application::Inventory;
use crate::domain::User;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_notifier_registry, open_inventory, SignInPrompt};
use crate::infrastructure::config::settings::Config;

/// Open the inventory with notices routed to the terminal and the log.
pub(crate) async fn open(config: &Config) -> Result<Inventory> {
    let registry = build_notifier_registry(Box::new(notifier::CliNotifier));
    open_inventory(config, Arc::new(registry), sign_in_prompt()).await
}

/// Ask for a user id on an interactive terminal.
fn sign_in_prompt() -> Option<SignInPrompt> {
    if output::is_json() || !std::io::stdin().is_terminal() {
        return None;
    }
    Some(Box::new(|| {
        output::note("No user configured in [session]");
        let id: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("User id")
            .allow_empty(true)
            .interact_text()
            .ok()?;
        let id = id.trim();
        (!id.is_empty()).then(|| User::new(id))
    }))
}
