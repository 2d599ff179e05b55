use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use wear_a_hat::assets::asset_source_for;
use wear_a_hat::config::load_settings;
use wear_a_hat::utils::logging::init_logging;
use wear_a_hat::{
    HatCatalog, HatId, HatSessionController, HatState, HeadlessRuntime, SessionEvent, User, UserId,
    APP_NAME, VERSION,
};

/// Console commands standing in for runtime events
#[derive(Debug, PartialEq)]
enum Command {
    Join(String),
    Click { user: String, hat: String },
    Leave(String),
    Status,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["join", name] => Some(Command::Join(name.to_string())),
            ["click", name, hat] => Some(Command::Click {
                user: name.to_string(),
                hat: hat.to_string(),
            }),
            ["leave", name] => Some(Command::Leave(name.to_string())),
            ["status"] => Some(Command::Status),
            ["help"] => Some(Command::Help),
            ["quit"] | ["exit"] => Some(Command::Quit),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = load_settings(settings_path.as_deref()).context("loading settings")?;
    init_logging(&settings.logging)?;
    info!("🚀 {} {}", APP_NAME, VERSION);

    let catalog = HatCatalog::load(&settings.catalog_path)
        .with_context(|| format!("loading hat catalog {}", settings.catalog_path.display()))?;
    let source = asset_source_for(&settings.assets.base)?;

    let mut session = HatSessionController::new(Arc::new(catalog), source, HeadlessRuntime::new())
        .with_attach_point(settings.attach_point);
    session.handle_event(SessionEvent::Started).await?;

    let hats: Vec<String> = session.catalog().iter().map(|(id, _)| id.to_string()).collect();
    info!("🎩 Hats: {}", hats.join(", "));
    info!("⌨️ Commands: join <name> | click <name> <hat> | leave <name> | status | quit");

    let mut users: HashMap<String, UserId> = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = Command::parse(&line) else {
            warn!("❓ Unknown command: {}", line.trim());
            continue;
        };

        match command {
            Command::Join(name) => {
                join(&mut session, &mut users, &name).await?;
            }
            Command::Click { user, hat } => {
                let user_id = join(&mut session, &mut users, &user).await?;
                let button = session
                    .menu()
                    .and_then(|menu| menu.button_for_hat(&HatId::from(hat.as_str())));
                match button {
                    Some(actor) => {
                        session
                            .handle_event(SessionEvent::ButtonClicked { actor, user: user_id })
                            .await?;
                    }
                    None => warn!("❓ No button for hat '{}'", hat),
                }
            }
            Command::Leave(name) => match users.remove(&name) {
                Some(user_id) => session.handle_event(SessionEvent::UserLeft(user_id)).await?,
                None => warn!("❓ {} is not here", name),
            },
            Command::Status => print_status(&session),
            Command::Help => {
                info!("⌨️ Commands: join <name> | click <name> <hat> | leave <name> | status | quit")
            }
            Command::Quit => break,
        }
    }

    for (_, user_id) in users.drain() {
        session.handle_event(SessionEvent::UserLeft(user_id)).await?;
    }
    info!("👋 Session closed, {} actors left in scene", session.runtime().scene().len());
    Ok(())
}

async fn join(
    session: &mut HatSessionController<HeadlessRuntime>,
    users: &mut HashMap<String, UserId>,
    name: &str,
) -> Result<UserId> {
    if let Some(user_id) = users.get(name) {
        return Ok(*user_id);
    }
    let user = User::new(name);
    let user_id = user.id;
    users.insert(name.to_string(), user_id);
    session.handle_event(SessionEvent::UserJoined(user)).await?;
    Ok(user_id)
}

fn print_status(session: &HatSessionController<HeadlessRuntime>) {
    let status = session.status();
    if status.is_empty() {
        info!("📋 Nobody here");
        return;
    }
    for line in status {
        let name = line.name.unwrap_or_else(|| line.user.to_string());
        match line.hat {
            HatState::NoHat => info!("📋 {}: no hat", name),
            HatState::Wearing { hat, actor } => info!("📋 {}: {} ({})", name, hat, actor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("join alice"), Some(Command::Join("alice".to_string())));
        assert_eq!(
            Command::parse("  click alice tophat "),
            Some(Command::Click {
                user: "alice".to_string(),
                hat: "tophat".to_string()
            })
        );
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("click alice"), None);
        assert_eq!(Command::parse("dance"), None);
    }
}
