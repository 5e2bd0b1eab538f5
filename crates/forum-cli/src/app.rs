//! Command implementations over the forum client

use std::io::Write;

use tracing::info;

use forum_client::{ChatFrame, ConnectionState, ForumClient};

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::error::{CliError, Result};

/// The CLI application: one `ForumClient` plus the command handlers.
pub struct ForumApp {
    client: ForumClient,
    config: AppConfig,
}

impl ForumApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: ForumClient::new(&config.client),
            config,
        }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { username, password } => self.login(&username, password).await,
            Commands::Register {
                username,
                email,
                password,
            } => self.register(&username, &email, password).await,
            Commands::Logout => self.logout().await,
            Commands::Send { message } => self.send(&message).await,
            Commands::Listen => self.listen().await,
            Commands::History { limit } => self.history(limit).await,
            Commands::Status => self.status().await,
        }
    }

    async fn login(&self, username: &str, password: Option<String>) -> Result<()> {
        let password = resolve_password(password)?;
        let session = self.client.login(username, &password).await?;
        println!(
            "Logged in as {}",
            session.username().unwrap_or(username)
        );
        Ok(())
    }

    async fn register(&self, username: &str, email: &str, password: Option<String>) -> Result<()> {
        let password = resolve_password(password)?;
        let session = self.client.register(username, email, &password).await?;
        println!(
            "Registered and logged in as {}",
            session.username().unwrap_or(username)
        );
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.client.logout().await?;
        println!("Logged out");
        Ok(())
    }

    async fn send(&self, message: &str) -> Result<()> {
        let session = self.client.restore().await?;
        if !session.is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }
        self.client.send_message(message).await?;
        println!("Message sent");
        Ok(())
    }

    async fn listen(&self) -> Result<()> {
        // Register before restore opens the socket; frames arriving right
        // after the upgrade would otherwise be dropped
        self.client
            .on_message(|frame| match ChatFrame::parse(frame) {
                Some(parsed) => match parsed.message_content() {
                    Some(content) => println!("{}", content),
                    None => println!("[{}] {}", parsed.kind, parsed.payload),
                },
                None => println!("{}", frame),
            })
            .await;

        let session = self.client.restore().await?;
        if !session.is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }

        // restore() already opened the connection for the stored token
        if self.client.connection_state().await != ConnectionState::Open {
            self.client.ensure_connected().await?;
        }

        info!("listening for chat messages, Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        Ok(())
    }

    async fn history(&self, limit: usize) -> Result<()> {
        let session = self.client.restore().await?;
        if !session.is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }

        let limit = if limit == 0 {
            self.config.cli.history_limit
        } else {
            limit
        };
        let messages = self.client.fetch_messages(limit).await?;
        for msg in messages.iter().rev() {
            println!("[{}] user {}: {}", msg.created_at, msg.user_id, msg.content);
        }
        Ok(())
    }

    async fn status(&self) -> Result<()> {
        let session = self.client.restore().await?;
        let view = self.client.view().await;

        match session.username() {
            Some(username) => println!("Logged in as {}", username),
            None => println!("Not logged in"),
        }
        println!(
            "Connection: {}",
            match self.client.connection_state().await {
                ConnectionState::Open => "open",
                ConnectionState::Closed => "closed",
            }
        );
        println!(
            "Auth buttons {}, user panel {}",
            if view.auth_buttons.is_visible() { "shown" } else { "hidden" },
            if view.user_info.is_visible() { "shown" } else { "hidden" },
        );
        Ok(())
    }
}

fn resolve_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => {
            print!("Password: ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}
