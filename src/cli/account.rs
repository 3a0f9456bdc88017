//! Account CLI commands

use clap::Subcommand;

use crate::error::SpendlogResult;
use crate::services::AuthService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a new account
    Register {
        /// Username (at least 4 characters)
        username: String,
    },

    /// Verify the credentials of an existing account
    Login {
        /// Username
        username: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> SpendlogResult<()> {
    let auth = AuthService::new(&storage.users);

    match cmd {
        AccountCommands::Register { username } => {
            let password = prompt_password("Password: ")?;
            let confirm = prompt_password("Confirm password: ")?;

            let identity = auth.register(&username, &password, &confirm)?;
            println!("Account '{}' created.", identity.username);
            println!(
                "Record expenses with 'spendlog --user {} expense add'.",
                identity.username
            );
        }

        AccountCommands::Login { username } => {
            let password = prompt_password("Password: ")?;
            let identity = auth.login(&username, &password)?;
            println!("Credentials OK for '{}'.", identity.username);
        }
    }

    Ok(())
}

fn prompt_password(prompt: &str) -> SpendlogResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| crate::error::SpendlogError::Io(format!("Failed to read password: {}", e)))
}
