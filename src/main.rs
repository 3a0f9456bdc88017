use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use spendlog::cli::{
    handle_account_command, handle_dashboard_command, handle_expense_command, AccountCommands,
    ExpenseCommands,
};
use spendlog::config::{paths::SpendlogPaths, settings::Settings};
use spendlog::services::AuthService;
use spendlog::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendlog",
    version,
    about = "Personal expense tracker for the command line",
    long_about = "spendlog records day-to-day expenses per user, summarizes monthly \
                  spending by category, warns when configured category budgets are \
                  exceeded, and imports expenses in bulk from CSV files."
)]
struct Cli {
    /// Username the command acts on behalf of
    #[arg(short, long, global = true, env = "SPENDLOG_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Monthly overview with totals, averages and budget alerts
    #[command(alias = "dash")]
    Dashboard {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let paths = SpendlogPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            let user = resolve_user(&storage, cli.user.as_deref())?;
            handle_expense_command(&storage, &settings, &user, cmd)?;
        }
        Some(Commands::Dashboard { year, month }) => {
            let user = resolve_user(&storage, cli.user.as_deref())?;
            handle_dashboard_command(&storage, &settings, &user, year, month)?;
        }
        Some(Commands::Config) => {
            println!("spendlog configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Page size:       {}", settings.page_size);
            if settings.category_budgets.is_empty() {
                println!("  Category budgets: none configured");
            } else {
                println!("  Category budgets:");
                for name in settings.category_budgets.category_names() {
                    let limit = settings.category_budgets.limit_for(name).unwrap_or(0.0);
                    println!(
                        "    {:16} {:.2} {}",
                        name, limit, settings.currency_symbol
                    );
                }
            }
        }
        None => {
            println!("spendlog - personal expense tracking");
            println!();
            println!("Run 'spendlog --help' for usage information.");
            println!("Run 'spendlog account register <username>' to get started.");
        }
    }

    Ok(())
}

/// Resolve the `--user` flag into a stored identity
fn resolve_user(
    storage: &Storage,
    username: Option<&str>,
) -> Result<spendlog::models::UserIdentity> {
    let Some(username) = username else {
        bail!("No user given. Pass --user <username> or set SPENDLOG_USER.");
    };

    let auth = AuthService::new(&storage.users);
    Ok(auth.identity_for(username)?)
}
