//! Command-line interface for kfpwd

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use kfpwd::{generator, Credential, CredentialStore, StoreError};
use kfpwd_core::{format, Config, Paths};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Longest password `create` will generate
pub const MAX_LENGTH: i64 = 4096;

#[derive(Parser)]
#[command(name = "kfpwd")]
#[command(about = "Password tool - generate random passwords and keep them in a local database")]
#[command(version)]
#[command(after_help = r#"PASSWORD SHAPE:
    Generated passwords start with a lowercase letter, an uppercase letter
    and a digit, and end with one of !@#$%^&*=+. Everything in between is
    alphanumeric.

STORAGE:
    Records live in passwords.db next to the kfpwd executable unless
    --db is given. Values are stored in plain text.

EXAMPLES:
    kfpwd create 16
    kfpwd save github 'aB3xyz...!' https://github.com
    kfpwd list
    kfpwd delete 3"#)]
pub struct Cli {
    /// Use this database file instead of the one next to the executable
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a random password of the given length
    Create {
        /// Password length (default 12, at least 6)
        #[arg(allow_negative_numbers = true)]
        length: Option<i64>,
    },

    /// Show all saved passwords, newest first
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Save a password to the database
    Save {
        /// Name of the account or service
        name: String,
        /// Password value
        #[arg(allow_hyphen_values = true)]
        password: String,
        /// Optional URL
        url: Option<String>,
    },

    /// Delete the password record with the given ID
    Delete {
        /// Record ID (see `kfpwd list`)
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Show a single password record
    Show {
        /// Record ID
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse command-line arguments
///
/// `Ok(None)` means no command could be recognised (an unknown command or a
/// stray top-level flag) and usage should be printed. Bad arguments to a
/// known command stay clap errors.
pub fn parse_args<I, T>(args: I) -> Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    match Cli::try_parse_from(args.iter().cloned()) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => Ok(None),
        Err(e) if e.kind() == ErrorKind::UnknownArgument && !names_command(&args) => Ok(None),
        Err(e) => Err(e),
    }
}

fn names_command(args: &[OsString]) -> bool {
    let cmd = Cli::command();
    args.iter().skip(1).any(|arg| cmd.find_subcommand(arg).is_some())
}

/// Print usage to stdout
pub fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        return print_usage();
    };

    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;

    match command {
        Commands::Create { length } => {
            cmd_create(length.unwrap_or(config.default_length), &config)
        }
        Commands::List { json } => cmd_list(&open_store(cli.db, &config, &paths)?, json),
        Commands::Save {
            name,
            password,
            url,
        } => cmd_save(
            &open_store(cli.db, &config, &paths)?,
            &name,
            &password,
            url.as_deref(),
        ),
        Commands::Delete { id } => cmd_delete(&open_store(cli.db, &config, &paths)?, id),
        Commands::Show { id, json } => cmd_show(&open_store(cli.db, &config, &paths)?, id, json),
    }
}

fn open_store(db: Option<PathBuf>, config: &Config, paths: &Paths) -> Result<CredentialStore> {
    let path = db.unwrap_or_else(|| paths.database(&config.db_file));
    debug!(path = %path.display(), "resolved database path");
    CredentialStore::open(&path)
        .with_context(|| format!("Failed to open password database: {}", path.display()))
}

/// Reject lengths outside `min..=MAX_LENGTH` before the generator sees them
pub fn validate_length(requested: i64, min: i64) -> Result<i64> {
    if requested < min {
        bail!("Password length must be at least {}, got {}", min, requested);
    }
    if requested > MAX_LENGTH {
        bail!("Password length must be at most {}, got {}", MAX_LENGTH, requested);
    }
    Ok(requested)
}

/// Generate and print a password
fn cmd_create(length: i64, config: &Config) -> Result<()> {
    let length = validate_length(length, config.effective_min_length())?;
    let password = generator::generate(length);
    println!("{}", password);
    Ok(())
}

/// List all saved passwords
fn cmd_list(store: &CredentialStore, json: bool) -> Result<()> {
    let credentials = store.list().context("Failed to list passwords")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&credentials)?);
        return Ok(());
    }

    if credentials.is_empty() {
        println!("No saved passwords. Add one with: kfpwd save <name> <password> [url]");
        return Ok(());
    }

    print!("{}", render_table(&credentials));
    Ok(())
}

const ID_WIDTH: usize = 6;
const CREATED_WIDTH: usize = 18;
const NAME_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 26;

/// Fixed-width table of credentials, one line per record
pub fn render_table(credentials: &[Credential]) -> String {
    let mut out = format!(
        "{}{}{}{}URL\n",
        cell("ID", ID_WIDTH),
        cell("CREATED", CREATED_WIDTH),
        cell("NAME", NAME_WIDTH),
        cell("PASSWORD", VALUE_WIDTH),
    );

    for c in credentials {
        out.push_str(&format!(
            "{}{}{}{}{}\n",
            cell(&c.id.to_string(), ID_WIDTH),
            cell(&format::timestamp(c.created_at), CREATED_WIDTH),
            cell(&c.name, NAME_WIDTH),
            cell(&c.value, VALUE_WIDTH),
            c.url.as_deref().unwrap_or("--")
        ));
    }

    out
}

// Column of `width` including one trailing space
fn cell(s: &str, width: usize) -> String {
    format!("{} ", format::pad(s, width - 1))
}

/// Save a password
fn cmd_save(store: &CredentialStore, name: &str, password: &str, url: Option<&str>) -> Result<()> {
    let id = store
        .save(name, password, url)
        .context("Failed to save password")?;
    println!("success: Password saved: {} (ID {})", name, id);
    Ok(())
}

/// Delete a password
fn cmd_delete(store: &CredentialStore, id: i64) -> Result<()> {
    store.delete(id)?;
    println!("success: Password deleted: {}", id);
    Ok(())
}

/// Show one password
fn cmd_show(store: &CredentialStore, id: i64, json: bool) -> Result<()> {
    let Some(credential) = store.get(id)? else {
        bail!(StoreError::NotFound(id));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&credential)?);
        return Ok(());
    }

    println!("ID:       {}", credential.id);
    println!("Name:     {}", credential.name);
    println!("Password: {}", credential.value);
    println!("URL:      {}", credential.url.as_deref().unwrap_or("--"));
    println!("Created:  {}", format::timestamp(credential.created_at));
    Ok(())
}
