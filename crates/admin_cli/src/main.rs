use std::{error::Error, io::Write};

use accounts::{Accounts, AccountsError, AdminCreationForm, AdminPasswordChangeForm, FormErrors};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "accounts_admin")]
#[command(about = "Admin utilities for the accounts store (bootstrap users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./accounts.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user through the admin creation form.
    Create(UserCreateArgs),
    /// Replace a user's password.
    SetPassword(UserEmailArgs),
    /// List every user.
    List,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    /// Grant admin rights.
    #[arg(long)]
    admin: bool,
    /// Create the account disabled.
    #[arg(long)]
    inactive: bool,
}

#[derive(Args, Debug)]
struct UserEmailArgs {
    #[arg(long)]
    email: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

/// Prompt for a password and its confirmation.
///
/// Matching is checked by the form, like on the API.
fn prompt_password_pair() -> Result<(String, String), Box<dyn Error + Send + Sync>> {
    let password1 = prompt_password("Password: ")?;
    let password2 = prompt_password("Password confirmation: ")?;
    Ok((password1, password2))
}

fn print_form_errors(errors: &FormErrors) {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
}

/// Retry the prompt on validation errors, up to three times.
async fn with_password_attempts<T, F, Fut>(
    mut attempt: F,
) -> Result<T, Box<dyn Error + Send + Sync>>
where
    F: FnMut(String, String) -> Fut,
    Fut: std::future::Future<Output = Result<T, AccountsError>>,
{
    for _ in 0..3 {
        let (password1, password2) = prompt_password_pair()?;
        match attempt(password1, password2).await {
            Ok(value) => return Ok(value),
            Err(AccountsError::Validation(errors)) => {
                print_form_errors(&errors);
                if errors.has("email") {
                    return Err("invalid email".into());
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let accounts = Accounts::builder().database(db).build()?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let admin = args.admin;
            let is_active = !args.inactive;
            let user = with_password_attempts(|password1, password2| {
                let form = AdminCreationForm {
                    email: Some(args.email.clone()),
                    password1: Some(password1),
                    password2: Some(password2),
                };
                let accounts = &accounts;
                async move {
                    let mut pending = accounts.prepare_user(&form).await?;
                    pending.admin = admin;
                    pending.is_active = is_active;
                    accounts.commit_user(pending).await
                }
            })
            .await?;

            println!("created user: {} ({})", user.email, user.id);
        }
        Command::User(User {
            command: UserCommand::SetPassword(args),
        }) => {
            let Some(user) = accounts.user_by_email(&args.email).await? else {
                eprintln!("user not found: {}", args.email);
                std::process::exit(1);
            };

            let user_id = user.id;
            with_password_attempts(|password1, password2| {
                let form = AdminPasswordChangeForm {
                    password1: Some(password1),
                    password2: Some(password2),
                };
                let accounts = &accounts;
                async move { accounts.set_password(user_id, &form).await }
            })
            .await?;

            println!("password changed: {}", user.email);
        }
        Command::User(User {
            command: UserCommand::List,
        }) => {
            for user in accounts.list_users().await? {
                println!(
                    "{}\t{}\tactive={}\tadmin={}",
                    user.id, user.email, user.is_active, user.admin
                );
            }
        }
    }

    Ok(())
}
