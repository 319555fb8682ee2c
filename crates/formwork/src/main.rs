//! Interactive driver for the Formwork forms.
//!
//! Stands in for the rendering collaborator: reads line commands from stdin,
//! forwards them into the form model, and prints the derived state the UI
//! would render.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use formwork::{LoginForm, Role, SignupForm};
use formwork_logging::{drafts_dir, init_logging, LogConfig};
use formwork_model::Form;
use formwork_store::{DraftStore, FileDraftStore, MemoryDraftStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "formwork", about = "Drive a Formwork form from the terminal")]
struct Args {
    /// Which form to drive.
    #[arg(long, value_enum, default_value_t = FormChoice::Login)]
    form: FormChoice,

    /// Directory for persisted drafts (defaults to ~/.formwork/drafts).
    #[arg(long)]
    drafts: Option<PathBuf>,

    /// Keep drafts in memory only.
    #[arg(long)]
    ephemeral: bool,

    /// Mirror the log file to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormChoice {
    Login,
    Signup,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig {
        app_name: "formwork",
        verbose: args.verbose,
    })?;

    let store: Arc<dyn DraftStore> = if args.ephemeral {
        Arc::new(MemoryDraftStore::new())
    } else {
        let dir = args.drafts.clone().unwrap_or_else(drafts_dir);
        Arc::new(FileDraftStore::new(dir).context("Failed to open draft store")?)
    };

    match args.form {
        FormChoice::Login => drive_login(store).await,
        FormChoice::Signup => drive_signup().await,
    }
}

async fn drive_login(store: Arc<dyn DraftStore>) -> Result<()> {
    let mut login = LoginForm::new(store).context("Failed to build login form")?;
    println!("login form ready; commands: set <path> <value> | touch <path> | show | submit | reset | quit");
    print_state(login.form());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match split_command(line) {
            ("submit", _) => match login.submit() {
                Some(snapshot) => println!("submitted: {}", snapshot.to_json()),
                None => println!("submit blocked: form is {}", login.form().validity()),
            },
            ("reset", _) => {
                login.form().reset()?;
                println!("reset");
            }
            ("quit", _) => break,
            ("", _) => {}
            _ => {
                if handle_common(login.form(), line)? {
                    println!(
                        "email error shown: {} | password error shown: {}",
                        login.email_is_invalid(),
                        login.password_is_invalid()
                    );
                }
            }
        }
    }
    login.destroy();
    Ok(())
}

async fn drive_signup() -> Result<()> {
    let mut signup = SignupForm::new().context("Failed to build signup form")?;
    println!(
        "signup form ready; roles: {}; commands: set <path> <value> | touch <path> | show | submit | reset | quit",
        Role::ALL.map(Role::as_str).join(", ")
    );
    print_state(signup.form());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match split_command(line) {
            ("submit", _) => match signup.submit() {
                Some(snapshot) => println!("submitted: {}", snapshot.to_json()),
                None => println!("submit blocked: form is {}", signup.form().validity()),
            },
            ("reset", _) => {
                signup.reset()?;
                println!("reset");
            }
            ("quit", _) => break,
            ("", _) => {}
            _ => {
                handle_common(signup.form(), line)?;
            }
        }
    }
    signup.destroy();
    Ok(())
}

/// Commands shared by both forms. Returns whether the command was recognized.
fn handle_common(form: &Form, line: &str) -> Result<bool> {
    match split_command(line) {
        ("show", _) => {
            print_state(form);
            Ok(true)
        }
        ("touch", path) if !path.is_empty() => {
            form.mark_touched(path)?;
            println!("touched {path}");
            Ok(true)
        }
        ("set", rest) => {
            let Some((path, value)) = rest.split_once(' ') else {
                println!("usage: set <path> <value>");
                return Ok(true);
            };
            let outcome = match value {
                "true" => form.set_flag(path, true),
                "false" => form.set_flag(path, false),
                text => form.set_text(path, text),
            };
            match outcome {
                Ok(()) => println!("{path} = {value} ({})", form.validity()),
                Err(err) => println!("rejected: {err}"),
            }
            Ok(true)
        }
        (command, _) => {
            println!("unknown command: {command}");
            Ok(false)
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

fn print_state(form: &Form) {
    println!("value: {}", form.value().to_json());
    println!("validity: {}", form.validity());
}
