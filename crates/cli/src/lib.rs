pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "favly",
    about = "Favly operator CLI",
    long_about = "Operate Favly database migrations and admin account seeding.",
    after_help = "Examples:\n  favly migrate\n  favly create-admin --name Root --email root@example.com --password secret123"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(name = "create-admin", about = "Seed an admin account, refusing duplicate emails")]
    CreateAdmin {
        #[arg(long, help = "Display name for the admin account")]
        name: String,
        #[arg(long, help = "Login email, unique across clients")]
        email: String,
        #[arg(long, help = "Plain-text password, hashed before storage")]
        password: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::CreateAdmin { name, email, password } => {
            commands::create_admin::run(&name, &email, &password)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
