use crate::commands::CommandResult;
use favly_core::config::{AppConfig, LoadOptions};
use favly_core::domain::client::{NewClient, Role};
use favly_core::password::hash_password;
use favly_db::repositories::{ClientRepository, SqlClientRepository};
use favly_db::{connect_with_settings, migrations};

pub fn run(name: &str, email: &str, password: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "create-admin",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "create-admin",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let email = email.trim().to_ascii_lowercase();
    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let clients = SqlClientRepository::new(pool.clone());
        let outcome = seed_admin(&clients, name, &email, password).await;

        pool.close().await;
        outcome
    });

    match result {
        Ok(id) => CommandResult::success(
            "create-admin",
            format!("admin account created for {email} (client id {id})"),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("create-admin", error_class, message, exit_code)
        }
    }
}

async fn seed_admin(
    clients: &SqlClientRepository,
    name: &str,
    email: &str,
    password: &str,
) -> Result<i64, (&'static str, String, u8)> {
    let existing = clients
        .find_by_email(email)
        .await
        .map_err(|error| ("client_lookup", error.to_string(), 6u8))?;
    if existing.is_some() {
        return Err(("duplicate_email", format!("a client with email {email} already exists"), 7));
    }

    let password_hash =
        hash_password(password).map_err(|error| ("password_hash", error.to_string(), 8u8))?;

    let created = clients
        .create(NewClient {
            name: name.trim().to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await
        .map_err(|error| ("client_insert", error.to_string(), 9u8))?;

    Ok(created.id.0)
}
