use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::auth::PasswordEncoder;
use crate::cli::utils::{connect, output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::User;
use crate::database::PgUserRepository;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user with a bcrypt-hashed password")]
    Add {
        #[arg(long, help = "Login name")]
        name: String,

        #[arg(long, help = "Plaintext password (hashed before storage)")]
        password: String,

        #[arg(long = "role", help = "Role to grant, repeatable")]
        roles: Vec<String>,
    },

    #[command(about = "Grant a role to an existing user")]
    Grant {
        #[arg(long, help = "Login name")]
        name: String,

        #[arg(long, help = "Role name")]
        role: String,
    },

    #[command(about = "List users and their roles")]
    List,
}

fn user_json(user: &User) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "roles": user.role_names().collect::<Vec<_>>(),
    })
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    let service = UserService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        PasswordEncoder::new(config::config().security.bcrypt_cost),
    );

    let result = match cmd {
        UserCommands::Add { name, password, roles } => {
            let user = service.create_user(&name, &password, &roles).await?;
            output_success(
                &output_format,
                &format!("Created user '{}'", user.name),
                Some(json!({ "user": user_json(&user) })),
            )
        }
        UserCommands::Grant { name, role } => {
            let user = service.grant_role(&name, &role).await?;
            output_success(
                &output_format,
                &format!("Granted '{}' to '{}'", role, user.name),
                Some(json!({ "user": user_json(&user) })),
            )
        }
        UserCommands::List => {
            let users = service.list_users().await?;
            if users.is_empty() {
                output_empty_collection(&output_format, "users", "No users found")
            } else {
                match output_format {
                    OutputFormat::Json => {
                        let users: Vec<_> = users.iter().map(user_json).collect();
                        println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
                    }
                    OutputFormat::Text => {
                        println!("{:<6} {:<30} {}", "ID", "NAME", "ROLES");
                        println!("{}", "-".repeat(60));
                        for user in &users {
                            let roles: Vec<_> = user.role_names().collect();
                            println!("{:<6} {:<30} {}", user.id, user.name, roles.join(","));
                        }
                    }
                }
                Ok(())
            }
        }
    };

    pool.close().await;
    result
}
