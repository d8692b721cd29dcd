use serde_json::json;

use crate::auth::PasswordEncoder;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

pub fn hash(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let encoder = PasswordEncoder::new(config::config().security.bcrypt_cost);
    let hash = encoder.encode(password)?;

    match output_format {
        OutputFormat::Json => output_success(&output_format, "Password hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
