use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the Guardian Gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "GATEWAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness
    Health,
    /// Register a new user
    Register { username: String, password: String },
    /// Log in and print the issued token
    Login { username: String, password: String },
    /// POST a JSON body to a proxied endpoint (e.g. /api/qa)
    Call {
        path: String,
        /// Inline JSON body
        #[arg(short, long, conflicts_with = "file")]
        data: Option<String>,
        /// Read the JSON body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Register { username, password } => {
            client
                .post(format!("{}/api/register", base))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?
        }
        Commands::Login { username, password } => {
            client
                .post(format!("{}/api/login", base))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?
        }
        Commands::Call { path, data, file } => {
            let body = call_body(data, file.as_deref())?;
            let path = endpoint_path(path);
            client
                .post(format!("{}{}", base, path))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

/// Leading slash is optional on the command line: `api/qa` and `/api/qa` agree.
fn endpoint_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Inline data wins over a file; with neither, send an empty JSON object.
fn call_body(data: Option<String>, file: Option<&Path>) -> std::io::Result<String> {
    match (data, file) {
        (Some(data), _) => Ok(data),
        (None, Some(file)) => std::fs::read_to_string(file),
        (None, None) => Ok("{}".to_string()),
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if status.is_success() {
        println!("{}", status);
    } else {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text.trim_end()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path() {
        assert_eq!(endpoint_path("api/qa".into()), "/api/qa");
        assert_eq!(endpoint_path("/api/qa".into()), "/api/qa");
    }

    #[test]
    fn test_call_body_sources() {
        assert_eq!(call_body(None, None).unwrap(), "{}");

        let file =
            std::env::temp_dir().join(format!("gateway-cli-body-{}.json", std::process::id()));
        std::fs::write(&file, r#"{"text":"from file"}"#).unwrap();

        assert_eq!(
            call_body(None, Some(&file)).unwrap(),
            r#"{"text":"from file"}"#
        );
        assert_eq!(
            call_body(Some(r#"{"text":"inline"}"#.into()), Some(&file)).unwrap(),
            r#"{"text":"inline"}"#
        );

        std::fs::remove_file(&file).unwrap();
        assert!(call_body(None, Some(&file)).is_err());
    }

    #[test]
    fn test_data_conflicts_with_file() {
        let parsed = Cli::try_parse_from([
            "gateway-cli", "call", "/api/qa", "--data", "{}", "--file", "body.json",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["gateway-cli", "call", "api/qa"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Call { path, data: None, file: None } if path == "api/qa"
        ));
    }
}
