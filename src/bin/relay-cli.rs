use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use frame_relay::routing::encode_target;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Client CLI for a running Frame Relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a target is frameable (POST /check)
    Check {
        target: String,
        /// Custom header names to look for (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
    /// Same as check, through the permissive endpoint (POST /broken)
    Broken { target: String },
    /// Print the compact path encoding of a target
    Encode { target: String },
    /// Fetch a target through the relay and print status and headers
    Fetch {
        target: String,
        /// Use the plain URL form instead of the compact encoding
        #[arg(long)]
        plain: bool,
    },
    /// Relay health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Check { target, headers } => {
            let res = client
                .post(format!("{}/check", base))
                .json(&check_body(&target, &headers))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Broken { target } => {
            let res = client
                .post(format!("{}/broken", base))
                .json(&json!({ "url": target }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Encode { target } => {
            println!("{}", encode_target(&target));
        }
        Commands::Fetch { target, plain } => {
            let segment = if plain { target } else { encode_target(&target) };
            let res = client.get(format!("{}/proxy/{}", base, segment)).send().await?;
            println!("{}", res.status());
            for (name, value) in res.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
            let bytes = res.bytes().await?;
            println!("\n({} bytes)", bytes.len());
        }
        Commands::Health => {
            let res = client.get(format!("{}/", base)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

/// `/check` body; `customHeaders` only when names were given.
fn check_body(target: &str, headers: &[String]) -> Value {
    let mut body = json!({ "url": target });
    if !headers.is_empty() {
        body["customHeaders"] = json!(headers);
    }
    body
}
