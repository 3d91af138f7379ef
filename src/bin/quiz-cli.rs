use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quiz-cli")]
#[command(about = "Command-line client for the math quiz relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5003")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the contract address and signing wallet
    Configure {
        contract_address: String,
        /// Path to the wallet PEM file
        #[arg(long)]
        pem: PathBuf,
    },
    /// Generate a test and print its operations
    Generate { sender_address: String },
    /// Print the operations of a generate transaction
    Operations { tx_hash: String },
    /// Submit five answers
    Submit {
        sender_address: String,
        #[arg(num_args = 5, required = true, allow_negative_numbers = true)]
        answers: Vec<i8>,
    },
    /// Count correct answers of a submit transaction
    Correct { tx_hash: String },
    /// Query a user's accumulated score
    Score {
        contract_address: String,
        user_address: String,
    },
    /// Check relay status
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Configure { contract_address, pem } => {
            let wallet_pem = std::fs::read_to_string(&pem)?;
            client
                .post(format!("{}/set_config", base))
                .json(&json!({ "contract_address": contract_address, "wallet_pem": wallet_pem }))
                .send()
                .await?
        }
        Commands::Generate { sender_address } => {
            client
                .post(format!("{}/generate_and_get_operations", base))
                .json(&json!({ "sender_address": sender_address }))
                .send()
                .await?
        }
        Commands::Operations { tx_hash } => {
            client
                .get(format!("{}/get_operations", base))
                .query(&[("tx_hash", tx_hash)])
                .send()
                .await?
        }
        Commands::Submit { sender_address, answers } => {
            client
                .post(format!("{}/submit_test", base))
                .json(&json!({ "sender_address": sender_address, "answers": answers }))
                .send()
                .await?
        }
        Commands::Correct { tx_hash } => {
            client
                .get(format!("{}/get_correct_answers", base))
                .query(&[("tx_hash", tx_hash)])
                .send()
                .await?
        }
        Commands::Score { contract_address, user_address } => {
            client
                .post(format!("{}/get_test_results", base))
                .json(&json!({ "contract_address": contract_address, "user_address": user_address }))
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
