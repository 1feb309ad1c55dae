use clap::{Parser, Subcommand};
use serde_json::Value;

use remote_config_middleware::{ClientConfig, RemoteConfigClient};

#[derive(Parser)]
#[command(name = "remote-config-cli")]
#[command(about = "Inspect a config server or a running host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one refresh cycle against a config server and print the result
    Fetch {
        #[arg(short, long, default_value = "http://localhost:8080")]
        server: String,

        #[arg(short, long)]
        app_id: String,

        #[arg(short, long, default_value = "default")]
        cluster: String,

        /// Per-namespace timeout in seconds
        #[arg(short, long, default_value_t = 6)]
        timeout: u64,

        #[arg(required = true)]
        namespaces: Vec<String>,
    },
    /// Print the configuration a running host currently serves
    Inspect {
        #[arg(short, long, default_value = "http://localhost:12580")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            server,
            app_id,
            cluster,
            timeout,
            namespaces,
        } => {
            let mut config = ClientConfig::new(app_id);
            config.config_server_url = server;
            config.cluster = cluster;
            config.request_timeout_secs = timeout;

            let client = RemoteConfigClient::new(config)?;
            let report = client.refresh(&namespaces).await?;
            eprintln!(
                "replaced: {}, absent: {}",
                report.replaced, report.absent
            );
            println!("{}", serde_json::to_string_pretty(&client.snapshot().to_json())?);
        }
        Commands::Inspect { url } => {
            let res = reqwest::get(format!("{}/config", url.trim_end_matches('/'))).await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: host returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
