use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use tracing::{error, info};

use vmanage::definition::Category;

use vmanage_client::client::{Client, DEFAULT_PORT};
use vmanage_client::error::Result;
use vmanage_client::transport::{ReqwestTransport, TransportConfig};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "Retrieves the policy definitions of a vManage controller and prints them as JSON."
)]
struct Cli {
    /// Controller host name or IP address.
    #[arg(long)]
    host: String,

    /// Controller HTTPS port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Definition type to retrieve, or `all` for every published type.
    #[arg(long, default_value = "all")]
    category: Category,

    /// Accept self-signed controller certificates.
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

async fn run(cli: Cli) -> Result<String> {
    let config = TransportConfig::new()
        .timeout(Duration::from_secs(cli.timeout))
        .accept_invalid_certs(cli.insecure);

    let transport = ReqwestTransport::new(&config)?;
    let client = Client::new(cli.host, transport).port(cli.port);

    info!(
        "Retrieving `{}` policy definitions from {}",
        cli.category,
        client.base_url()
    );

    let definitions = client.policy_definitions().resolve(&cli.category).await?;

    info!("Retrieved {} policy definitions", definitions.len());

    Ok(serde_json::to_string_pretty(&definitions)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    match run(Cli::parse()).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use vmanage_client::error::ErrorKind;

    use super::{Cli, run};

    #[tokio::test]
    async fn unreachable_controller_fails() {
        let cli = Cli::try_parse_from([
            "definitions-dump",
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--category",
            "acl",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(run(cli).await.unwrap_err().kind(), ErrorKind::Transport);
    }
}
