//! Citation Verifier MCP Server: entry point.

use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use citation_verifier_mcp::config::{ConfigOverrides, ServerConfig};
use citation_verifier_mcp::probe;
use citation_verifier_mcp::protocol::ProtocolHandler;
use citation_verifier_mcp::tools::ToolRegistry;
use citation_verifier_mcp::transport::StdioTransport;
use citation_verifier_mcp::verification::VerificationAdapter;

#[derive(Parser)]
#[command(
    name = "citation-verifier-mcp",
    about = "MCP server for citation verification — detect hallucinated DOIs via Crossref",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Also reads LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings for the verification backend.
#[derive(Args, Clone, Default)]
struct VerifierArgs {
    /// Crossref API base URL. Also reads CROSSREF_API_URL.
    #[arg(long)]
    crossref_url: Option<String>,

    /// Contact email for the Crossref polite pool. Also reads CROSSREF_MAILTO.
    #[arg(long)]
    mailto: Option<String>,

    /// Per-request timeout for Crossref lookups. Also reads CROSSREF_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve {
        #[command(flatten)]
        verifier: VerifierArgs,
    },

    /// Start MCP server over HTTP (POST, WebSocket at /mcp, SSE at /sse).
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen host. Also reads HOST.
        #[arg(long)]
        host: Option<String>,

        /// Listen port. Also reads PORT.
        #[arg(long)]
        port: Option<u16>,

        /// Seconds between SSE keepalive events. Also reads SSE_KEEPALIVE_SECS.
        #[arg(long)]
        keepalive_secs: Option<u64>,

        #[command(flatten)]
        verifier: VerifierArgs,
    },

    /// Verify a single DOI and print the result.
    Verify {
        /// The DOI to verify (URL prefixes are stripped).
        doi: String,

        /// Print the raw verification record as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        verifier: VerifierArgs,
    },

    /// Smoke-test a running server over WebSocket.
    Probe {
        /// WebSocket endpoint of the server.
        #[arg(long, default_value = probe::DEFAULT_PROBE_URL)]
        url: String,

        /// DOI expected to verify.
        #[arg(long, default_value = probe::DEFAULT_PROBE_DOI)]
        doi: String,

        /// DOI expected to fail verification.
        #[arg(long, default_value = probe::DEFAULT_INVALID_DOI)]
        invalid_doi: String,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   citation-verifier-mcp completions bash > ~/.local/share/bash-completion/completions/citation-verifier-mcp
    ///   citation-verifier-mcp completions zsh > ~/.zfunc/_citation-verifier-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl VerifierArgs {
    fn into_overrides(self, log_level: Option<String>) -> ConfigOverrides {
        ConfigOverrides {
            log_level,
            crossref_url: self.crossref_url,
            mailto: self.mailto,
            timeout_secs: self.timeout_secs,
            ..ConfigOverrides::default()
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve {
        verifier: VerifierArgs::default(),
    });

    match command {
        Commands::Serve { verifier } => {
            let config = ServerConfig::resolve(verifier.into_overrides(cli.log_level));
            init_tracing(&config.log_level);

            let adapter = Arc::new(VerificationAdapter::connect(config.crossref()));
            let handler = ProtocolHandler::new(adapter);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp {
            host,
            port,
            keepalive_secs,
            verifier,
        } => {
            use citation_verifier_mcp::transport::HttpTransport;

            let overrides = ConfigOverrides {
                host,
                port,
                keepalive_secs,
                ..verifier.into_overrides(cli.log_level)
            };
            let config = ServerConfig::resolve(overrides);
            init_tracing(&config.log_level);

            tracing::info!("Citation Verifier MCP server");
            tracing::info!("Crossref: {}", config.crossref_url);

            let adapter = Arc::new(VerificationAdapter::connect(config.crossref()));
            let handler = ProtocolHandler::new(adapter);
            let transport = HttpTransport::new(handler, config.keepalive_interval());
            transport.run(&config.bind_addr()).await?;
        }

        Commands::Verify {
            doi,
            json,
            verifier,
        } => {
            let config = ServerConfig::resolve(verifier.into_overrides(cli.log_level));
            init_tracing(&config.log_level);

            let adapter = VerificationAdapter::connect(config.crossref());
            let result = adapter.verify(&doi).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result.to_record())?);
            } else {
                println!("{}", VerificationAdapter::format(&result));
            }
            if !result.is_verified() {
                std::process::exit(1);
            }
        }

        Commands::Probe {
            url,
            doi,
            invalid_doi,
        } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("warn"));

            println!("Probing {url}");
            let report = probe::run(&url, &doi, &invalid_doi).await;
            for check in &report.checks {
                let mark = if check.passed { "PASS" } else { "FAIL" };
                println!("  [{mark}] {:<20} {}", check.name, check.detail);
            }
            println!("{}/{} checks passed", report.passed(), report.checks.len());
            if !report.all_passed() {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            let capabilities = citation_verifier_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "citation-verifier-mcp",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
