//! ArticleKit CLI - serve or run news article extraction

mod server;

use anyhow::{Context, Result};
use articlekit::{Extraction, ExtractionRequest, Extractor, ParserBackend};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ArticleKit - extract news articles from web pages
#[derive(Parser, Debug)]
#[command(name = "articlekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind
        #[arg(long, env = "ARTICLEKIT_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(long, env = "ARTICLEKIT_PORT", default_value_t = 5000)]
        port: u16,

        /// Verbose logging
        #[arg(long, env = "ARTICLEKIT_DEBUG")]
        debug: bool,
    },
    /// Extract one URL and print the result as JSON
    Extract {
        /// URL to extract
        url: String,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Reject pages with malformed markup
        #[arg(long)]
        strict: bool,
    },
    /// Print the JSON Schema of a successful extraction
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            debug: verbose,
        } => {
            init_tracing(verbose);
            let addr = SocketAddr::new(host, port);
            tracing::info!(%addr, verbose, "Starting ArticleKit server");
            server::run(addr, Extractor::default()).await
        }
        Commands::Extract {
            url,
            user_agent,
            strict,
        } => {
            init_tracing(false);
            run_extract(&url, user_agent, strict).await
        }
        Commands::Schema => {
            let schema = serde_json::to_string_pretty(&Extractor::default().output_schema())
                .context("Failed to serialize schema")?;
            writeln_safe(&schema);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "debug,articlekit=debug"
    } else {
        "info,articlekit=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run_extract(url: &str, user_agent: Option<String>, strict: bool) -> Result<()> {
    let mut builder = Extractor::builder();
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    if strict {
        builder = builder.parser(ParserBackend::Strict);
    }
    let extractor = builder.build();

    match extractor.extract(ExtractionRequest::new(url)).await {
        Ok(extraction) => {
            writeln_safe(&format_extraction(&extraction)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn format_extraction(extraction: &Extraction) -> Result<String> {
    serde_json::to_string_pretty(extraction).context("Failed to serialize extraction")
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use articlekit::ErrorResult;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["articlekit", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port, .. } => {
                assert_eq!(host.to_string(), "127.0.0.1");
                assert_eq!(port, 5000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "articlekit", "serve", "--host", "0.0.0.0", "--port", "8080", "--debug",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve { host, port, debug } => {
                assert_eq!(host.to_string(), "0.0.0.0");
                assert_eq!(port, 8080);
                assert!(debug);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from([
            "articlekit",
            "extract",
            "https://example.com/a",
            "--user-agent",
            "Bot/1.0",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                url,
                user_agent,
                strict,
            } => {
                assert_eq!(url, "https://example.com/a");
                assert_eq!(user_agent.as_deref(), Some("Bot/1.0"));
                assert!(strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["articlekit", "serve", "--port", "99999"]).is_err());
    }

    #[test]
    fn test_format_error_extraction() {
        let extraction = Extraction::Failed(ErrorResult::new("Error extracting article: x"));
        let output = format_extraction(&extraction).unwrap();
        assert!(output.contains(r#""error": "Error extracting article: x""#));
    }
}
