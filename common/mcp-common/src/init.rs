//! Process startup for stdio MCP servers
//!
//! stdout belongs to the protocol, so everything here logs to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` is honoured; `crate_name` is additionally enabled at `info`.
/// `LOG_FORMAT=json` switches to one JSON object per line.
///
/// # Arguments
///
/// * `crate_name` - Target name as it appears in `RUST_LOG`, e.g. `fs_navigator_mcp`
///
/// # Errors
///
/// Fails if `crate_name` is not a valid filter directive or a global
/// subscriber is already installed.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("fs_navigator_mcp")?;
/// tracing::info!("Root context ready");
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(format!("{crate_name}=info").parse()?);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Generate `main` for a stdio MCP server.
///
/// `$build` is evaluated after tracing is up and must produce a
/// `Result<Server, E>` where `E` converts into `anyhow::Error`, so that
/// configuration failures are logged and reported instead of panicking.
///
/// ```rust,ignore
/// mcp_common::serve_stdio!("fs_navigator_mcp", Cli::parse().into_server());
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($crate_name:expr, $build:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = match $build {
                Ok(server) => server,
                Err(e) => {
                    let e: anyhow::Error = e.into();
                    tracing::error!("Failed to start: {:#}", e);
                    return Err(e);
                }
            };

            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
