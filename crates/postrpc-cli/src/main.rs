//! # Postrpc CLI Entry Point
//!
//! Thin binary around the postrpc library crates.
//!
//! ## Usage
//!
//! ```bash
//! # Run the demo server (echo + ping) on the default port
//! postrpc serve -p 3000
//!
//! # Run it over TLS
//! postrpc serve -p 3443 --cert cert.pem --key key.pem
//!
//! # Make an RPC call (outputs raw JSON)
//! postrpc call 127.0.0.1 3000 echo -d '{"x": 1}'
//! ```

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use serde_json::{Value, json};

use postrpc_client::{Client, ClientConfig, ClientTlsOptions};
use postrpc_server::{
    HandlerResult, RequestContext, Server, ServerConfig, TlsOptions,
};

#[derive(FromArgs)]
/// postrpc - single-method-per-call JSON RPC over HTTP(S)
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Call(CallArgs),
    Serve(ServeArgs),
}

/// Arguments for making a single RPC call.
///
/// Outputs the raw JSON response body to stdout, which makes the command
/// suitable for scripting (piping to `jq` and friends). Errors go to
/// stderr with a non-zero exit code.
#[derive(FromArgs)]
#[argh(subcommand, name = "call")]
/// call an RPC method on a server
struct CallArgs {
    /// host to connect to
    #[argh(positional)]
    host: String,

    /// port to connect to
    #[argh(positional)]
    port: u16,

    /// name of the method to call
    #[argh(positional)]
    method: String,

    /// JSON string with the call payload, defaults to {}
    #[argh(option, short = 'd', long = "data", default = "\"{}\".into()")]
    data: String,

    /// use the encrypted transport scheme
    #[argh(switch)]
    tls: bool,

    /// extra CA certificate file (PEM) to trust, implies --tls
    #[argh(option, long = "ca-file")]
    ca_file: Option<PathBuf>,
}

/// Arguments for the demo server.
///
/// Registers two methods: `echo` (returns the payload unchanged) and
/// `ping` (returns `"pong"`). Passing both `--cert` and `--key` switches
/// the listener to TLS.
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
/// run a demo postrpc server with echo and ping methods
struct ServeArgs {
    /// interface to bind, defaults to 0.0.0.0
    #[argh(option, default = "\"0.0.0.0\".into()")]
    host: String,

    /// port to bind, defaults to 3000
    #[argh(option, short = 'p', default = "3000")]
    port: u16,

    /// PEM certificate chain (enables TLS together with --key)
    #[argh(option)]
    cert: Option<PathBuf>,

    /// PEM private key
    #[argh(option)]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Keep `call` output clean for unix tool usage; only the server logs.
    if matches!(cli.command, Commands::Serve(_)) {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    match cli.command {
        Commands::Call(args) => run_call(args).await,
        Commands::Serve(args) => run_serve(args).await,
    }
}

async fn run_call(args: CallArgs) -> Result<()> {
    let data: Value = serde_json::from_str(&args.data)
        .map_err(|e| anyhow::anyhow!("invalid JSON in --data: {e}"))?;

    let mut config = ClientConfig::new(args.host, args.port);
    if let Some(ca_file) = args.ca_file {
        config = config.with_tls_options(ClientTlsOptions { ca_file: Some(ca_file) });
    } else if args.tls {
        config = config.with_tls();
    }

    let client = Client::new(config)?;
    let result = client.call(args.method, data).await?;

    println!("{}", serde_json::to_string(result.raw_data())?);

    if result.code() >= 400 {
        anyhow::bail!("server answered with status {}", result.code());
    }
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let tls_options = match (args.cert, args.key) {
        (Some(cert_path), Some(key_path)) => Some(TlsOptions { cert_path, key_path }),
        (None, None) => None,
        _ => anyhow::bail!("--cert and --key must be given together"),
    };

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        tls: tls_options.is_some(),
        tls_options,
    };

    let handle = Server::new(config)
        .handle("echo", echo)
        .handle("ping", ping)
        .listen()
        .await?;

    tracing::info!("demo server ready on {}", handle.local_addr());
    handle.join().await;
    Ok(())
}

async fn echo(ctx: RequestContext) -> HandlerResult {
    let data = ctx.raw_data().cloned().unwrap_or(Value::Null);
    Ok(ctx.reply(data))
}

async fn ping(ctx: RequestContext) -> HandlerResult {
    Ok(ctx.reply(json!("pong")))
}
