//! Main entry point for the war server and its load client.

use anyhow::{Context, bail};
use log::info;
use pico_args::Arguments;
use std::net::SocketAddr;
use std::time::Duration;

use war_server::client;
use war_server::config::ServerConfig;
use war_server::config::game::DEFAULT_PLAY_TIMEOUT_SECS;
use war_server::config::matchmaking::DEFAULT_QUEUE_TIMEOUT_SECS;
use war_server::config::server::{CLIENT_CONCURRENCY, DEFAULT_HOST, DEFAULT_PORT};
use war_server::server::listener;

const HELP: &str = "\
Serve or play the war card game

USAGE:
  war-server server  [HOST] [PORT] [OPTIONS]
  war-server client  [HOST] [PORT]
  war-server clients [HOST] [PORT] COUNT

OPTIONS:
  --timeouts               Enable both timeouts with their defaults (300s queue, 60s play)
  --queue-timeout SECS     Close connections left unpaired this long
  --play-timeout  SECS     Abort games whose round stalls this long

FLAGS:
  -h, --help               Print help information

HOST and PORT default to 127.0.0.1 and 4444. Log level comes from RUST_LOG.
";

enum Mode {
    Server(ServerConfig),
    Client(SocketAddr),
    Clients(SocketAddr, usize),
}

async fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("could not resolve {host}:{port}"))?
        .next()
        .with_context(|| format!("{host}:{port} resolved to no address"))
}

async fn parse_args(mut pargs: Arguments) -> anyhow::Result<Mode> {
    let mode: String = pargs.free_from_str().context("missing mode")?;
    let defaults = pargs.contains("--timeouts");
    let queue_timeout = pargs
        .opt_value_from_str::<_, u64>("--queue-timeout")?
        .or(defaults.then_some(DEFAULT_QUEUE_TIMEOUT_SECS));
    let play_timeout = pargs
        .opt_value_from_str::<_, u64>("--play-timeout")?
        .or(defaults.then_some(DEFAULT_PLAY_TIMEOUT_SECS));

    let free = pargs.finish();
    let free: Vec<String> = free
        .into_iter()
        .map(|arg| arg.into_string().map_err(|arg| anyhow::anyhow!("argument {arg:?} is not UTF-8")))
        .collect::<Result<_, _>>()?;

    // Positional arguments: [HOST] [PORT] and, for `clients`, a trailing COUNT.
    let (endpoint, count) = match mode.as_str() {
        "clients" => match free.split_last() {
            Some((count, rest)) => (rest, Some(count.parse::<usize>().context("COUNT must be a number")?)),
            None => bail!("clients mode needs a COUNT"),
        },
        "server" | "client" => (free.as_slice(), None),
        other => bail!("unknown mode {other:?}, expected server, client or clients"),
    };
    let (host, port) = match endpoint {
        [] => (DEFAULT_HOST, DEFAULT_PORT),
        [host] => (host.as_str(), DEFAULT_PORT),
        [host, port] => (host.as_str(), port.parse().context("PORT must be a number")?),
        _ => bail!("too many arguments"),
    };
    let addr = resolve(host, port).await?;

    Ok(match (mode.as_str(), count) {
        ("server", _) => {
            let mut config = ServerConfig::new(addr);
            if let Some(secs) = queue_timeout {
                config = config.with_queue_timeout(Duration::from_secs(secs));
            }
            if let Some(secs) = play_timeout {
                config = config.with_play_timeout(Duration::from_secs(secs));
            }
            Mode::Server(config)
        }
        ("clients", Some(count)) => Mode::Clients(addr, count),
        _ => Mode::Client(addr),
    })
}

#[actix::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    match parse_args(pargs).await? {
        Mode::Server(config) => {
            info!(
                "[Main] Starting war server on {} (queue timeout {:?}, play timeout {:?})",
                config.bind, config.queue_timeout, config.play_timeout
            );
            tokio::select! {
                result = listener::run(config) => result.context("server stopped")?,
                result = tokio::signal::ctrl_c() => {
                    result.context("could not listen for Ctrl-C")?;
                    info!("[Main] Shutting down");
                }
            }
        }
        Mode::Client(addr) => {
            client::play(addr).await.context("client game failed")?;
        }
        Mode::Clients(addr, count) => {
            let completed = client::play_many(addr, count, CLIENT_CONCURRENCY).await;
            println!("{completed}/{count} clients completed a game");
        }
    }
    Ok(())
}
