//! # Gesture Link Entry Point
//!
//! `serve` runs a headless host driven by remote gesture commands; `send` is a
//! minimal gesture client for driving it by hand.

use clap::{Args as ClapArgs, Parser, Subcommand};
use gesture_link::{
    decode, GestureConfig, GestureHost, GestureResult, GroundContact, KinematicBody,
    TokenMode,
};
use log::{info, warn};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Command line arguments for the gesture link.
#[derive(Parser, Debug)]
#[command(name = "gesture-link")]
#[command(about = "Remote gesture commands over TCP translated into actor motion")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Accept gesture commands and drive a headless actor
    Serve(ServeArgs),
    /// Connect to a running host and send commands
    Send(SendArgs),
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// TCP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Split each read on whitespace instead of treating it as one command
    #[arg(long)]
    split_commands: bool,

    /// Horizontal speed while moving
    #[arg(long)]
    move_speed: Option<f32>,

    /// Upward impulse for a jump
    #[arg(long)]
    jump_force: Option<f32>,

    /// Host ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Stop after this many ticks instead of waiting for Ctrl-C
    #[arg(long)]
    ticks: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct SendArgs {
    /// Host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to connect to
    #[arg(short, long, default_value_t = gesture_link::DEFAULT_PORT)]
    port: u16,

    /// Pause between commands so each one arrives in its own read
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Terminate each command with a newline
    #[arg(long)]
    newline: bool,

    /// Commands to send, e.g. LEFT JUMP STOP
    #[arg(required = true)]
    commands: Vec<String>,
}

#[tokio::main]
async fn main() -> GestureResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting gesture-link v{}", gesture_link::VERSION);

    match args.mode {
        Mode::Serve(serve) => run_serve(serve).await,
        Mode::Send(send) => run_send(send).await,
    }
}

/// Initializes env_logger with the requested level as the default filter.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .parse_default_env()
        .format_target(false)
        .init();
}

/// Builds the effective configuration from an optional file plus flags.
fn build_config(args: &ServeArgs) -> GestureResult<GestureConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            GestureConfig::from_json_file(path)?
        }
        None => GestureConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }
    if args.split_commands {
        config.listener.token_mode = TokenMode::Delimited;
    }
    if let Some(move_speed) = args.move_speed {
        config.motion.move_speed = move_speed;
    }
    if let Some(jump_force) = args.jump_force {
        config.motion.jump_force = jump_force;
    }
    if let Some(tick_rate) = args.tick_rate {
        config.host.tick_rate_hz = tick_rate;
    }

    config.validate()?;
    Ok(config)
}

async fn run_serve(args: ServeArgs) -> GestureResult<()> {
    let config = build_config(&args)?;
    let tick_rate_hz = config.host.tick_rate_hz;

    let mut host = GestureHost::start(config)?;
    let result = run_host_loop(&mut host, tick_rate_hz, args.ticks).await;
    host.shutdown();

    let stats = host.stats();
    info!(
        "Served {} connection(s), applied {} command(s), ignored {} unknown token(s)",
        stats.connections_accepted, stats.commands_applied, stats.unknown_tokens
    );
    result
}

/// Fixed-rate loop standing in for a rendering/physics engine.
async fn run_host_loop(
    host: &mut GestureHost,
    tick_rate_hz: u32,
    max_ticks: Option<u64>,
) -> GestureResult<()> {
    let dt = 1.0 / tick_rate_hz as f32;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
    let mut body = KinematicBody::default();
    let mut last_intent = host.intent();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            interrupted = &mut ctrl_c => {
                interrupted?;
                info!("Interrupted, shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        let decision = host.tick(&mut body);
        match body.step(dt) {
            Some(GroundContact::Entered) => host.enter_ground(),
            Some(GroundContact::Exited) => host.exit_ground(),
            None => {}
        }

        if decision.impulse.is_some() {
            info!("Jump at x={:.2}", body.position.x);
        }

        let intent = host.intent();
        if intent != last_intent {
            info!(
                "Intent left={} right={} jump={} | position ({:.2}, {:.2})",
                intent.move_left(),
                intent.move_right(),
                intent.jump_requested(),
                body.position.x,
                body.position.y
            );
            last_intent = intent;
        }

        if max_ticks.is_some_and(|limit| host.ticks() >= limit) {
            info!("Reached {} ticks", host.ticks());
            break;
        }
    }

    Ok(())
}

async fn run_send(args: SendArgs) -> GestureResult<()> {
    let addr = format!("{}:{}", args.host, args.port);
    let mut stream = TcpStream::connect(&addr).await?;
    info!("Connected to {}", addr);

    let last = args.commands.len().saturating_sub(1);
    for (index, token) in args.commands.iter().enumerate() {
        if !decode(token).is_known() {
            warn!("{:?} is not a known command; the host will ignore it", token);
        }

        let mut payload = token.clone();
        if args.newline {
            payload.push('\n');
        }
        stream.write_all(payload.as_bytes()).await?;
        info!("Sent {}", token);

        if args.delay_ms > 0 && index < last {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }
    }

    stream.shutdown().await?;
    Ok(())
}
