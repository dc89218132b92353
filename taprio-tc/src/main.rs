use std::{
    fs,
    io::{self, Read as _},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use rtnetlink::packet_route::tc::TcHandle;
use taprio_tc::{QdiscTaprioRequest, QdiscTarget, args, parse_handle};

/// Encode and decode the netlink options of a taprio qdisc.
///
/// Example:
///   taprio encode --dev-index 2 --handle 100: -- num_tc 2 map 0 0 1 1 \
///          queues 1@0 1@1 clockid CLOCK_TAI sched-row 0 S 0x3 1000
#[derive(Debug, Parser)]
#[command(name = "taprio", about = "Encode and decode taprio qdisc options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse taprio options and encode them.
    Encode {
        /// Index of the interface the qdisc is installed on.
        #[arg(long, default_value_t = 0)]
        dev_index: i32,

        /// Parent handle of the qdisc.
        #[arg(long, default_value = "root", value_parser = parse_handle)]
        parent: TcHandle,

        /// Handle of the qdisc.
        #[arg(long, default_value = "none", value_parser = parse_handle)]
        handle: TcHandle,

        /// Replace an existing qdisc instead of failing if one exists.
        #[arg(long)]
        replace: bool,

        /// Write the raw bytes here instead of a hex dump to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the whole `RTM_NEWQDISC` netlink message instead of just the options buffer.
        #[arg(long)]
        message: bool,

        /// Also print the configuration as `tc qdisc show` would.
        #[arg(long)]
        show: bool,

        /// The taprio options, as given to `tc qdisc add ... taprio`.
        #[arg(last = true)]
        options: Vec<String>,
    },
    /// Decode a raw options buffer and print it (`-` reads stdin).
    Decode { input: PathBuf },
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Args(#[from] args::Error),
    #[error(transparent)]
    Wire(#[from] taprio_wire::Error),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

fn main() -> ExitCode {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Args(e)) if e.wants_usage() => {
            if !matches!(e, args::Error::Help) {
                eprintln!("{e}");
            }
            eprintln!("{}", args::USAGE);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Encode { dev_index, parent, handle, replace, output, message, show, options } => {
            let config = args::parse(&options)?;
            let target = QdiscTarget::new(dev_index).with_parent(parent).with_handle(handle);
            let request = QdiscTaprioRequest::new(target, &config)?.with_replace(replace);

            let buf = if message { request.to_message_bytes() } else { request.options.to_vec() };
            tracing::info!(len = buf.len(), message, "taprio options encoded");

            match output {
                Some(path) => {
                    fs::write(&path, &buf).map_err(|source| Error::Write { path, source })?
                }
                None => println!("{}", hex(&buf)),
            }

            if show {
                println!("{config}");
            }
        }
        Command::Decode { input } => {
            let buf = if input.as_os_str() == "-" {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(|source| Error::Read { path: input.clone(), source })?;
                buf
            } else {
                fs::read(&input).map_err(|source| Error::Read { path: input.clone(), source })?
            };

            println!("{}", taprio_wire::decode(&buf)?);
        }
    }

    Ok(())
}

fn hex(buf: &[u8]) -> String {
    buf.iter().map(|b| format!("{b:02x}")).collect()
}
