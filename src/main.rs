use adb_host_client::{AdbClient, AdbError, HostOutcome};
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adb-host-client")]
#[command(about = "Client for the ADB server's host protocol")]
struct Cli {
    /// ADB server host address.
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// ADB server port.
    #[arg(short = 'P', long, default_value_t = 5037)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get ADB server version.
    Version,

    /// List connected devices.
    Devices {
        /// Include product, model, device, and transport id.
        #[arg(short, long)]
        long: bool,
    },

    /// Connect to a networked device.
    Connect {
        /// Device host address.
        host: String,
        /// Device port.
        #[arg(default_value_t = 5555)]
        port: u16,
    },

    /// Disconnect a networked device.
    Disconnect {
        /// Device serial (for networked devices, `host:port`).
        serial: String,
    },

    /// Stop the ADB server.
    Kill,

    /// Follow device connect/disconnect events until interrupted.
    Track,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let client = AdbClient::with_address(&cli.host, cli.port);

    match command {
        Commands::Version => {
            let version = client.server_version().await?;
            println!("ADB server version: {}", version);
        }
        Commands::Devices { long } => {
            let devices = if long {
                client.devices_long().await?
            } else {
                client.devices().await?
            };
            if devices.is_empty() {
                println!("No devices connected.");
            } else if long {
                for d in &devices {
                    println!(
                        "{:<24} {:<14} product:{} model:{} device:{} transport_id:{}",
                        d.serial, d.state, d.product, d.model, d.device, d.transport_id
                    );
                }
            } else {
                println!("{:<24} State", "Serial");
                for d in &devices {
                    println!("{:<24} {}", d.serial, d.state);
                }
            }
        }
        Commands::Connect { host, port } => match client.connect(&host, port).await? {
            HostOutcome::AlreadyConnected => println!("Already connected to {}:{}", host, port),
            _ => println!("Connected to {}:{}", host, port),
        },
        Commands::Disconnect { serial } => {
            client.disconnect(&serial).await?;
            println!("Disconnected {}", serial);
        }
        Commands::Kill => {
            client.kill().await?;
            println!("ADB server stopped.");
        }
        Commands::Track => {
            let mut tracker = client.track_devices().await?;
            loop {
                match tracker.next_event().await {
                    Ok(Some(devices)) => {
                        if devices.is_empty() {
                            println!("(no devices)");
                        } else {
                            for d in &devices {
                                println!("{:<24} {}", d.serial, d.state);
                            }
                        }
                        println!("---");
                    }
                    Ok(None) => break,
                    Err(e @ AdbError::Io(_)) => {
                        eprintln!("Track error: {}", e);
                        break;
                    }
                    Err(e) => eprintln!("Track error: {}", e),
                }
            }
        }
    }

    Ok(())
}
