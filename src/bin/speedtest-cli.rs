use std::time::Duration;

use clap::{Parser, Subcommand};
use speedtest_server::client::{SpeedtestClient, Transfer};
use speedtest_server::config::schema::DEFAULT_DOWNLOAD_BYTES;

#[derive(Parser)]
#[command(name = "speedtest-cli")]
#[command(about = "Measure ping, download and upload against a speedtest-server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure round-trip latency
    Ping {
        #[arg(short, long, default_value_t = 4)]
        count: u32,
    },
    /// Measure download throughput
    Download,
    /// Measure upload throughput
    Upload {
        #[arg(short, long, default_value_t = DEFAULT_DOWNLOAD_BYTES)]
        size: usize,
    },
    /// Ping, download and upload in one go
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = SpeedtestClient::new(cli.url);

    match cli.command {
        Commands::Ping { count } => {
            let mut samples = Vec::new();
            for _ in 0..count.max(1) {
                let rtt = client.ping().await?;
                println!("Ping: {:.2} ms", millis(rtt));
                samples.push(rtt);
            }
            let min = samples.iter().min().copied().unwrap_or_default();
            let total: Duration = samples.iter().sum();
            let avg = total / samples.len() as u32;
            println!("min {:.2} ms, avg {:.2} ms", millis(min), millis(avg));
        }
        Commands::Download => {
            print_transfer("Download", client.download().await?);
        }
        Commands::Upload { size } => {
            print_transfer("Upload", client.upload(size).await?);
        }
        Commands::Run => {
            println!("Running speed test against {}...", client.base_url());
            let report = client.run().await?;
            println!("{}", report);
        }
    }

    Ok(())
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn print_transfer(label: &str, transfer: Transfer) {
    println!(
        "{}: {} bytes in {:.2} s, {:.2} Mbit/s",
        label,
        transfer.bytes,
        transfer.elapsed.as_secs_f64(),
        transfer.megabits_per_second()
    );
}
