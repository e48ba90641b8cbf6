//! Integration tests for the HC-08 driver.
//!
//! Run against a module wired to a USB serial adapter.

mod device;
mod tests;

use clap::Parser;
use colored::Colorize;

use device::{open_module, resolve_port};
use tests::{print_results, run_all_tests};

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "Integration tests for the HC-08 driver")]
struct Args {
    /// Serial port the module is attached to (use "auto" to auto-detect)
    #[arg(short, long, default_value = "auto")]
    port: String,

    /// Baud rate the module is configured for
    #[arg(short, long, default_value = "9600")]
    baud: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let port = resolve_port(&args.port)?;

    println!("{}", "HC-08 Integration Tests".bold());
    println!("Port: {}", port);
    println!("Baud: {}", args.baud);
    println!();

    println!("Opening module...");
    let mut module = open_module(&port, args.baud)?;
    module.transport_mut().clear_buffer()?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = run_all_tests(&mut module);
    print_results(&results);

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
