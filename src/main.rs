use clap::Parser;
use databridges_labels::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                match signal {
                    Ok(()) => Err(anyhow::anyhow!("Interrupted by user")),
                    Err(e) => Err(anyhow::Error::new(e).context("Failed to listen for CTRL+C")),
                }
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Data Bridges Labels - Questionnaire Label Resolver");
    println!("==================================================");
    println!();
    println!("Resolve column and choice labels from questionnaire definitions");
    println!("and apply them to coded survey datasets.");
    println!();
    println!("USAGE:");
    println!("    databridges-labels <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    column-labels   Print the column-label dictionary of a questionnaire");
    println!("    value-labels    Print the per-field choice labels of a questionnaire");
    println!("    choices         Print every choice list in long format");
    println!("    map             Replace coded values of a CSV dataset with their labels");
    println!("    country-code    Look up the admin-0 code of an ISO3 country code");
    println!("    help            Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Column labels as JSON:");
    println!("    databridges-labels column-labels form.json --format json");
    println!();
    println!("    # Label a dataset and coerce household size to integers:");
    println!("    databridges-labels map survey.csv form.json -o labelled.csv --numeric HHSize");
    println!();
    println!("For detailed help on any command, use:");
    println!("    databridges-labels <COMMAND> --help");
}
