// djforge CLI entry point

use clap::Parser;

use djforge_cli::Cli;

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        tracing::Level::ERROR
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = djforge_cli::run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
