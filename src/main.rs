//! Speedtest Dashboard - Main CLI Application
//!
//! Loads measurement history from the speedtest admin API, triggers on-demand
//! tests, saves the test interval and renders the admin page.

use clap::Parser;
use speedtest_dashboard::{
    app::App,
    cli::Cli,
    config::ConfigParser,
    error::{AppError, ErrorReporter, Result},
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli.clone()).await {
        let use_color = ConfigParser::new(cli.clone()).error_colors();
        ErrorReporter::new(use_color, cli.verbose).report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    if cli.should_show_topic_help() || cli.command.is_none() {
        println!("{}", cli.display_help());
        return Ok(());
    }

    if cli.debug {
        eprintln!("{}", cli.get_config_summary());
    }

    App::new(cli)?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - --base-url must start with http:// or https://");
            eprintln!("  - --api-path must start with '/'");
        }
        AppError::Network(_) | AppError::HttpRequest(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the admin server is running");
            eprintln!("  - Verify --base-url and --api-path");
            eprintln!("  - Run 'stdash --help-topic api' for the expected endpoints");
        }
        AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Timeout help:");
            eprintln!("  - A speedtest can take a minute or more; raise --timeout");
        }
        _ => {}
    }
}
