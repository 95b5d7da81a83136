//! Pomador: run Pomar suites from the command line
//!
//! ## Usage
//!
//! ```bash
//! pomador list --scenarios            # Show the catalog
//! pomador run -s booker --format json # Run one suite
//! pomador run -f tag:smoke -j 4       # Smoke scenarios of every suite
//! pomador config contact-list         # Resolved configuration
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pomador::{
    check, list_suites, render_json, render_table, resolved_config, Cli, CliConfig, CliError,
    CliResult, Commands, ListArgs, RunArgs, SuiteRunner, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // before logging, so RUST_LOG may come from .env
    let dotenv = pomar::config::load_dotenv();
    pomar::logging::init(
        pomar::logging::filter_for_verbosity(cli.verbose, cli.quiet),
        cli.log_format.into(),
    )?;
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => tracing::debug!("no .env found"),
        Err(err) => tracing::warn!(error = %err, "ignoring .env"),
    }

    let config = build_config(&cli);

    match cli.command {
        Commands::List(args) => run_list(&args),
        Commands::Run(args) => run_suites(config, args),
        Commands::Config(args) => {
            let resolved = resolved_config(&args.suite)?;
            println!("{}", render_json(&resolved)?);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(cli.color.into())
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let listings = list_suites(args.scenarios);
    if args.json {
        println!("{}", render_json(&listings)?);
    } else {
        print!("{}", render_table(&listings));
    }
    Ok(())
}

fn run_suites(config: CliConfig, args: RunArgs) -> CliResult<()> {
    let config = config
        .with_workers(args.workers)
        .with_retries(args.retries)
        .with_scenario_timeout(args.timeout.map(Duration::from_millis))
        .with_fail_fast(args.fail_fast)
        .with_filter(args.filter)
        .with_seed(args.seed)
        .with_headed(args.headed)
        .with_output_dir(args.output)
        .with_formats(args.formats.into_iter().map(Into::into).collect());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Io)?;
    runtime.block_on(async {
        let mut runner = SuiteRunner::new(config);
        let report = runner.run(&args.suites).await?;
        check(&report)
    })
}
