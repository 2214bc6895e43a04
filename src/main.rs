use clap::Parser;
use tirestock::adapter::inbound::cli::command::{
    BackendCommand, Cli, ColorChoice, Commands, ConfigCommand, MovementCommand, TireCommand,
};
use tirestock::adapter::inbound::cli::output::{self, OutputConfig};
use tirestock::adapter::inbound::cli::{backend, config, history, movement, stats, tire};
use tirestock::error::Result;
use tirestock::infrastructure::config::settings::Config;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Config commands report problems with the file themselves.
    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Init(args) => config::execute_init(&cli.config, args.force),
            ConfigCommand::Validate => config::execute_validate(&cli.config),
            ConfigCommand::Show => config::execute_show(&cli.config),
        };
    }

    let mut settings = Config::load_or_default(&cli.config)?;
    match output::verbosity() {
        0 => {}
        1 => settings.logging.level = "info".into(),
        _ => settings.logging.level = "debug".into(),
    }
    settings.init_logging();
    debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Tire(command) => match command {
            TireCommand::Add(args) => tire::execute_add(&settings, args).await,
            TireCommand::Edit(args) => tire::execute_edit(&settings, args).await,
            TireCommand::Delete(args) => tire::execute_delete(&settings, args).await,
            TireCommand::Adjust(args) => tire::execute_adjust(&settings, args).await,
            TireCommand::List(args) => tire::execute_list(&settings, args).await,
        },
        Commands::Movement(MovementCommand::Add(args)) => {
            movement::execute_add(&settings, args).await
        }
        Commands::History(args) => history::execute(&settings, args).await,
        Commands::Stats(args) => stats::execute(&settings, args).await,
        Commands::Backend(command) => match command {
            BackendCommand::Status => backend::execute_status(&settings).await,
            BackendCommand::Migrate(args) => backend::execute_migrate(&settings, args).await,
        },
        Commands::Config(_) => Ok(()),
    }
}
