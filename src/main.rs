use clap::Parser;
use shesafe::cli::{
    alerts, cameras, handle_completions, handle_config_init, health, live, load_config, Cli,
    CliResult, Commands, ConfigCommands, ConnectionArgs,
};
use shesafe::config::MonitorConfig;
use shesafe::logging::init_tracing;

/// Resolve config and install logging for a backend command.
fn prepare(connection: &ConnectionArgs) -> CliResult<MonitorConfig> {
    let config = load_config(connection)?;
    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    Ok(config)
}

fn print(output: CliResult<String>) -> CliResult<()> {
    println!("{}", output?);
    Ok(())
}

async fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Alerts(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_alerts(&args, &api, &config).await)
        }
        Commands::Alert(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_alert(&args, &api, &config).await)
        }
        Commands::Delete(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_delete(&args, &api, &config).await)
        }
        Commands::Clear(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_clear(&args, &api, &config).await)
        }
        Commands::Download(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_download(&args, &api).await)
        }
        Commands::Screenshots(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_screenshots(&args, &api, &config).await)
        }
        Commands::Stats(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(alerts::handle_stats(&args, &api, &config).await)
        }
        Commands::Count(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(live::handle_count(&args, &api).await)
        }
        Commands::Gestures(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            live::handle_gestures(&args, &api, &config).await
        }
        Commands::Watch(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            live::handle_watch(&args, &api, &config).await
        }
        Commands::Health(args) => {
            let config = prepare(&args.connection)?;
            let api = shesafe::cli::connect(&config)?;
            print(health::handle_health(&args, &api).await)
        }
        Commands::Cameras(args) => {
            let config = prepare(&args.connection)?;
            print(cameras::handle_cameras(&args, &config))
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
