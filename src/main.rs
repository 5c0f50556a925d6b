use clap::Parser;
use statusboard::cli::{
    handle_check, handle_completions, handle_config_init, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => statusboard::cli::serve::run_serve(args).await,
        Commands::Check(args) => match handle_check(&args).await {
            Ok((output, all_ok)) => {
                println!("{}", output);
                if !all_ok {
                    std::process::exit(2);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
