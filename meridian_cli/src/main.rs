use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::get_matrix::GetMatrixArgs;

mod get_matrix;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a travel matrix between waypoints
    #[command(visible_alias = "m")]
    Matrix {
        #[command(flatten)]
        args: GetMatrixArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Matrix { args }) => get_matrix::run(args).await?,
        None => {
            // Handle no command provided
        }
    }

    Ok(())
}
