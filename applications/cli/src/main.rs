/// Cadence - command line playback queue
use cadence_cli::{CadenceConfig, Session};
use cadence_metadata::LoftyTrackFactory;
use cadence_storage::SqliteQueueStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence playback queue", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the queue with the given files and start playing
    Play {
        /// Shuffle the new queue
        #[arg(short, long)]
        shuffle: bool,
        /// Audio files in album order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Queue files to play after the current track
    Enqueue {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
    /// Remove files from the queue
    Remove {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Shuffle the queue
    Shuffle,
    /// Restore album order
    Unshuffle,
    /// Set the position of the playing track
    Seek {
        /// Position in seconds
        seconds: u64,
    },
    /// Show the queue
    Show,
    /// Empty the queue
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CadenceConfig::load(cli.config.as_deref())?;
    config.storage.ensure_database_dir()?;

    // Initialize database
    let pool = cadence_storage::create_pool(&config.storage.database_url).await?;
    cadence_storage::run_migrations(&pool).await?;
    tracing::debug!("Database ready at {}", config.storage.database_url);

    let store = Arc::new(SqliteQueueStore::new(pool));
    let factory = Arc::new(LoftyTrackFactory::new());
    let mut session = Session::open(store, factory, config.playback.clone()).await;

    let result = run(&mut session, cli.command).await;
    session.close().await;
    result
}

async fn run(session: &mut Session, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Play { shuffle, paths } => {
            session.play(&paths, shuffle).await?;
            print_playing(session);
        }
        Commands::Enqueue { paths } => {
            session.enqueue(&paths).await?;
            println!("Queued {} track(s)", paths.len());
        }
        Commands::Next => {
            session.next();
            print_playing(session);
        }
        Commands::Previous => {
            session.previous();
            print_playing(session);
        }
        Commands::Remove { paths } => {
            let removed = session.remove(&paths);
            println!("Removed {} track(s)", removed);
        }
        Commands::Shuffle => {
            session.shuffle();
            print!("{}", session.render());
        }
        Commands::Unshuffle => {
            session.unshuffle();
            print!("{}", session.render());
        }
        Commands::Seek { seconds } => {
            session.seek(seconds)?;
            print_playing(session);
        }
        Commands::Show => {
            print!("{}", session.render());
        }
        Commands::Clear => {
            session.clear();
            println!("Queue cleared");
        }
    }

    Ok(())
}

fn print_playing(session: &Session) {
    match session.playing() {
        Some(track) => println!(
            "Playing: {} ({}s)",
            track.title,
            session.progress_seconds()
        ),
        None => println!("End of queue"),
    }
}
