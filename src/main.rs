use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_recommender::{Library, SessionController, SessionError, Settings};

#[derive(Parser)]
#[command(name = "book-recommender")]
#[command(about = "Rate books and get recommendations from like-minded members")]
#[command(version = book_recommender::VERSION)]
struct Cli {
    /// Book file: one `author,title,year` line per book
    #[arg(short, long)]
    books: Option<PathBuf>,

    /// Ratings file: a member name line followed by that member's ratings line
    #[arg(short, long)]
    ratings: Option<PathBuf>,

    /// Maximum number of books each member can rate
    #[arg(short, long)]
    max_books: Option<usize>,

    /// JSON settings file (flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Logs go to stderr so stdout carries only the console dialogue
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "book_recommender=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    }
    .with_overrides(cli.books, cli.ratings, cli.max_books);

    tracing::info!(?settings, "starting");

    let stdin = io::stdin();
    let mut session = SessionController::new(
        Library::new(settings.max_books),
        stdin.lock(),
        io::stdout(),
    );

    match session.load_data(&settings) {
        Ok(()) => session.run()?,
        Err(SessionError::InputClosed) => tracing::info!("no input, nothing to do"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
