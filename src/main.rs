use std::{path::PathBuf, sync::Arc};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use scoutlist::{cli, config, error, types::PkceToken, types::PlaylistRef};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your playlists to pick sources and excludes
    Playlists(PlaylistsOptions),

    /// Create a scoutlist from the most recently added tracks
    Scout(ScoutOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ScoutOptions {
    /// Number of tracks in the scoutlist
    #[clap(long, short = 'n')]
    pub length: Option<usize>,

    /// Path of the scout configuration (defaults to the local data dir)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Source playlist as owner:playlist_id; can be repeated
    #[clap(
        long = "source",
        value_parser = config::parse_playlist_ref,
        action = ArgAction::Append
    )]
    pub sources: Vec<PlaylistRef>,

    /// Exclude playlist as owner:playlist_id; can be repeated
    #[clap(
        long = "exclude",
        value_parser = config::parse_playlist_ref,
        action = ArgAction::Append
    )]
    pub excludes: Vec<PlaylistRef>,

    /// Make the new playlist public
    #[clap(long)]
    pub public: bool,

    /// Print the selection without creating a playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Playlists(opt) => cli::playlists(opt.search).await,
        Command::Scout(opt) => {
            cli::scout(cli::ScoutArgs {
                length: opt.length,
                config: opt.config,
                sources: opt.sources,
                excludes: opt.excludes,
                public: opt.public,
                dry_run: opt.dry_run,
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
