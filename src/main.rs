use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use leaderboard::data::DataSource;
use leaderboard::ranking::{PointsMode, SortKey};
use leaderboard::state::{Action, GameState};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive dashboard (default if no subcommand)
    Dashboard,
    /// Print the leaderboard
    Leaderboard {
        /// Sort key (defaults to the configured sort)
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Winner, podium and statistics
    Results,
    /// Team rosters
    Teams {
        /// Filter by team, captain or member name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List achievements and their points
    Achievements,
    /// List challenges between teams
    Challenges,
    /// List team photos
    Photos,
    /// Open a photo in browser by its index number
    OpenPhoto {
        /// Index number of the photo to open (1-based, as shown in photos)
        index: usize,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "leaderboard")]
#[command(about = "Sales competition leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/leaderboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Game data file or http(s) URL (overrides config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Take points from the data file or derive them from rules (overrides config)
    #[arg(long, global = true, value_enum)]
    points_mode: Option<PointsMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        match leaderboard::config::init::run_init_wizard(config_path) {
            Ok(()) => std::process::exit(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let is_dashboard = matches!(command, Commands::Dashboard);
    let log_guard = leaderboard::logging::init_tracing(cli.verbose, is_dashboard);
    let start_time = Instant::now();

    // Load config
    let mut config = match leaderboard::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Some(mode) = cli.points_mode {
        config.points.mode = mode;
    }
    if let Commands::Leaderboard { sort: Some(sort), .. } = &command {
        config.sort = *sort;
    }
    if let Some(data) = &cli.data {
        config.data = Some(data.clone());
    }
    tracing::debug!(mode = ?config.points.mode, sort = %config.sort, "effective config");

    // Validate config at startup
    if let Err(errors) = leaderboard::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let source: DataSource = match config.data_source() {
        Some(s) => s,
        None => {
            eprintln!("No game data configured.");
            eprintln!("Pass --data <file-or-url>, or add it to ~/.config/leaderboard/config.yaml:");
            eprintln!("  data: https://example.com/data.json");
            eprintln!("Run `leaderboard init` to create a config interactively.");
            std::process::exit(EXIT_CONFIG);
        }
    };

    if is_dashboard {
        let app = leaderboard::tui::App::new_loading(config, source);
        let result = leaderboard::tui::run_tui(app).await;
        // Flush the log file before exit skips destructors
        drop(log_guard);
        if let Err(e) = result {
            eprintln!("Dashboard error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let data = match leaderboard::data::load_game_data(&source).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let mut state = GameState::new(data, config.points.clone(), config.sort);
    let use_colors = leaderboard::output::should_use_colors();
    let currency = config.currency.as_str();

    // Route based on subcommand
    match command {
        Commands::Leaderboard { format, .. } => {
            let rows = leaderboard::output::leaderboard_rows(&state);
            let output = match format {
                OutputFormat::Table => {
                    leaderboard::output::format_leaderboard(&rows, currency, use_colors)
                }
                OutputFormat::Tsv => leaderboard::output::format_tsv(&rows),
                OutputFormat::Json => match leaderboard::output::format_json(&state) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to serialize leaderboard: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            };
            println!("{}", output);
        }
        Commands::Results => {
            println!(
                "{}",
                leaderboard::output::format_results(&state, currency, use_colors)
            );
        }
        Commands::Teams { search } => {
            if let Some(query) = search {
                state.dispatch(Action::Search(query));
            }
            let teams = state.visible_teams();
            println!(
                "{}",
                leaderboard::output::format_teams(&teams, currency, use_colors)
            );
        }
        Commands::Achievements => {
            println!(
                "{}",
                leaderboard::output::format_achievements(&state.data.achievements, use_colors)
            );
        }
        Commands::Challenges => {
            println!("{}", leaderboard::output::format_challenges(&state.data));
        }
        Commands::Photos => {
            println!("{}", leaderboard::output::format_photos(&state.data));
        }
        Commands::OpenPhoto { index } => {
            let photos = &state.data.photos;
            // Validate index bounds (1-based)
            if index < 1 || index > photos.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    photos.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let photo = &photos[index - 1];
            if let Err(e) = leaderboard::browser::open_url(&photo.url) {
                eprintln!("Failed to open browser: {}", e);
                std::process::exit(EXIT_FAILURE);
            }

            println!(
                "Opening photo #{} ({}) in browser: {}",
                index,
                state.data.team_label(&photo.team),
                photo.url
            );
        }
        Commands::Dashboard | Commands::Init => {}
    }

    if state.any_incomplete() {
        eprintln!("* some points were derived without the data their rules need");
    }

    if cli.verbose {
        eprintln!(
            "Loaded {} teams from {} in {:?}",
            state.data.teams.len(),
            source,
            start_time.elapsed()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
