//! Coinboard CLI
//!
//! Command-line front end for the Coinboard dashboard:
//! - Show price cards and 7-day charts
//! - Manage the watchlist
//! - Run an interactive dashboard session
//! - Initialize and seed the watchlist database

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use coinboard::config::{generate_default_config, Config};
use coinboard::dashboard::{
    CardTarget, ChartRenderer, ChartSurface, DashboardClient, Notifier, PriceCards,
    SvgChartSurface, TerminalCards, TerminalChartSurface, TerminalNotifier, TerminalWatchlist,
    WatchlistController, WatchlistForm, WatchlistTarget,
};
use coinboard::logging;
use coinboard::store::WatchlistStore;

#[derive(Parser)]
#[command(name = "coinboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cryptocurrency price dashboard with a watchlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: dashboard.api_url from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show price cards
    Prices {
        /// Coins to quote (comma-separated)
        #[arg(short, long)]
        coins: Option<String>,
        /// Reference currency
        #[arg(long)]
        vs: Option<String>,
    },

    /// Show the last 7 days of a coin
    Chart {
        /// Coin identifier
        coin: String,
        /// Reference currency
        #[arg(long)]
        vs: Option<String>,
        /// Write an SVG file instead of printing a sparkline
        #[arg(long)]
        svg: bool,
        /// Directory for SVG files (default: dashboard.chart_dir from config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },

    /// Interactive dashboard session
    Dashboard {
        /// Initial coins (comma-separated)
        #[arg(short, long)]
        coins: Option<String>,
        /// Initial reference currency
        #[arg(long)]
        vs: Option<String>,
    },

    /// Manage the watchlist database directly
    Db {
        #[command(subcommand)]
        action: DbAction,
        /// Database path (default: store.db_path from config)
        #[arg(long, global = true)]
        db: Option<PathBuf>,
    },

    /// Show backend status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum WatchlistAction {
    /// List entries
    List,
    /// Add an entry
    Add {
        coin_id: String,
        name: String,
        symbol: String,
        /// Price target
        #[arg(short, long)]
        target: Option<String>,
        /// Enable the price-target alert
        #[arg(short, long)]
        alert: bool,
    },
    /// Remove an entry
    Rm { coin_id: String },
}

#[derive(Subcommand)]
pub enum DbAction {
    /// Create the schema
    Init,
    /// Insert the default coins, skipping existing ones
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = Config::locate(cli.config.as_deref());
    let config = Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    logging::init(&config.logging, "coinboard=warn");

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    let color = !cli.no_color && io::stdout().is_terminal();
    let api_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.dashboard.api_url.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier::new(io::stderr(), color));

    match cli.command {
        Commands::Prices { coins, vs } => {
            let client = DashboardClient::new(&api_url)?;
            let coins = coins.unwrap_or_else(|| config.dashboard.coins.clone());
            let vs = vs.unwrap_or_else(|| config.dashboard.vs.clone());

            let mut cards = PriceCards::new(client, TerminalCards::new(io::stdout(), color), notifier);
            if !cards.refresh(&coins, &vs).await {
                std::process::exit(1);
            }
        }

        Commands::Chart {
            coin,
            vs,
            svg,
            out_dir,
        } => {
            let client = DashboardClient::new(&api_url)?;
            let vs = vs.unwrap_or_else(|| config.dashboard.vs.clone());

            if svg {
                let dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.dashboard.chart_dir));
                let mut chart = ChartRenderer::new(client, SvgChartSurface::new(dir), notifier);
                if !chart.render(&coin, &vs).await {
                    std::process::exit(1);
                }
                if let Some(drawn) = chart.current() {
                    println!("{}", chart.surface().title());
                    println!("Wrote {}", drawn.path.display());
                }
            } else {
                let surface = TerminalChartSurface::new(io::stdout(), color);
                let mut chart = ChartRenderer::new(client, surface, notifier);
                if !chart.render(&coin, &vs).await {
                    std::process::exit(1);
                }
            }
        }

        Commands::Watchlist { action } => {
            let client = DashboardClient::new(&api_url)?;
            let mut watchlist =
                WatchlistController::new(client, TerminalWatchlist::new(io::stdout()), notifier);

            let ok = match action {
                WatchlistAction::List => watchlist.refresh().await,
                WatchlistAction::Add {
                    coin_id,
                    name,
                    symbol,
                    target,
                    alert,
                } => {
                    let mut form = WatchlistForm {
                        coin_id,
                        name,
                        symbol,
                        target_price: target.unwrap_or_default(),
                        alert_enabled: alert,
                    };
                    watchlist.add(&mut form).await
                }
                WatchlistAction::Rm { coin_id } => watchlist.delete(&coin_id).await,
            };

            if !ok {
                std::process::exit(1);
            }
        }

        Commands::Dashboard { coins, vs } => {
            let client = DashboardClient::new(&api_url)?;
            let mut session = Session {
                coins: coins.unwrap_or_else(|| config.dashboard.coins.clone()),
                vs: vs.unwrap_or_else(|| config.dashboard.vs.clone()),
                cards: PriceCards::new(
                    client.clone(),
                    TerminalCards::new(io::stdout(), color),
                    notifier.clone(),
                ),
                chart: ChartRenderer::new(
                    client.clone(),
                    TerminalChartSurface::new(io::stdout(), color),
                    notifier.clone(),
                ),
                watchlist: WatchlistController::new(
                    client,
                    TerminalWatchlist::new(io::stdout()),
                    notifier,
                ),
            };
            session.run().await?;
        }

        Commands::Db { action, db } => {
            let path = db.unwrap_or_else(|| PathBuf::from(&config.store.db_path));
            let store = WatchlistStore::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            match action {
                DbAction::Init => {
                    store.init()?;
                    println!("Initialized {}", path.display());
                }
                DbAction::Seed => {
                    let added = store.seed()?;
                    println!("Seeded {} entries into {}", added, path.display());
                }
            }
        }

        Commands::Status => {
            let client = DashboardClient::new(&api_url)?;
            match client.health().await {
                Ok(health) => {
                    println!("Coinboard v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API: {} (server v{})", api_url, health.version);
                    println!("Status: {}", if health.ok { "ok" } else { "degraded" });
                    println!("Uptime: {}", format_duration(health.uptime_seconds));
                }
                Err(e) => {
                    eprintln!("Cannot connect to Coinboard API at {}", api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin coinboard");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Components of an interactive dashboard session
struct Session<C, S, W>
where
    C: CardTarget,
    S: ChartSurface,
    W: WatchlistTarget,
{
    coins: String,
    vs: String,
    cards: PriceCards<C>,
    chart: ChartRenderer<S>,
    watchlist: WatchlistController<W>,
}

impl<S, W> Session<TerminalCards<io::Stdout>, S, W>
where
    S: ChartSurface,
    W: WatchlistTarget,
{
    async fn run(&mut self) -> anyhow::Result<()> {
        self.cards.refresh(&self.coins, &self.vs).await;
        self.watchlist.refresh().await;
        println!();
        println!("Type 'help' for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let words: Vec<&str> = line.split_whitespace().collect();

            match words.as_slice() {
                [] => {}
                ["quit"] | ["exit"] | ["q"] => break,
                ["help"] | ["?"] => print_help(),
                ["refresh", rest @ ..] => {
                    if let Some(coins) = rest.first() {
                        self.coins = coins.to_string();
                    }
                    if let Some(vs) = rest.get(1) {
                        self.vs = vs.to_string();
                    }
                    self.cards.refresh(&self.coins, &self.vs).await;
                }
                ["chart", which] => {
                    let (coin, vs) = self.chart_target(which);
                    self.chart.render(&coin, &vs).await;
                }
                ["chart", coin, vs] => {
                    self.chart.render(coin, vs).await;
                }
                ["list"] => {
                    self.watchlist.refresh().await;
                }
                ["add", coin_id, name, symbol, rest @ ..] => {
                    let mut form = WatchlistForm {
                        coin_id: coin_id.to_string(),
                        name: name.to_string(),
                        symbol: symbol.to_string(),
                        target_price: rest.first().map(|t| t.to_string()).unwrap_or_default(),
                        alert_enabled: rest.get(1).map(|a| is_yes(a)).unwrap_or(false),
                    };
                    self.watchlist.add(&mut form).await;
                }
                ["rm", coin_id] => {
                    self.watchlist.delete(coin_id).await;
                }
                _ => println!("Unknown command: {} (type 'help')", line.trim()),
            }
        }

        self.chart.clear();
        Ok(())
    }

    /// Resolve `chart <n>` against the numbered cards, else treat as a coin id
    fn chart_target(&self, which: &str) -> (String, String) {
        let actions = self.cards.target().actions();
        which
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| actions.get(i))
            .map(|a| (a.coin_id.clone(), a.vs.clone()))
            .unwrap_or_else(|| (which.to_string(), self.vs.clone()))
    }
}

fn print_help() {
    println!("Commands:");
    println!("  refresh [coins] [vs]                  Reload price cards");
    println!("  chart <n|coin> [vs]                   Show 7 days for card n or a coin");
    println!("  list                                  Show the watchlist");
    println!("  add <coin_id> <name> <symbol> [target] [alert]");
    println!("                                        Add to the watchlist (alert: on/off)");
    println!("  rm <coin_id>                          Remove from the watchlist");
    println!("  help                                  Show this help");
    println!("  quit                                  Leave the dashboard");
}

fn is_yes(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "on" | "yes" | "true" | "1" | "y")
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_path(args: &[&str]) -> Option<PathBuf> {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Db { db, .. } => db,
            _ => panic!("expected db command"),
        }
    }

    #[test]
    fn test_db_path_accepted_before_or_after_action() {
        assert_eq!(
            db_path(&["coinboard-cli", "db", "--db", "/tmp/a.db", "init"]),
            Some(PathBuf::from("/tmp/a.db"))
        );
        assert_eq!(
            db_path(&["coinboard-cli", "db", "seed", "--db", "/tmp/b.db"]),
            Some(PathBuf::from("/tmp/b.db"))
        );
        assert_eq!(db_path(&["coinboard-cli", "db", "init"]), None);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("On"));
        assert!(is_yes("y"));
        assert!(!is_yes("off"));
    }
}
