//! Command-line interface for the exchange explorer
//!
//! Lists and searches the exchange catalog and exports flowcharts as SVG.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::colorizer::{error_text, format_exchange, highlight_count};
use exchange_explorer::catalog::{match_summary, Listing};
use exchange_explorer::core::logging::init_logging;
use exchange_explorer::viewer::{SvgDownload, ViewerState};
use exchange_explorer::{filter, Direction, ExchangesResponse, Explorer, ExplorerConfig};

/// Exchange Explorer - browse message exchanges and their flowcharts
#[derive(Parser)]
#[command(name = "exchange-explorer")]
#[command(about = "List message exchanges and export their flowcharts as SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the backend API (overrides EXPLORER_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Serve a built-in catalog instead of calling the backend
    #[arg(long, global = true)]
    pub mock: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List exchanges, optionally filtered by a search term
    List {
        /// Case-insensitive substring to filter by
        #[arg(short, long)]
        search: Option<String>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Fetch, render and save the flowchart of one exchange
    Flowchart {
        /// Exchange name, e.g. moirai.topic.database.clone
        exchange: String,

        /// Layout direction of the flowchart
        #[arg(short, long, value_enum, default_value_t = DirectionChoice::Lr)]
        direction: DirectionChoice,

        /// Output directory or file (use - for stdout); defaults to the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Filter a saved `/exchanges` response offline
    Filter {
        /// Search term
        term: String,

        /// Input file holding the response JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Flowchart layout direction
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum DirectionChoice {
    /// Left to right
    #[default]
    Lr,
    /// Top down
    Td,
}

impl From<DirectionChoice> for Direction {
    fn from(value: DirectionChoice) -> Self {
        match value {
            DirectionChoice::Lr => Direction::LR,
            DirectionChoice::Td => Direction::TD,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct ExplorerApp {
    config: ExplorerConfig,
}

impl ExplorerApp {
    /// Create an application with configuration read from the environment
    pub fn new() -> Self {
        Self::with_config(ExplorerConfig::from_env())
    }

    pub fn with_config(config: ExplorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Apply global CLI flags on top of the environment configuration
    fn apply_flags(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.config.base_url = url.clone();
        }
        if cli.mock {
            self.config.mock_mode = true;
        }
    }

    /// Run the application with the given CLI arguments
    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag defaults
        let log_level_str = std::env::var("EXPLORER_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));
        let log_format_str = std::env::var("EXPLORER_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.apply_flags(&cli);
        debug!(
            base_url = %self.config.base_url,
            mock = self.config.mock_mode,
            "Configuration resolved"
        );

        if cli.verbose {
            eprintln!("Exchange Explorer v{}", env!("CARGO_PKG_VERSION"));
            if self.config.mock_mode {
                eprintln!("Using built-in mock catalog");
            } else {
                eprintln!("API: {}", self.config.base_url);
            }
        }

        match cli.command {
            Commands::List {
                search,
                json,
                color,
            } => self.list_command(search, json, color).await,
            Commands::Flowchart {
                exchange,
                direction,
                output,
                color,
            } => {
                self.flowchart_command(exchange, direction.into(), output, color, cli.verbose)
                    .await
            }
            Commands::Filter { term, input } => self.filter_command(&term, input),
        }
    }

    /// Handle the list command
    async fn list_command(
        &self,
        search: Option<String>,
        json: bool,
        color: ColorChoice,
    ) -> Result<()> {
        let mut explorer = Explorer::from_config(&self.config)?;
        debug!(api = explorer.api_name(), "Loading catalog");
        let loaded = explorer.load_catalog().await;
        if let Some(term) = search {
            explorer.set_search_term(term);
        }

        if json {
            loaded?;
            let catalog = explorer.catalog();
            let header = catalog.header().unwrap_or_default();
            let value = serde_json::json!({
                "prefix": header.0,
                "count": header.1,
                "search": catalog.search_term(),
                "matches": catalog.filtered(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        let color = should_colorize(None, color);
        let text = render_listing(&explorer, color);
        self.write_output(None, &text)?;
        loaded?;
        Ok(())
    }

    /// Handle the flowchart command
    async fn flowchart_command(
        &self,
        exchange: String,
        direction: Direction,
        output: Option<PathBuf>,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let mut explorer = Explorer::from_config(&self.config)?;
        explorer.viewer_mut().set_direction(direction);

        if verbose {
            eprintln!("Fetching {} flowchart for {}", direction, exchange);
        }
        let result = explorer.open_exchange(&exchange).await;

        let color = should_colorize(None, color);
        for notification in explorer.take_notifications() {
            eprintln!(
                "{} {}",
                error_text(&format!("{}:", notification.title), color),
                notification.description
            );
        }

        match explorer.viewer().state() {
            ViewerState::Rendered { kind, .. } => {
                if verbose {
                    eprintln!("Rendered {} payload", kind.as_str());
                }
                let download = explorer
                    .viewer()
                    .download()
                    .ok_or_else(|| anyhow!("No rendered diagram to save"))?;
                self.save_download(&download, output)
            }
            ViewerState::RenderFailed {
                message, source, ..
            } => {
                // Fetch failures were already reported as notifications
                if let Some(source) = source {
                    eprintln!("{}", error_text(message, color));
                    eprintln!("{}", source);
                }
                Err(result.err().map(|e| anyhow!(e)).unwrap_or_else(|| anyhow!(message.clone())))
            }
            other => Err(anyhow!("Viewer ended in unexpected state: {}", other.name())),
        }
    }

    /// Handle the filter command
    fn filter_command(&self, term: &str, input: Option<PathBuf>) -> Result<()> {
        let content = self.read_input(input)?;
        let response: ExchangesResponse =
            serde_json::from_str(&content).context("Input is not an /exchanges response")?;
        let matches = filter(&response.data, term);
        self.write_output(None, &matches.join("\n"))
    }

    /// Save the SVG download to a directory, a file or stdout
    pub fn save_download(&self, download: &SvgDownload, output: Option<PathBuf>) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() == "-" => {
                self.write_output(None, &download.contents)
            }
            Some(path) if path.is_dir() => {
                let saved = download.save_in(&path)?;
                eprintln!("Saved {}", saved.display());
                Ok(())
            }
            Some(path) => {
                download.save_as(&path).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                eprintln!("Saved {}", path.display());
                Ok(())
            }
            None => {
                let saved = download.save_in(Path::new("."))?;
                eprintln!("Saved {}", saved.display());
                Ok(())
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ExplorerApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Text form of the explorer's listing state
pub fn render_listing(explorer: &Explorer, color: bool) -> String {
    let mut out = String::new();
    if let Some((prefix, count)) = explorer.catalog().header() {
        out.push_str(&format!("{} · {} exchanges\n\n", prefix, count));
    }

    match explorer.listing() {
        Listing::Loading => out.push_str("Loading exchanges...\n"),
        Listing::Failed { message } => {
            out.push_str(&error_text(&message, color));
            out.push_str("\nRun the command again to retry.\n");
        }
        Listing::Empty(kind) => {
            out.push_str(kind.title());
            out.push('\n');
            out.push_str(&kind.detail());
            out.push('\n');
        }
        Listing::Exchanges { items, matches } => {
            if matches.is_some() {
                let summary = match_summary(items.len())
                    .replacen(&items.len().to_string(), &highlight_count(items.len(), color), 1);
                out.push_str(&summary);
                out.push_str("\n\n");
            }
            for (index, name) in items.iter().enumerate() {
                out.push_str(&format_exchange(name, index, color));
                out.push('\n');
            }
        }
    }
    out
}

/// Determine if output should be colorized
fn should_colorize(output: Option<&Path>, color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return false;
            }
            match output {
                None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                Some(p) if p.to_str() == Some("-") => {
                    crossterm::tty::IsTty::is_tty(&std::io::stdout())
                }
                Some(_) => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use exchange_explorer::api::MockApiClient;
    use exchange_explorer::viewer::UnavailableRenderer;
    use exchange_explorer::ExchangeCatalog;
    use tempfile::tempdir;

    fn mock_explorer(exchanges: Vec<&str>) -> Explorer {
        let catalog = ExchangeCatalog::new(
            "moirai",
            exchanges.into_iter().map(String::from).collect(),
        );
        Explorer::new(
            Box::new(MockApiClient::with_catalog(catalog)),
            Box::new(UnavailableRenderer),
        )
    }

    #[test]
    fn test_cli_parsing_list_command() {
        let args = vec!["exchange-explorer", "list", "--search", "database", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::List {
                search,
                json,
                color,
            } => {
                assert_eq!(search.as_deref(), Some("database"));
                assert!(json);
                assert_eq!(color, ColorChoice::Auto);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_parsing_flowchart_command() {
        let args = vec![
            "exchange-explorer",
            "flowchart",
            "moirai.topic.database.clone",
            "--direction",
            "td",
            "--output",
            "out",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Flowchart {
                exchange,
                direction,
                output,
                ..
            } => {
                assert_eq!(exchange, "moirai.topic.database.clone");
                assert_eq!(direction, DirectionChoice::Td);
                assert_eq!(output.unwrap().to_string_lossy(), "out");
            }
            _ => panic!("Expected Flowchart command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let args = vec![
            "exchange-explorer",
            "list",
            "--mock",
            "--api-url",
            "http://example.test/api",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.mock);
        assert_eq!(cli.api_url.as_deref(), Some("http://example.test/api"));
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_direction_choice_conversion() {
        assert_eq!(Direction::from(DirectionChoice::Lr), Direction::LR);
        assert_eq!(Direction::from(DirectionChoice::Td), Direction::TD);
        assert_eq!(DirectionChoice::default(), DirectionChoice::Lr);
    }

    #[test]
    fn test_apply_flags_overrides_config() {
        let cli = Cli::try_parse_from(vec![
            "exchange-explorer",
            "--mock",
            "--api-url",
            "http://other/api",
            "list",
        ])
        .unwrap();
        let mut app = ExplorerApp::with_config(ExplorerConfig::default());
        app.apply_flags(&cli);
        assert!(app.config().mock_mode);
        assert_eq!(app.config().base_url, "http://other/api");
    }

    #[tokio::test]
    async fn test_render_listing_with_matches() {
        let mut explorer = mock_explorer(vec!["moirai.topic.database.clone", "moirai.topic.user.created"]);
        explorer.load_catalog().await.unwrap();
        explorer.set_search_term("database");

        let text = render_listing(&explorer, false);
        assert!(text.starts_with("moirai · 2 exchanges"));
        assert!(text.contains("Found 1 exchange"));
        assert!(text.contains("moirai.topic  database.clone"));
        assert!(!text.contains("user.created"));
    }

    #[tokio::test]
    async fn test_render_listing_no_results() {
        let mut explorer = mock_explorer(vec!["moirai.topic.database.clone"]);
        explorer.load_catalog().await.unwrap();
        explorer.set_search_term("zzz");

        let text = render_listing(&explorer, false);
        assert!(text.contains("No exchanges found"));
        assert!(text.contains("No results for \"zzz\""));
    }

    #[tokio::test]
    async fn test_render_listing_no_data() {
        let mut explorer = mock_explorer(vec![]);
        explorer.load_catalog().await.unwrap();
        let text = render_listing(&explorer, false);
        assert!(text.contains("No exchanges available"));
        assert!(text.contains("Check your API connection"));
    }

    #[test]
    fn test_read_input_from_file() {
        let app = ExplorerApp::with_config(ExplorerConfig::default());
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("exchanges.json");
        fs::write(&file_path, "{}").unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_save_download_to_directory() {
        let app = ExplorerApp::with_config(ExplorerConfig::default());
        let dir = tempdir().unwrap();
        let download = SvgDownload::new("moirai.topic.database.clone", "<svg></svg>");

        app.save_download(&download, Some(dir.path().to_path_buf())).unwrap();

        let saved = dir.path().join("moirai.topic.database.clone.svg");
        assert_eq!(fs::read_to_string(saved).unwrap(), "<svg></svg>");
    }

    #[test]
    fn test_save_download_to_file() {
        let app = ExplorerApp::with_config(ExplorerConfig::default());
        let dir = tempdir().unwrap();
        let target = dir.path().join("chart.svg");
        let download = SvgDownload::new("x", "<svg/>");

        app.save_download(&download, Some(target.clone())).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "<svg/>");
    }

    #[test]
    fn test_write_output_to_file() {
        let app = ExplorerApp::with_config(ExplorerConfig::default());
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.txt");

        app.write_output(Some(file_path.clone()), "a\nb").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "a\nb");
    }

    #[test]
    fn test_should_colorize_explicit_choices() {
        assert!(should_colorize(None, ColorChoice::Always));
        assert!(!should_colorize(None, ColorChoice::Never));
        assert!(!should_colorize(Some(Path::new("out.txt")), ColorChoice::Auto));
    }
}
