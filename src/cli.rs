//! Command-line shell
//!
//! Every subcommand resolves its input, calls one core operation and prints
//! the formatted outcome. Errors bubble up to `run` which sets the exit code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::core::features::calculator::evaluate_expression;
use crate::core::features::graphing::{self, DEFAULT_MAX_SAMPLES, DEFAULT_SAMPLES};
use crate::core::features::programmer::{self, Radix, WordSize};
use crate::core::features::unit_converter::{
    categories, convert_all_in, convert_indices, find_unit, format_number, parse_quantity, resolve_category,
    resolve_unit, Category, CategoryGroup,
};
use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::SettingsError;
use crate::shared::settings::{AppSettings, SettingsStore};

/// Unit converter and calculator
#[derive(Parser, Debug)]
#[command(name = "unit-calc", version)]
#[command(about = "Unit converter and calculator toolkit", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "UNIT_CALC_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Convert a quantity such as "12 km" into another unit
    Convert {
        /// Value and unit, e.g. "12 km" or "-40 °F"
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Target unit label or symbol
        to: String,
        /// Category to search (defaults: remembered categories, then the whole catalog)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Convert a quantity into every unit of its category
    All {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Evaluate an arithmetic expression
    Calc {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },

    /// Sample y = f(x) and print the points as tab-separated x/y pairs
    Graph(GraphArgs),

    /// Programmer calculator: LHS OP [RHS]
    Prog {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        /// + - * / AND OR XOR NOT SHL SHR
        op: String,
        #[arg(allow_hyphen_values = true)]
        rhs: Option<String>,
        /// BIN, OCT, DEC or HEX
        #[arg(short, long, default_value = "DEC")]
        radix: String,
        /// Word size: 8, 16, 32 or 64
        #[arg(short, long, default_value_t = 32)]
        bits: u32,
    },

    /// List categories, or the units of one category
    Units { category: Option<String> },

    /// Show or change persisted settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "UNIT_CALC_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "UNIT_CALC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Upper bound for samples per graph request
    #[arg(long, env = "UNIT_CALC_MAX_GRAPH_SAMPLES", default_value_t = DEFAULT_MAX_SAMPLES)]
    pub max_graph_samples: usize,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig::new(args.host, args.port).with_max_graph_samples(args.max_graph_samples)
    }
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[arg(allow_hyphen_values = true)]
    pub expr: String,

    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub xmin: f64,

    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub xmax: f64,

    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    /// Fixed y-window lower bound (requires --ymax)
    #[arg(long, requires = "ymax", allow_hyphen_values = true)]
    pub ymin: Option<f64>,

    /// Fixed y-window upper bound (requires --ymin)
    #[arg(long, requires = "ymin", allow_hyphen_values = true)]
    pub ymax: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings as JSON
    Show,
    /// Restore defaults
    Reset,
    /// Change one setting
    Set { key: String, value: String },
}

pub async fn execute(cli: Cli) -> AppResult<()> {
    let settings_path = cli.settings;
    let store = || -> Result<SettingsStore, SettingsError> {
        match &settings_path {
            Some(path) => Ok(SettingsStore::new(path)),
            None => SettingsStore::default_location(),
        }
    };

    match cli.command {
        Command::Serve(args) => crate::api::serve(args.into()).await,
        Command::Convert { quantity, to, category } => convert(&store()?, &quantity, &to, category.as_deref()).await,
        Command::All { quantity, category } => convert_all(&store()?, &quantity, category.as_deref()).await,
        Command::Calc { expr } => {
            println!("{}", format_number(evaluate_expression(&expr)?));
            Ok(())
        }
        Command::Graph(args) => graph(args),
        Command::Prog { lhs, op, rhs, radix, bits } => {
            let radix: Radix = radix.parse()?;
            let word = WordSize::new(bits)?;
            println!("{}", programmer::evaluate(&lhs, &op, rhs.as_deref(), radix, word)?);
            Ok(())
        }
        Command::Units { category } => units(category.as_deref()),
        Command::Settings(command) => settings(&store()?, command).await,
    }
}

/// Pick the category for a unit: explicit, then the remembered defaults, then
/// the first category in the catalog that knows it
fn locate_unit(settings: &AppSettings, category: Option<&str>, unit: &str) -> AppResult<(Category, usize)> {
    if let Some(name) = category {
        let category = resolve_category(name)?;
        return Ok((category, resolve_unit(category, unit)?));
    }

    for group in [CategoryGroup::Main, CategoryGroup::Misc] {
        let preferred = settings.default_category(group);
        if let Some(index) = preferred.unit_index(unit) {
            return Ok((preferred, index));
        }
    }

    find_unit(unit).ok_or_else(|| AppError::Validation(format!("Unknown unit: {}", unit)))
}

async fn remember(store: &SettingsStore, settings: &mut AppSettings, category: Category) {
    if settings.remember_category(category) {
        if let Err(e) = store.save(settings).await {
            tracing::warn!(error = %e, "could not remember last category");
        }
    }
}

async fn convert(store: &SettingsStore, quantity: &str, to: &str, category: Option<&str>) -> AppResult<()> {
    let mut settings = store.load().await;
    let quantity = parse_quantity(quantity)?;
    let (category, from) = locate_unit(&settings, category, &quantity.unit)?;
    let to = resolve_unit(category, to)?;

    let result = convert_indices(category, from, to, quantity.value)?;
    println!(
        "{} {} = {} {}",
        format_number(quantity.value),
        category.units()[from],
        format_number(result),
        category.units()[to]
    );

    remember(store, &mut settings, category).await;
    Ok(())
}

async fn convert_all(store: &SettingsStore, quantity: &str, category: Option<&str>) -> AppResult<()> {
    let mut settings = store.load().await;
    let quantity = parse_quantity(quantity)?;
    let (category, from) = locate_unit(&settings, category, &quantity.unit)?;

    println!("{}: {} {}", category.name(), format_number(quantity.value), category.units()[from]);
    for conversion in convert_all_in(category, category.units()[from], quantity.value)? {
        let shown = match conversion.result {
            Ok(value) => format_number(value),
            Err(e) => format!("Error ({})", e),
        };
        println!("  {:<32} {}", conversion.unit, shown);
    }

    remember(store, &mut settings, category).await;
    Ok(())
}

fn graph(args: GraphArgs) -> AppResult<()> {
    let y_window = args.ymin.zip(args.ymax);
    let plot = graphing::plot(&args.expr, args.xmin, args.xmax, args.samples, DEFAULT_MAX_SAMPLES, y_window)?;

    match plot.y_range {
        Some(range) => println!("# y: {} .. {}", format_number(range.min), format_number(range.max)),
        None => println!("# no valid points"),
    }
    for (x, y) in plot.sample.xs.iter().zip(&plot.sample.ys) {
        println!("{}\t{}", x, y);
    }
    Ok(())
}

fn units(category: Option<&str>) -> AppResult<()> {
    match category {
        Some(name) => {
            for unit in resolve_category(name)?.units() {
                println!("{}", unit);
            }
        }
        None => {
            for category in categories() {
                println!("{:<16} {:<5} {} units", category.name(), category.group().as_str(), category.units().len());
            }
        }
    }
    Ok(())
}

async fn settings(store: &SettingsStore, command: SettingsCommand) -> AppResult<()> {
    match command {
        SettingsCommand::Show => {
            let settings = store.load().await;
            let json =
                serde_json::to_string_pretty(&settings).map_err(|e| SettingsError::Serialize(e.to_string()))?;
            println!("{}", json);
        }
        SettingsCommand::Reset => {
            store.reset().await?;
            println!("Settings reset ({})", store.path().display());
        }
        SettingsCommand::Set { key, value } => {
            let mut settings = store.load().await;
            settings.set(&key, &value)?;
            store.save(&settings).await?;
            println!("{} updated ({})", key, store.path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_quantities_and_ranges() {
        let cli = Cli::parse_from(["unit-calc", "convert", "-40 °F", "°C"]);
        assert!(matches!(cli.command, Command::Convert { ref quantity, .. } if quantity == "-40 °F"));

        let cli = Cli::parse_from(["unit-calc", "graph", "x^2", "--xmin", "-3", "--xmax", "3"]);
        let Command::Graph(args) = cli.command else { panic!("expected graph") };
        assert_eq!((args.xmin, args.xmax), (-3.0, 3.0));
    }

    #[test]
    fn serve_args_become_config() {
        let cli = Cli::parse_from(["unit-calc", "serve", "--port", "8080"]);
        let Command::Serve(args) = cli.command else { panic!("expected serve") };
        let config = ServerConfig::from(args);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.max_graph_samples, DEFAULT_MAX_SAMPLES);
    }

    #[test]
    fn locate_prefers_remembered_categories() {
        let mut settings = AppSettings::default();
        // "hertz (Hz)" exists in both Frequency and RPM
        settings.default_category_misc = "RPM".to_string();
        assert_eq!(locate_unit(&settings, None, "Hz").unwrap().0, Category::Rpm);

        settings.default_category_misc = "Angle".to_string();
        assert_eq!(locate_unit(&settings, None, "Hz").unwrap().0, Category::Frequency);

        assert_eq!(locate_unit(&settings, Some("Length"), "km").unwrap(), (Category::Length, 1));
        assert!(locate_unit(&settings, None, "furlong").is_err());
        assert!(locate_unit(&settings, Some("Mass"), "km").is_err());
    }

    #[tokio::test]
    async fn convert_remembers_category() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        convert(&store, "1 bar", "psi", None).await.unwrap();
        assert_eq!(store.load().await.default_category_misc, "Pressure");
    }

    #[tokio::test]
    async fn settings_set_and_reset() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        settings(&store, SettingsCommand::Set { key: "theme".into(), value: "green".into() }).await.unwrap();
        assert_eq!(store.load().await.theme, crate::shared::settings::Theme::Green);

        assert!(settings(&store, SettingsCommand::Set { key: "scaling".into(), value: "9".into() }).await.is_err());

        settings(&store, SettingsCommand::Reset).await.unwrap();
        assert_eq!(store.load().await, AppSettings::default());
    }
}
