//! Schema Model CLI
//!
//! Prints the property model built from the dfx.json schema and answers the
//! lookups editor features make.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dfx_schemas::{CandidUiPanel, ModelConfig, PanelView, SchemaDocument, SchemaModel};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dfx-model")]
#[command(about = "Inspect the property model of the dfx.json schema")]
struct Cli {
    /// Schema file (defaults to the configured path, then the bundled schema)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved property forest
    Props {
        /// Only print this top-level property
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Print the definition index
    Definitions,

    /// List top-level properties and whether they are objects
    MainProperties,

    /// Show the definition behind a top-level property
    Lookup {
        /// Top-level property name (e.g. "canisters")
        main_property: String,
        /// Discriminant of a tagged variant (e.g. "rust")
        #[arg(short, long)]
        variant: Option<String>,
    },

    /// Render the Candid UI panel for a canister
    CandidUi {
        /// Tree item label, `<canister>` or `<canister>: <id>`
        label: String,
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ModelConfig::load_from(cli.config.as_deref())?;
    if let Some(schema) = cli.schema {
        config.schema.path = Some(schema);
    }

    match cli.command {
        Commands::Props { name } => {
            let model = build_model(&config)?;
            match name {
                Some(name) => {
                    let prop = model
                        .prop(&name)
                        .ok_or_else(|| format!("No top-level property named '{}'", name))?;
                    print_json(prop, cli.compact)?;
                }
                None => print_json(&model.props, cli.compact)?,
            }
        }

        Commands::Definitions => {
            let model = build_model(&config)?;
            print_json(&model.definitions, cli.compact)?;
        }

        Commands::MainProperties => {
            let model = build_model(&config)?;
            for (name, is_object) in model.main_property_names() {
                let kind = if is_object { "object" } else { "value" };
                println!("{:<24} {}", name, kind);
            }
        }

        Commands::Lookup { main_property, variant } => {
            let model = build_model(&config)?;
            if model.main_property(&main_property).is_none() {
                return Err(format!("No top-level property named '{}'", main_property).into());
            }

            let Some(definition) = model.definition_for(&main_property) else {
                println!("No definition is associated with '{}'", main_property);
                return Ok(());
            };

            match variant {
                Some(tag) => match model.variant_fields(&main_property, &tag) {
                    Some(fields) => print_json(&fields, cli.compact)?,
                    None => println!("Definition '{}' has no variant '{}'", definition.name, tag),
                },
                None => print_json(definition, cli.compact)?,
            }
        }

        Commands::CandidUi { label, port } => {
            let mut ui_config = config.candid_ui.clone();
            if let Some(port) = port {
                ui_config.port = port;
            }

            match CandidUiPanel::from_config(&ui_config).open(&label) {
                PanelView::Webview(view) => println!("{}", view.html),
                PanelView::Info(message) => println!("ℹ️  {}", message),
            }
        }
    }

    Ok(())
}

fn build_model(config: &ModelConfig) -> Result<SchemaModel, Box<dyn std::error::Error>> {
    let document: SchemaDocument = config.schema_document()?;
    Ok(SchemaModel::build(&document))
}

fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> serde_json::Result<()> {
    let output = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", output);
    Ok(())
}
