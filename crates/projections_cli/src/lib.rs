//! Command-line interface for migrating GraphQL projections.
//!
//! # Usage
//!
//! ```bash
//! # Register, update and remove projections on the server
//! projections migrate --schema-path ./src --server-address 127.0.0.1:9000
//!
//! # Show what a migration would do
//! projections plan --show-schema
//!
//! # Validate the schema files without contacting the server
//! projections check
//!
//! # Print the rendered definitions
//! projections print
//! ```

pub mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::{Settings, SettingsArgs};
use indexmap::IndexSet;
use miette::{LabeledSpan, NamedSource};
use projections_core::Diagnostic;
use projections_management::HttpManagementClient;
use projections_migrate::{apply, fetch_plan, ReconciliationPlan};
use projections_schema::{compile_dir, DefinitionSet, SchemaError};
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "projections")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the verbosity flags.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "projections=debug"
        } else if self.quiet {
            "projections=warn"
        } else {
            "projections=info"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, update and remove projections on the server
    Migrate,

    /// Show the changes a migration would make
    Plan {
        /// Print the SDL sent with each partition
        #[arg(long)]
        show_schema: bool,
    },

    /// Parse and extract the schema files without contacting the server
    Check,

    /// Print every rendered type definition
    Print,
}

pub async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::resolve(&cli.settings)?;
    debug!(
        schema_path = %settings.schema_path.display(),
        server = %settings.server_address,
        namespace = %settings.namespace,
        "resolved settings"
    );

    let Some(definitions) = load(&settings)? else {
        return Ok(1);
    };

    match cli.command {
        Commands::Check => {
            check(&settings, &definitions);
            Ok(0)
        }
        Commands::Print => {
            print_definitions(&definitions);
            Ok(0)
        }
        Commands::Plan { show_schema } => {
            let client = HttpManagementClient::new(settings.management_config())?;
            let plan = fetch_plan(&definitions, &client, &settings.plan_options()).await?;
            info!(
                create = plan.to_create.len(),
                update = plan.to_update.len(),
                remove = plan.to_remove.len(),
                "planned migration"
            );
            print_plan(&plan, show_schema);
            Ok(0)
        }
        Commands::Migrate => {
            let client = HttpManagementClient::new(settings.management_config())?;
            let plan = fetch_plan(&definitions, &client, &settings.plan_options()).await?;
            if plan.is_converged() {
                println!(
                    "{} no projections to create or remove, refreshing {}",
                    "Up to date:".green().bold(),
                    plan.to_update.len()
                );
            }

            announce("Creating", &plan.to_create);
            announce("Updating", &plan.to_update);
            announce("Removing", &plan.to_remove);

            let report = apply(&plan, &client).await?;
            info!(
                created = report.created.len(),
                updated = report.updated.len(),
                removed = report.removed.len(),
                "migration applied"
            );
            if report.is_empty() {
                println!("{} nothing to migrate", "Done:".green().bold());
            } else {
                println!(
                    "{} created {}, updated {}, removed {} projection(s)",
                    "Done:".green().bold(),
                    report.created.len(),
                    report.updated.len(),
                    report.removed.len()
                );
            }
            Ok(0)
        }
    }
}

/// Compiles the schema directory, reporting syntax errors in place.
///
/// Returns `None` when the schema files contain syntax errors.
fn load(settings: &Settings) -> Result<Option<DefinitionSet>, Box<dyn std::error::Error>> {
    match compile_dir(&settings.schema_path, &settings.extract_options()) {
        Ok(definitions) => {
            info!(
                definitions = definitions.len(),
                path = %settings.schema_path.display(),
                "compiled schema"
            );
            Ok(Some(definitions))
        }
        Err(SchemaError::Parse {
            path,
            source_text,
            diagnostics,
        }) => {
            eprintln!("{} {}", "Error".red().bold(), path.display());
            for diagnostic in diagnostics.iter() {
                eprintln!("{:?}", report(diagnostic, &path, &source_text));
            }
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn report(diagnostic: &Diagnostic, path: &Path, source: &str) -> miette::Report {
    miette::miette!(
        labels = vec![LabeledSpan::new_with_span(
            Some(diagnostic.label.clone()),
            diagnostic.span
        )],
        code = diagnostic.code.as_str(),
        "{}",
        diagnostic.title
    )
    .with_source_code(NamedSource::new(path.display().to_string(), source.to_string()))
}

fn check(settings: &Settings, definitions: &DefinitionSet) {
    let projections = definitions.values().filter(|d| d.is_projection).count();
    println!(
        "{} {} type definition(s), {} projection(s) in {}",
        "Success:".green().bold(),
        definitions.len(),
        projections,
        settings.schema_path.display()
    );
}

fn print_definitions(definitions: &DefinitionSet) {
    for (i, definition) in definitions.values().enumerate() {
        if i > 0 {
            println!();
        }
        if definition.is_projection {
            println!("{}", "# projection".dimmed());
        }
        println!("{}", definition.sdl_body);
    }
}

fn announce(verb: &str, names: &IndexSet<String>) {
    if names.is_empty() {
        return;
    }
    println!(
        "{} {} projection(s): {}",
        verb.blue().bold(),
        names.len(),
        join(names)
    );
}

fn print_plan(plan: &ReconciliationPlan, show_schema: bool) {
    if plan.is_empty() {
        println!("{} nothing to migrate", "Plan:".green().bold());
        return;
    }

    println!(
        "{} {} to create, {} to update, {} to remove",
        "Plan:".bold(),
        plan.to_create.len(),
        plan.to_update.len(),
        plan.to_remove.len()
    );
    for name in &plan.to_create {
        println!("  {} {name}", "+".green());
    }
    for name in &plan.to_update {
        println!("  {} {name}", "~".yellow());
    }
    for name in &plan.to_remove {
        println!("  {} {name}", "-".red());
    }

    if show_schema {
        for (title, payload) in [
            ("create", &plan.create_payload),
            ("update", &plan.update_payload),
        ] {
            if !payload.is_empty() {
                println!("\n{}\n{payload}", format!("# {title}").dimmed());
            }
        }
    }
}

fn join(names: &IndexSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
