use clap::{Parser, Subcommand, ValueEnum};
use fraxon::payload::{BACKEND_URL_ENV, DEFAULT_BACKEND_URL, PROJECT_NAME_ENV};
use fraxon::prelude::*;
use serde_json::Value;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypePolicyCli {
    Passthrough,
    #[value(name = "string")]
    CoerceToString,
}

/// Compiles backend-architecture canvas graphs into backend specifications
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the generation/deployment service
    #[arg(long, global = true, env = BACKEND_URL_ENV, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a canvas state or saved graph document
    Compile {
        /// Path to the canvas state or graph document JSON file
        input: String,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Emit the `{ graphState }` request body instead of the bare specification
        #[arg(short, long)]
        wrap: bool,

        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,

        /// How to treat unrecognized field type tokens
        #[arg(long, value_enum, default_value = "passthrough")]
        field_types: TypePolicyCli,

        /// Maximum hops when resolving route -> controller -> model links
        #[arg(long, default_value_t = 1)]
        max_hops: usize,
    },
    /// Check that a saved graph document can be imported
    Validate {
        /// Path to the graph document JSON file
        document: String,
    },
    /// Print the deploy trigger request body
    DeployPayload {
        /// Project name to deploy
        #[arg(long, env = PROJECT_NAME_ENV)]
        project_name: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = ServiceConfig::new(cli.backend_url, None);

    match cli.command {
        Command::Compile {
            input,
            output,
            wrap,
            compact,
            field_types,
            max_hops,
        } => {
            let policy = match field_types {
                TypePolicyCli::Passthrough => FieldTypePolicy::Passthrough,
                TypePolicyCli::CoerceToString => FieldTypePolicy::CoerceToString,
            };
            let compiler = Compiler::builder()
                .with_field_type_policy(policy)
                .with_max_hops(max_hops)
                .build();
            run_compile(&compiler, &service, &input, output.as_deref(), wrap, compact);
        }
        Command::Validate { document } => run_validate(&document),
        Command::DeployPayload { project_name } => {
            let service = ServiceConfig::new(service.backend_url, project_name);
            let body = serde_json::to_string_pretty(&service.deploy_request())
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize payload: {}", e)));
            eprintln!("POST {}", service.deploy_url());
            println!("{}", body);
        }
    }
}

fn run_compile(
    compiler: &Compiler,
    service: &ServiceConfig,
    input: &str,
    output: Option<&str>,
    wrap: bool,
    compact: bool,
) {
    let start = Instant::now();
    let json = fs::read_to_string(input)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read input file '{}': {}", input, e)));
    let value: Value = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse input JSON: {}", e)));

    let snapshot = if is_graph_document(&value) {
        tracing::info!("Input looks like a saved graph document; building snapshot");
        GraphDocument::from_value(value)
            .map(|doc| doc.to_snapshot(None))
            .unwrap_or_else(|e| exit_with_error(&format!("Import failed: {}", e)))
    } else {
        CanvasSnapshot::from_value(&value)
            .unwrap_or_else(|e| exit_with_error(&format!("Graph build failed: {}", e)))
    };

    let spec = compiler.compile(&snapshot);
    tracing::info!(
        "Compiled {} schemas, {} controller actions, {} routes in {:?}",
        spec.schemas.len(),
        spec.controllers.len(),
        spec.routes.len(),
        start.elapsed()
    );

    let rendered = if wrap {
        eprintln!("POST {}", service.generate_url());
        render(&GenerationRequest::new(spec), compact)
    } else {
        render(&spec, compact)
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write output file '{}': {}", path, e))
            });
            println!("Specification written to '{}'", path);
        }
        None => println!("{}", rendered),
    }
}

fn run_validate(path: &str) {
    let document =
        GraphDocument::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let snapshot = document.to_snapshot(None);
    let counts = snapshot.node_count;

    println!("Graph document '{}' is valid.", path);
    println!("Nodes:        {}", counts.total);
    println!("  server:     {}", counts.server);
    println!("  route:      {}", counts.route);
    println!("  controller: {}", counts.controller);
    println!("  middleware: {}", counts.middleware);
    println!("Edges:        {}", snapshot.edge_count);
}

/// Saved documents carry the editor's node shape (`data.label`, `data.config`)
/// and no precomputed adjacency.
fn is_graph_document(value: &Value) -> bool {
    let has_connections = value.get("connections").is_some();
    let nodes_have_data = value
        .get("nodes")
        .and_then(Value::as_array)
        .is_some_and(|nodes| nodes.iter().any(|n| n.get("data").is_some()));
    !has_connections && nodes_have_data
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    result.unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
