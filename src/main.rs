use api_to_jsonschema::{Config, RefRewrite, convert_str};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-to-jsonschema")]
#[command(about = "Convert Swagger 2, OpenAPI 3 or AsyncAPI 2 documents to JSON Schema", long_about = None)]
struct Cli {
    /// Input YAML or JSON API document (use '-' for stdin)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Meta-schema URI written to `$schema`
    #[arg(long, value_name = "URI")]
    schema: Option<String>,

    /// URI written to `$id`
    #[arg(long, value_name = "URI")]
    id: Option<String>,

    /// Inline every $ref in the generated schema
    #[arg(long)]
    resolve_refs: bool,

    /// Allow properties not listed in the schema
    #[arg(long)]
    additional_properties: bool,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Rewrite only $ref values instead of every occurrence of the components path
    #[arg(long)]
    structural_refs: bool,

    /// Log pipeline steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default()
            .with_resolve_refs(self.resolve_refs)
            .with_additional_properties(self.additional_properties)
            .with_indent(self.indent);
        if let Some(schema) = &self.schema {
            config = config.with_schema(schema.clone());
        }
        if let Some(id) = &self.id {
            config = config.with_id(id.clone());
        }
        if self.structural_refs {
            config = config.with_ref_rewrite(RefRewrite::Structural);
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Read input
    let input_content = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&cli.input)?
    };

    let origin = if cli.input == "-" { "stdin" } else { cli.input.as_str() };
    let schema = convert_str(&input_content, origin, &cli.config())?;

    // Write output
    if let Some(output_path) = &cli.output {
        fs::write(output_path, schema)?;
    } else {
        println!("{}", schema);
    }

    Ok(())
}
