use std::fmt;
use std::fs;
use std::io;

use clap::{Parser as ClapParser, Subcommand};
use thyme_lang::{
    eval_document, output, parse, register_builtins, EvalError, ParseError, Scope, Value,
};

#[derive(ClapParser)]
#[command(name = "thyme")]
#[command(about = "Thyme - a data-structured template language for configuration manifests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template into YAML or JSON documents
    Render {
        /// The template file to render
        file: String,

        /// JSON file providing the `Values` binding
        #[arg(short, long)]
        values: Option<String>,

        /// Release name exposed as `Release.Name`
        #[arg(long, default_value = "release")]
        release: String,

        /// Output JSON instead of YAML
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate template syntax without evaluating
    Check {
        /// The template file to check
        file: String,
    },
}

enum CliError {
    Io(io::Error),
    Parse(ParseError),
    Eval(EvalError),
    Values(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Parse(e) => write!(f, "{}", e),
            CliError::Eval(e) => write!(f, "{}", e),
            CliError::Values(msg) => write!(f, "values: {}", msg),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            values,
            release,
            json,
            pretty,
        } => run_render(&file, values.as_deref(), &release, json, pretty),
        Commands::Check { file } => run_check(&file),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_render(
    file: &str,
    values: Option<&str>,
    release: &str,
    json: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let source = fs::read_to_string(file).map_err(CliError::Io)?;
    let doc = parse(&source, file).map_err(CliError::Parse)?;

    let scope = Scope::new(None);
    register_builtins(&scope);

    let values_val = match values {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(CliError::Io)?;
            let parsed: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| CliError::Values(e.to_string()))?;
            output::from_json(&parsed)
        }
        None => Value::object(),
    };

    let release_val = Value::object();
    release_val.set_field("Name", Value::string(release));

    {
        let s = scope.borrow();
        s.set_global("Values", values_val);
        s.set_global("Release", release_val);
    }

    let result = eval_document(&doc, &scope).map_err(CliError::Eval)?;
    let docs = match &result {
        Value::Array(arr) => arr.borrow().clone(),
        other => vec![other.clone()],
    };

    if json {
        let rendered: Vec<serde_json::Value> = docs.iter().map(output::to_json_value).collect();
        let combined = serde_json::Value::Array(rendered);
        let text = if pretty {
            serde_json::to_string_pretty(&combined)
        } else {
            serde_json::to_string(&combined)
        }
        .map_err(|e| CliError::Values(e.to_string()))?;
        println!("{}", text);
    } else {
        print!("{}", output::to_yaml_stream(&docs));
    }

    Ok(())
}

fn run_check(file: &str) -> Result<(), CliError> {
    let source = fs::read_to_string(file).map_err(CliError::Io)?;
    parse(&source, file).map_err(CliError::Parse)?;
    println!("Syntax is valid");
    Ok(())
}
