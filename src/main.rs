//! cpgraph CLI - inspect how integer literals land in the code property graph

use clap::{Parser, Subcommand, ValueEnum};
use cpgraph::config::{self, CpgConfig};
use cpgraph::expression::Expression;
use cpgraph::{LiteralTypeResolver, TargetModel};
use owo_colors::{OwoColorize, Style};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cpgraph")]
#[command(version)]
#[command(about = "Code property graph core - declarations, translation units and literal typing")]
#[command(long_about = r#"
cpgraph holds the language-agnostic core of a code property graph:
  • Translation units with declarations, includes and namespaces
  • Exact C/C++ integer literal typing (int → long → long long)
  • Parallel translation through pluggable language frontends

Example usage:
  cpgraph literal 2147483648 -2147483648 0xFFFFFFFFu
  cpgraph literal --model llp64 --format json 9223372036854775808
  cpgraph init
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./cpgraph.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the type and value of integer literal tokens
    Literal {
        /// Literal tokens, optionally preceded by unary `-` or `+`
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        tokens: Vec<String>,

        /// Data model used to size `long` (overrides config)
        #[arg(short, long)]
        model: Option<TargetModel>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

struct Theme {
    header: Style,
    ty: Style,
    dim: Style,
    error: Style,
}

impl Theme {
    fn detect() -> Self {
        Self::for_terminal(console::Term::stdout().is_term())
    }

    fn for_terminal(is_term: bool) -> Self {
        if is_term {
            Self {
                header: Style::new().cyan().bold(),
                ty: Style::new().green(),
                dim: Style::new().white().dimmed(),
                error: Style::new().red().bold(),
            }
        } else {
            Self {
                header: Style::new(),
                ty: Style::new(),
                dim: Style::new(),
                error: Style::new(),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if let Some(directive) = &cfg.log_filter {
        EnvFilter::new(directive)
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Literal { tokens, model, format } => {
            let model = model.unwrap_or(cfg.target_model);
            run_literal(&tokens, model, format)?;
        }
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &CpgConfig::default(), force)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn run_literal(tokens: &[String], model: TargetModel, format: OutputFormat) -> anyhow::Result<()> {
    let resolver = LiteralTypeResolver::new(model);
    let theme = Theme::detect();
    let mut rows = Vec::with_capacity(tokens.len());
    let mut failed = 0;

    for token in tokens {
        match Expression::parse_integer(token, &resolver) {
            Ok(expr) => rows.push((token.as_str(), expr)),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}", "error:".style(theme.error), e);
            }
        }
    }

    match format {
        OutputFormat::Json => {
            let json: Vec<_> = rows
                .iter()
                .map(|(token, expr)| {
                    let literal = expr.innermost_literal();
                    serde_json::json!({
                        "token": token,
                        "model": model,
                        "literal_type": literal.ty.as_str(),
                        "literal_value": literal.value,
                        "type": expr.ty(model).as_str(),
                        "value": expr.value().to_string(),
                        "converted_value": expr.converted_value(model).to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Model:".style(theme.header), model);
            for (token, expr) in &rows {
                let literal = expr.innermost_literal();
                println!("{}", token.style(theme.header));
                println!(
                    "  {} {} = {}",
                    "literal   ".style(theme.dim),
                    literal.ty.as_str().style(theme.ty),
                    literal.value
                );
                println!(
                    "  {} {} = {}",
                    "expression".style(theme.dim),
                    expr.ty(model).as_str().style(theme.ty),
                    expr.converted_value(model)
                );
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} tokens could not be resolved", failed, tokens.len());
    }
    Ok(())
}
