use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use clap::{Args, Parser as ClapParser, Subcommand};
use dataview_lang::{
    EngineConfig,
    cli::{self, CheckOptions, CheckResult, CliError, RenderOptions, RenderResult},
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "dataview")]
#[command(about = "Dataview - query markdown notes by frontmatter and render the results")]
#[command(version)]
struct Cli {
    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and run a query
    Check {
        /// The query to run
        query: String,

        /// Note corpus as a JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        notes: Option<PathBuf>,

        /// Print the structured result as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Run every query embedded in a markdown note
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Note corpus as a JSON file
        #[arg(short, long)]
        notes: Option<PathBuf>,

        /// Title of the rendered note (defaults to the file stem)
        #[arg(short, long)]
        title: Option<String>,

        /// Print block outcomes as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// List the tasks of a markdown file
    Tasks {
        /// Markdown file to scan
        file: PathBuf,

        /// Print tasks as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'dataview docs' to list categories)
        category: String,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Field shown for LIST and CALENDAR entries
    #[arg(long, default_value = dataview_lang::config::DEFAULT_DISPLAY_FIELD)]
    display_field: String,

    /// Field whose date buckets CALENDAR results
    #[arg(long, default_value = dataview_lang::config::DEFAULT_CALENDAR_FIELD)]
    calendar_field: String,

    /// Extra name for a file field, as name=file.field (repeatable)
    #[arg(long = "alias", value_name = "NAME=FIELD")]
    aliases: Vec<String>,
}

impl EngineArgs {
    fn into_config(self) -> Result<EngineConfig, CliError> {
        let mut config = EngineConfig {
            list_display_field: self.display_field,
            calendar_field: self.calendar_field,
            ..EngineConfig::default()
        };
        for alias in &self.aliases {
            let (name, field) = cli::parse_alias(alias)?;
            config.field_aliases.insert(name, field);
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            notes,
            json,
            pretty,
            syntax_only,
            engine,
        } => run_check(query, notes, json, pretty, syntax_only, engine),
        Commands::Render {
            file,
            notes,
            title,
            json,
            pretty,
            engine,
        } => run_render(file, notes, title, json, pretty, engine),
        Commands::Tasks { file, json } => fs::read_to_string(&file)
            .map_err(CliError::Io)
            .and_then(|markdown| cli::execute_tasks(&markdown, json))
            .and_then(|result| print_render(result, false)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dataview_lang=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_notes(path: Option<&Path>) -> Result<Option<String>, CliError> {
    match path {
        Some(path) => Ok(Some(fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn to_json(value: &serde_json::Value, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    Ok(json)
}

fn run_check(
    query: String,
    notes: Option<PathBuf>,
    json: bool,
    pretty: bool,
    syntax_only: bool,
    engine: EngineArgs,
) -> Result<(), CliError> {
    let notes = if syntax_only {
        None
    } else {
        read_notes(notes.as_deref())?
    };

    let options = CheckOptions {
        query,
        notes,
        json,
        syntax_only,
        config: engine.into_config()?,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Rendered(text) => println!("{}", text),
        CheckResult::Structured(value) => println!("{}", to_json(&value, pretty)?),
    }
    Ok(())
}

fn run_render(
    file: PathBuf,
    notes: Option<PathBuf>,
    title: Option<String>,
    json: bool,
    pretty: bool,
    engine: EngineArgs,
) -> Result<(), CliError> {
    let markdown = fs::read_to_string(&file)?;
    let title = title
        .or_else(|| file.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let options = RenderOptions {
        markdown,
        title,
        notes: read_notes(notes.as_deref())?,
        json,
        config: engine.into_config()?,
    };
    print_render(cli::execute_render(&options)?, pretty)
}

fn print_render(result: RenderResult, pretty: bool) -> Result<(), CliError> {
    print!("{}", result.to_output(pretty)?);
    Ok(())
}
