use seqsync::{Diagnostic, Document, Engine, EngineConfig};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Seqsync(seqsync::Error),
    Json(serde_json::Error),
    NoDiagram,
    Invalid { errors: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Seqsync(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoDiagram => write!(f, "No @startuml/@enduml block found"),
            CliError::Invalid { errors } => write!(f, "{errors} error(s) found"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<seqsync::Error> for CliError {
    fn from(value: seqsync::Error) -> Self {
        Self::Seqsync(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Generate,
    Format,
    Validate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    fallback: bool,
    json: bool,
}

#[derive(Serialize)]
struct ValidateOut<'a> {
    valid: bool,
    diagnostics: &'a [Diagnostic],
}

fn usage() -> &'static str {
    "seqsync-cli\n\
\n\
USAGE:\n\
  seqsync-cli [parse] [--pretty] [--fallback] [--config <path>] [<path>|-]\n\
  seqsync-cli generate [--config <path>] [<path>|-]\n\
  seqsync-cli format [--config <path>] [<path>|-]\n\
  seqsync-cli validate [--json] [--pretty] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the document JSON; --fallback prints the declared actors when the markers are missing.\n\
  - generate reads document JSON and prints PlantUML text.\n\
  - validate exits with status 1 when any error is found.\n\
  - --config takes a JSON engine config; missing fields keep their defaults.\n\
  - Set SEQSYNC_LOG (e.g. SEQSYNC_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "generate" => args.command = Command::Generate,
            "format" => args.command = Command::Format,
            "validate" => args.command = Command::Validate,
            "--pretty" => args.pretty = true,
            "--fallback" => args.fallback = true,
            "--json" => args.json = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn build_engine(config: Option<&str>) -> Result<Engine, CliError> {
    let Some(path) = config else {
        return Ok(Engine::new());
    };
    let json = std::fs::read_to_string(path)?;
    let config = EngineConfig::from_json_str(&json)?;
    tracing::debug!(path, "loaded engine config");
    Ok(Engine::new().with_config(config))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SEQSYNC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let engine = build_engine(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Parse => {
            let document = match engine.parse_sync(&text)? {
                Some(document) => document,
                None if args.fallback => Document {
                    actors: engine.extract_actors(&text),
                    nodes: Vec::new(),
                },
                None => return Err(CliError::NoDiagram),
            };
            write_json(&document, args.pretty)
        }
        Command::Generate => {
            let mut document: Document = serde_json::from_str(&text)?;
            document.ensure_referenced_actors();
            println!("{}", engine.generate(&document));
            Ok(())
        }
        Command::Format => {
            print!("{}", engine.format(&text)?);
            Ok(())
        }
        Command::Validate => {
            let diagnostics = engine.validate(&text);
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            if args.json {
                write_json(
                    &ValidateOut {
                        valid: errors == 0,
                        diagnostics: &diagnostics,
                    },
                    args.pretty,
                )?;
            } else {
                for diagnostic in &diagnostics {
                    println!("{diagnostic}");
                }
            }
            if errors > 0 {
                return Err(CliError::Invalid { errors });
            }
            Ok(())
        }
    }
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoDiagram) => {
            eprintln!("{}", CliError::NoDiagram);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
