//! dao-actions - DAO proposal action codec
//!
//! Single binary with subcommands:
//!   dao-actions actions              - List available actions
//!   dao-actions default <key>        - Print an action's default form data
//!   dao-actions decode <msgs.json>   - Classify proposal messages into actions
//!   dao-actions encode <draft.json>  - Encode a draft into proposal messages
//!   dao-actions init-config [path]   - Write a testnet config to edit

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

use dao_actions::{
    classify,
    config::{default_config_path, default_testnet_config},
    ActionContext, ActionKey, ActionRegistry, ChainConfig, DraftEntry, ProposalDraft,
    ProposalSubmission, WireMessage,
};

enum Command {
    Actions,
    Default(String),
    Decode(PathBuf),
    Encode {
        draft: PathBuf,
        propose: bool,
        title: String,
        description: String,
    },
    InitConfig(Option<PathBuf>),
    Help,
    Version,
}

struct Args {
    config: Option<PathBuf>,
    command: Command,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let args = parse_args(args)?;

    match args.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("dao-actions {}", dao_actions::VERSION);
            return Ok(());
        }
        Command::InitConfig(path) => return init_config(path),
        _ => {}
    }

    let config = load_config(args.config.as_deref())?;
    let ctx = ActionContext::new(config);
    let registry = ActionRegistry::standard().context("Failed to build action registry")?;

    match args.command {
        Command::Actions => {
            for h in registry.list_ordered() {
                println!("{:<24} {} {}", h.key(), h.icon(), h.label());
            }
        }
        Command::Default(key) => {
            let key: ActionKey = key.parse()?;
            let handler = registry
                .get(key)
                .with_context(|| format!("Action {key} is not registered"))?;
            print_json(&handler.default_data(&ctx)?)?;
        }
        Command::Decode(path) => {
            let msgs: Vec<WireMessage> = read_json(&path)?;
            let classified = classify(&registry, &ctx, &msgs)?;
            info!(messages = msgs.len(), actions = classified.len(), "Decoded proposal");
            print_json(&serde_json::to_value(&classified)?)?;
        }
        Command::Encode {
            draft,
            propose,
            title,
            description,
        } => {
            let entries: Vec<DraftEntry> = read_json(&draft)?;
            let draft = ProposalDraft::from_entries(entries);

            let errors = draft.validate_all(&registry, &ctx)?;
            if !errors.is_empty() {
                for e in &errors {
                    eprintln!("  {}: {}", e.path, e.message);
                }
                bail!("Draft has {} invalid field(s)", errors.len());
            }

            let submission =
                ProposalSubmission::build(title, description, &draft, &registry, &ctx)?;
            if propose {
                let module = ctx
                    .config()
                    .proposal_module
                    .clone()
                    .context("No proposal_module in chain config")?;
                let msg = submission.into_propose_message(&module)?;
                print_json(&msg.to_json()?)?;
            } else {
                let msgs = submission
                    .msgs
                    .iter()
                    .map(WireMessage::to_json)
                    .collect::<Result<Vec<_>, _>>()?;
                print_json(&json!(msgs))?;
            }
        }
        Command::InitConfig(_) | Command::Help | Command::Version => {}
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut propose = false;
    let mut title = String::new();
    let mut description = String::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--propose" => propose = true,
            "--title" => {
                i += 1;
                title = args.get(i).context("--title needs a value")?.clone();
            }
            "--description" => {
                i += 1;
                description = args.get(i).context("--description needs a value")?.clone();
            }
            "--help" | "-h" => positional.insert(0, "help".to_string()),
            "--version" | "-V" => positional.insert(0, "version".to_string()),
            other if other.starts_with('-') => bail!("Unknown option: {other}"),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let arg = |n: usize, what: &str| -> Result<String> {
        positional
            .get(n)
            .cloned()
            .with_context(|| format!("Missing {what}"))
    };

    let command = match positional.first().map(String::as_str) {
        Some("actions") => Command::Actions,
        Some("default") => Command::Default(arg(1, "action key")?),
        Some("decode") => Command::Decode(PathBuf::from(arg(1, "messages file")?)),
        Some("encode") => Command::Encode {
            draft: PathBuf::from(arg(1, "draft file")?),
            propose,
            title,
            description,
        },
        Some("init-config") => Command::InitConfig(positional.get(1).map(PathBuf::from)),
        Some("version") => Command::Version,
        Some("help") | None => Command::Help,
        Some(other) => bail!("Unknown command: {other}"),
    };

    Ok(Args { config, command })
}

fn load_config(explicit: Option<&Path>) -> Result<ChainConfig> {
    if let Some(path) = explicit {
        info!("Loading chain config from {:?}", path);
        return ChainConfig::load_from_file(path)
            .with_context(|| format!("Failed to load chain config from {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading chain config from {:?}", path);
            ChainConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load chain config from {}", path.display()))
        }
        _ => {
            debug!("No chain config found, using testnet defaults");
            Ok(default_testnet_config())
        }
    }
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => default_config_path().context("No config directory on this platform")?,
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    default_testnet_config()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write chain config to {}", path.display()))?;
    info!("Wrote chain config to {:?}", path);
    println!("{}", path.display());
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_help() {
    println!("dao-actions v{}", dao_actions::VERSION);
    println!("Encode and decode DAO proposal actions");
    println!();
    println!("USAGE:");
    println!("    dao-actions [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    actions               List available actions in matching order");
    println!("    default <key>         Print an action's default form data");
    println!("    decode <msgs.json>    Classify a JSON list of messages into actions");
    println!("    encode <draft.json>   Encode a JSON list of {{action, data}} entries");
    println!("                            --propose          Wrap in a propose call");
    println!("                            --title <text>     Proposal title");
    println!("                            --description <text>");
    println!("    init-config [path]    Write a testnet chain config to edit");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>   Chain config");
    println!("                          (default: <config dir>/dao-actions/chain.toml)");
    println!("    -h, --help            Print help");
    println!("    -V, --version         Print version");
    println!();
    println!("Set RUST_LOG=debug to see each match decision.");
}
