//! Waypoint inspector
//!
//! Decode and encode synthetic identifiers, or walk a seeded remediation
//! session against an in-memory store.

mod simulate;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_core::EngineConfig;
use waypoint_ident::{ItemToken, PartToken, ResourceId, Token};

fn cli() -> Command {
    Command::new("waypoint-inspect")
        .version(waypoint_core::VERSION)
        .about("Inspect synthetic assessment identifiers")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration file (TOML)"),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode an identifier into its origin and token")
                .arg(Arg::new("id").required(true).help("namespace:identifier@authority")),
        )
        .subcommand(
            Command::new("encode-root")
                .about("Encode the root scaffold part id for a canonical part")
                .arg(
                    Arg::new("part")
                        .required(true)
                        .help("Identifier of the canonical part"),
                )
                .arg(
                    Arg::new("objective")
                        .long("objective")
                        .action(ArgAction::Append)
                        .help("Root learning objective; repeat for several"),
                )
                .arg(
                    Arg::new("quota")
                        .long("quota")
                        .value_parser(value_parser!(u32))
                        .help("Correct answers that satisfy a branch"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Walk a remediation session with random answers")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Seed for answers and choice order"),
                )
                .arg(
                    Arg::new("levels")
                        .long("levels")
                        .default_value("2")
                        .value_parser(value_parser!(u32))
                        .help("Depth limit of the remediation tree"),
                )
                .arg(
                    Arg::new("siblings")
                        .long("siblings")
                        .value_parser(value_parser!(u32))
                        .help("Waypoints per branch; unbounded when omitted"),
                )
                .arg(
                    Arg::new("quota")
                        .long("quota")
                        .value_parser(value_parser!(u32))
                        .help("Correct answers that satisfy a branch"),
                )
                .arg(
                    Arg::new("pool")
                        .long("pool")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("Items per objective"),
                )
                .arg(
                    Arg::new("accuracy")
                        .long("accuracy")
                        .default_value("0.5")
                        .value_parser(value_parser!(f64))
                        .help("Probability of answering correctly"),
                )
                .arg(
                    Arg::new("max-questions")
                        .long("max-questions")
                        .default_value("25")
                        .value_parser(value_parser!(usize))
                        .help("Stop after this many questions"),
                )
                .arg(
                    Arg::new("no-repeats")
                        .long("no-repeats")
                        .action(ArgAction::SetTrue)
                        .help("Never show an item twice"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<EngineConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn required<T: Clone + Send + Sync + 'static>(args: &ArgMatches, name: &str) -> anyhow::Result<T> {
    args.get_one::<T>(name)
        .cloned()
        .with_context(|| format!("missing --{name}"))
}

fn decode(config: &EngineConfig, raw: &str) -> anyhow::Result<()> {
    let id: ResourceId = raw.parse().with_context(|| format!("parsing '{raw}'"))?;

    let report = if id.has_authority(&config.part_authority) {
        let decoded = config.part_codec().decode::<PartToken>(&id)?;
        serde_json::json!({ "kind": PartToken::KIND, "origin": decoded.origin, "token": decoded.token })
    } else if id.has_authority(&config.item_authority) {
        let decoded = config.item_codec().decode::<ItemToken>(&id)?;
        serde_json::json!({ "kind": ItemToken::KIND, "origin": decoded.origin, "token": decoded.token })
    } else {
        serde_json::json!({ "kind": "canonical", "namespace": id.namespace(), "identifier": id.identifier() })
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn encode_root(config: &EngineConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let part: ResourceId = required::<String>(args, "part")?.parse()?;
    if part.namespace() != config.part_namespace {
        bail!("{part} is not a part (namespace {})", part.namespace());
    }

    let objectives: Vec<String> = args
        .get_many::<String>("objective")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let token = PartToken::root(objectives, args.get_one::<u32>("quota").copied());

    let id = config
        .part_codec()
        .encode(part.namespace(), part.identifier(), &token)?;
    println!("{id}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("decode", args)) => decode(&config, &required::<String>(args, "id")?),
        Some(("encode-root", args)) => encode_root(&config, args),
        Some(("simulate", args)) => {
            let options = simulate::Options {
                seed: required(args, "seed")?,
                max_levels: required(args, "levels")?,
                max_waypoint_items: args.get_one::<u32>("siblings").copied(),
                waypoint_quota: args.get_one::<u32>("quota").copied(),
                pool: required(args, "pool")?,
                accuracy: required(args, "accuracy")?,
                max_questions: required(args, "max-questions")?,
                allow_repeats: !args.get_flag("no-repeats"),
            };
            let summary = simulate::run(config, &options).await?;
            println!("{summary}");
            Ok(())
        }
        _ => bail!("unknown command"),
    }
}
