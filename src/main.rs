use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{bail, Context};

use npc_bridge::config::AppConfig;
use npc_bridge::core::host::{self, InMemoryRecordStore, LineEventSource, WriterNotifier};
use npc_bridge::core::npc_import::{ImporterOptions, NpcImporter, RandomRowIds};

const USAGE: &str = "usage: npc-bridge [--player <id>] [--dump] [--print-config] [FILE]

Replays chat lines from FILE (or stdin) against an in-memory host.
Lines are `<kind>|<player>|<content>` or a bare `!create-npc {...}` command.";

struct Args {
    player: String,
    dump: bool,
    print_config: bool,
    input: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        player: "gm".to_string(),
        dump: false,
        print_config: false,
        input: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--player" => args.player = it.next().context("--player needs a value")?,
            "--dump" => args.dump = true,
            "--print-config" => args.print_config = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n\n{USAGE}"),
            path => args.input = Some(path.to_string()),
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    let config = AppConfig::load().context("failed to load configuration")?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = npc_bridge::core::logging::init(&config.logging);
    tracing::info!("{} v{} starting", npc_bridge::NAME, npc_bridge::VERSION);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {path}"))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let options = ImporterOptions::from(&config);
    let mut importer = NpcImporter::new(
        options,
        InMemoryRecordStore::new(),
        WriterNotifier::new(io::stdout()),
        RandomRowIds::new(),
    );
    let mut source = LineEventSource::new(reader, args.player);
    let delivered = host::run(&mut source, &mut importer);

    let (store, _, _) = importer.into_parts();
    tracing::info!(messages = delivered, records = store.len(), "replay finished");

    if args.dump {
        let records: Vec<_> = store.records().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}
