//! Prints randomized `CREATE INDEX` statements for a schema.

use std::io::{stderr, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use index_gen::{generate_create_index, GenerationState, Profile, SeededRandomness};
use rand::RngCore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed for deterministic execution. Overrides the profile seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of statements to generate. Overrides the profile.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// JSON5 profile with the schema and generation options.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Avoid anything whose result the executor could not predict.
    #[arg(long)]
    must_know_result: bool,

    /// Print every query as a JSON line, including its expected errors.
    #[arg(long)]
    json: bool,

    /// Print the JSON schema of the profile file and exit.
    #[arg(long)]
    print_schema: bool,
}

fn main() -> Result<()> {
    let mut subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );
    if !stderr().is_terminal() {
        subscriber = subscriber.with_ansi(false);
    }
    subscriber.init();

    let args = Args::parse();

    if args.print_schema {
        let schema = schemars::schema_for!(Profile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let mut profile = match &args.profile {
        Some(path) => Profile::parse(path)?,
        None => Profile::default(),
    };
    if args.must_know_result {
        profile.opts.must_know_result = true;
    }
    if let Some(count) = args.count {
        profile.statements = count;
    }
    let seed = args
        .seed
        .or(profile.seed)
        .unwrap_or_else(|| rand::rng().next_u64());

    tracing::info!(seed, statements = profile.statements, "starting");

    let mut rng = SeededRandomness::new(seed);
    let mut state = GenerationState::new(profile.schema(), profile.opts.clone());
    let mut generated = 0;
    for _ in 0..profile.statements {
        let (create_index, query) = match generate_create_index(&mut rng, &state) {
            Ok(generated) => generated,
            Err(err) if err.is_bailout() => {
                tracing::warn!("{err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        state.schema.indexes.insert(create_index.index_name);
        if args.json {
            println!("{}", serde_json::to_string(&query)?);
        } else {
            println!("{query};");
        }
        generated += 1;
    }

    tracing::info!(seed, generated, "done");
    Ok(())
}
