extern crate env_logger;
#[macro_use]
extern crate log;
use std::{
    fs::File,
    io::{prelude::*, stdout, BufWriter},
    path::Path,
};

use anyhow::Result;
use clap::Parser;

use screed::{dump_fasta, dump_fastq, ScreedDb};

mod cli;

use cli::{Cli, Commands};

/// Creates a `BufWriter` for the given output option. This allows for an output file to be passed
/// or otherwise will default to using standard output.
///
/// If `output` is `Some`, it creates a file at the specified path and returns a `BufWriter` for it.
/// If `output` is `None`, it returns a `BufWriter` for the standard output.
///
/// # Arguments
///
/// * `output` - An `Option` containing the path to the output file as a `String`.
///
/// # Returns
///
/// A `Result` containing a `BufWriter` that implements `Write`.
fn get_writer(output: &Option<String>) -> Result<impl Write> {
    // get output as a BufWriter - equal to stdout if None
    let writer = BufWriter::new(match output {
        Some(ref x) => {
            let file = File::create(Path::new(x))?;
            Box::new(file) as Box<dyn Write + Send>
        }
        None => Box::new(stdout()) as Box<dyn Write + Send>,
    });
    Ok(writer)
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Index { file } => {
            let db_path = screed::build(file)?;
            info!("wrote database to {}", db_path.display());
        }
        Commands::ToFasta { database, output } => {
            let db = ScreedDb::open(database)?;
            let mut writer = get_writer(output)?;
            dump_fasta(&db, &mut writer)?;
            writer.flush()?;
        }
        Commands::ToFastq { database, output } => {
            let db = ScreedDb::open(database)?;
            let mut writer = get_writer(output)?;
            dump_fastq(&db, &mut writer)?;
            writer.flush()?;
        }
        Commands::Info { database } => {
            let db = ScreedDb::open(database)?;

            let mut data = serde_json::to_value(db.metadata())?;
            data["records"] = serde_json::json!(db.len());
            data["format"] = serde_json::json!(db.schema().format().name());

            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
