use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 screed version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   an indexed, read-only store of FASTA/FASTQ sequence records";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a record database from a FASTA or FASTQ file. Gzip and bzip2
    /// inputs are detected by their magic bytes. The database is written
    /// next to the input with a `_screed` suffix.
    #[command(arg_required_else_help = true)]
    Index {
        /// the input sequence file
        file: String,
    },

    /// Dump a database back to FASTA text
    #[command(arg_required_else_help = true)]
    ToFasta {
        /// the database file
        database: String,

        /// output file; standard output if omitted
        #[arg(short)]
        output: Option<String>,
    },

    /// Dump a database back to FASTQ text. Records without a quality field
    /// get a constant synthetic quality string.
    #[command(arg_required_else_help = true)]
    ToFastq {
        /// the database file
        database: String,

        /// output file; standard output if omitted
        #[arg(short)]
        output: Option<String>,
    },

    /// Print database metadata and record count as JSON
    #[command(arg_required_else_help = true)]
    Info {
        /// the database file
        database: String,
    },
}
