//! Terminal front-end: load a `.dbc`, print or filter the message tree,
//! export the C++ signal map. All the logic lives in the library; this
//! binary only wires arguments to the in-process interfaces.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use dbc_utility::{Database, FilterKind, dbc, export, report, search};

#[derive(Parser)]
#[command(
    name = "dbc_utility",
    version,
    about = "View, search and export CAN bus databases (.dbc)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a .dbc file and print its message/signal tree
    View {
        /// Path to the .dbc file
        file: String,
        /// Substring to search for
        #[arg(short, long, default_value = "")]
        query: String,
        /// Search scope
        #[arg(short, long, value_enum, default_value = "all")]
        kind: KindArg,
        /// Emit the report as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Export all signal attributes as a C++ map literal
    Export {
        /// Path to the .dbc file
        file: String,
        /// Output file path
        #[arg(short, long, default_value = "signal_map.txt")]
        output: String,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum KindArg {
    All,
    Message,
    Signal,
    FrameId,
}

impl From<KindArg> for FilterKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => FilterKind::All,
            KindArg::Message => FilterKind::Message,
            KindArg::Signal => FilterKind::Signal,
            KindArg::FrameId => FilterKind::FrameId,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::View {
            file,
            query,
            kind,
            json,
        } => view(&file, &query, kind.into(), json),
        Command::Export { file, output } => export_map(&file, &output),
    }
}

fn view(file: &str, query: &str, kind: FilterKind, json: bool) -> Result<()> {
    let db: Database = dbc::from_file(file)?;
    let filtered = search::apply(&db, query, kind);
    let report = report::from_view(&db, &filtered);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No matching data found.");
        return Ok(());
    }
    for msg in &report {
        println!(
            "{} (Frame ID: {}, {})",
            msg.message_name, msg.frame_id_hex, msg.id_format
        );
        if !msg.senders.is_empty() {
            println!("  Senders: {}", msg.senders.join(", "));
        }
        for sig in &msg.signals {
            println!("  {}", sig.item_text);
            if !sig.comments.is_empty() {
                println!("    Comments:  {}", sig.comments);
            }
            if !sig.receivers.is_empty() {
                println!("    Receivers: {}", sig.receivers.join(", "));
            }
            println!("    Is Signed: {}", sig.is_signed);
            println!("    Minimum:   {}", bound_text(sig.minimum));
            println!("    Maximum:   {}", bound_text(sig.maximum));
        }
    }
    Ok(())
}

fn export_map(file: &str, output: &str) -> Result<()> {
    let db: Database = dbc::from_file(file)?;
    export::save_to_file(output, &db)?;
    println!("C++ map entries saved to: {output}");
    Ok(())
}

fn bound_text(bound: Option<f64>) -> String {
    match bound {
        Some(value) => value.to_string(),
        None => "unset".to_string(),
    }
}
