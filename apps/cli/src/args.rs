use clap::{Parser, Subcommand, ValueHint};

#[derive(Parser, Debug)]
#[command(name = "ratefeed", author, version, about = "Coin to fiat exchange rates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Never touch the network; answer from the current or cached table
    #[arg(long, global = true)]
    pub offline: bool,

    /// Directory holding the settings database. Overrides RATEFEED_DATA_DIR.
    #[arg(long, value_hint = ValueHint::DirPath, global = true)]
    pub data_dir: Option<String>,

    /// Store the preferred exchange currency before running the command
    #[arg(long, value_name = "CODE", global = true)]
    pub set_currency: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every known rate (default)
    List,

    /// Print rates whose code or symbol contains TEXT
    Search { text: String },

    /// Print the best rate for CODE, the stored currency, or the locale's
    Best { code: Option<String> },
}
