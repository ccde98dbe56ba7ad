use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prayer-times", version, author, about = "Today's prayer times for your city, cached locally")]
pub struct Cli {
    /// City to look up (overrides the configured city)
    #[arg(long, global = true)]
    pub city: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times (the default)
    Times,
    /// Save the city used when --city is not given
    SetCity {
        /// City name, e.g. "Nairobi"
        city: String,
    },
    /// Print the config file and cache database locations
    Paths,
}
