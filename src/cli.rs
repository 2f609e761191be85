use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shortcut-coach",
    version,
    about = "Watches mouse-driven actions and suggests the keyboard shortcut"
)]
pub struct Cli {
    /// Directory for settings.json and the event database
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON shortcut catalog to use instead of the builtin one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// JSON-lines raw input events to feed the pipeline ("-" for stdin)
    #[arg(long, value_name = "FILE", default_value = "-")]
    pub replay: String,

    /// Feed replayed events without waiting out their recorded gaps
    #[arg(long)]
    pub fast: bool,

    /// Print tip statistics from the event store and exit
    #[arg(long, conflicts_with_all = ["search", "list"])]
    pub summary: bool,

    /// Search the catalog and exit
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// List the catalog entries for one app and exit
    #[arg(long, value_name = "APP")]
    pub list: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn replay_defaults_to_stdin() {
        let cli = Cli::parse_from(["shortcut-coach", "--fast"]);
        assert_eq!(cli.replay, "-");
        assert!(cli.fast);
        assert!(Cli::try_parse_from(["shortcut-coach", "--summary", "--search", "copy"]).is_err());
    }
}
