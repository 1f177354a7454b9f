use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "quickenv",
    about = "quickenv: create Python virtual environments and register shell aliases to activate them",
    long_about = "Manages Python virtual environments.\n\n\
        Environments are stored in the directory given with --path, the QUICKENV_DIRECTORY \
        environment variable, or ~/.quickenvs by default. Each one gets an alias in \
        ~/.bash_aliases (or QUICKENV_ALIASES_FILE) that activates it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory that holds the environments (defaults to $QUICKENV_DIRECTORY or ~/.quickenvs)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Shell startup file that receives alias lines (defaults to $QUICKENV_ALIASES_FILE or ~/.bash_aliases)
    #[arg(long, global = true, value_name = "FILE")]
    pub aliases_file: Option<PathBuf>,

    /// Path to config (defaults to $QUICKENV_CONFIG or <config dir>/quickenv/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new virtual environment and register an alias that activates it.
    /// Examples:
    ///   quickenv create web                         # alias `web`
    ///   quickenv create data-science -a ds -d "Jupyter + pandas"
    ///   quickenv create legacy --python python3.8 --without-pip
    Create {
        /// Environment name (letters, digits, '.', '_', '-')
        name: String,
        /// Description for the environment
        #[arg(short, long)]
        description: Option<String>,
        /// Custom alias (otherwise it will be the name of the venv)
        #[arg(short, long)]
        alias: Option<String>,
        /// Interpreter used to create the venv (command name or path)
        #[arg(long, value_name = "PYTHON")]
        python: Option<String>,
        /// Skip installing pip into the new environment
        #[arg(long)]
        without_pip: bool,
    },
    /// List environments with their alias and description
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Set or replace the description of an environment
    Describe {
        name: String,
        /// New description
        #[arg(value_name = "TEXT")]
        description: String,
    },
    /// Remove an environment's alias and description (the directory stays unless --purge)
    #[command(visible_alias = "delete")]
    Remove {
        name: String,
        /// Also delete the environment directory
        #[arg(long)]
        purge: bool,
    },
}
