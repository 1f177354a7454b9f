use crate::cli::Commands;
use crate::command_handlers::{create, describe, list, remove};
use crate::config::QuickenvConfig;
use crate::processor::CommandProcessor;
use crate::venv::PythonVenv;
use anyhow::Result;

pub fn dispatch(cmd: Commands, cfg: QuickenvConfig) -> Result<()> {
    match cmd {
        Commands::Create {
            name,
            description,
            alias,
            python,
            without_pip,
        } => {
            let args = create::CreateArgs {
                name: &name,
                description: description.as_deref(),
                alias: alias.as_deref(),
                python,
                without_pip,
            };
            create::run_create(args, cfg)
        }
        Commands::List { json } => list::run_list(&processor(cfg), json),
        Commands::Describe { name, description } => {
            describe::run_describe(&processor(cfg), &name, &description)
        }
        Commands::Remove { name, purge } => remove::run_remove(&processor(cfg), &name, purge),
    }
}

// Commands other than create never spawn the builder.
fn processor(cfg: QuickenvConfig) -> CommandProcessor<PythonVenv> {
    let builder = PythonVenv::new(cfg.python.clone(), cfg.with_pip);
    CommandProcessor::new(cfg, builder)
}
