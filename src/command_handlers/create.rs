use crate::config::QuickenvConfig;
use crate::error::QuickenvResult;
use crate::names::{validate_alias, validate_env_name};
use crate::processor::{CommandProcessor, CreateRequest, Created};
use crate::venv::PythonVenv;
use anyhow::Result;

pub struct CreateArgs<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub alias: Option<&'a str>,
    pub python: Option<String>,
    pub without_pip: bool,
}

pub fn run_create(args: CreateArgs, cfg: QuickenvConfig) -> Result<()> {
    let banner = announce(&args)?;
    let python = args.python.or_else(|| cfg.python.clone());
    let with_pip = cfg.with_pip && !args.without_pip;
    let processor = CommandProcessor::new(cfg, PythonVenv::new(python, with_pip));
    println!("{banner}");
    let created = processor.create(CreateRequest {
        name: args.name,
        description: args.description,
        alias: args.alias,
    })?;
    println!("{}", done_message(&created, processor.config()));
    Ok(())
}

// Only announce work for a request that can start.
fn announce(args: &CreateArgs) -> QuickenvResult<String> {
    validate_env_name(args.name)?;
    validate_alias(args.alias.unwrap_or(args.name))?;
    Ok(format!("Creating {}...", args.name))
}

fn done_message(created: &Created, cfg: &QuickenvConfig) -> String {
    let python = created
        .python_version
        .as_deref()
        .map(|v| format!(" (Python {v})"))
        .unwrap_or_default();
    format!(
        "Created {}{python} at {}.\nDone. Source '{}' or start a new shell and run '{}' to activate the venv.",
        created.name,
        created.path.display(),
        cfg.aliases_file.display(),
        created.alias
    )
}
