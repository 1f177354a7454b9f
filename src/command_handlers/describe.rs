use crate::processor::CommandProcessor;
use crate::venv::EnvironmentBuilder;
use anyhow::Result;

pub fn run_describe<B: EnvironmentBuilder>(
    processor: &CommandProcessor<B>,
    name: &str,
    description: &str,
) -> Result<()> {
    processor.describe(name, description)?;
    println!("Updated description of \"{name}\"");
    Ok(())
}
