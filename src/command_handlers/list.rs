use crate::processor::{CommandProcessor, EnvListing};
use crate::venv::EnvironmentBuilder;
use anyhow::{Context, Result};

pub fn run_list<B: EnvironmentBuilder>(processor: &CommandProcessor<B>, json: bool) -> Result<()> {
    let entries = processor.list()?;
    if json {
        let out = serde_json::to_string_pretty(&entries).context("serializing environment list")?;
        println!("{out}");
        return Ok(());
    }
    if entries.is_empty() {
        eprintln!("No virtual environments found.");
        return Ok(());
    }
    print!("{}", render(&entries));
    Ok(())
}

/// One line per environment: padded name, description, then alias and state notes.
fn render(entries: &[EnvListing]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for e in entries {
        // keep one record per line even when a description spans several
        let description = e.description.replace(['\n', '\r'], " ");
        let mut line = format!("{:<width$}  {description}", e.name);
        if let Some(alias) = e.alias.as_deref().filter(|a| *a != e.name) {
            line.push_str(&format!(" (alias: {alias})"));
        }
        if !e.present {
            line.push_str(" [missing]");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, description: &str, alias: Option<&str>, present: bool) -> EnvListing {
        EnvListing {
            name: name.into(),
            description: description.into(),
            alias: alias.map(str::to_string),
            activate: alias.map(|a| format!(". /e/{a}/bin/activate")),
            present,
        }
    }

    #[test]
    fn renders_one_line_per_environment() {
        let text = render(&[
            entry("a", "first", Some("a"), true),
            entry("b", "", None, false),
            entry("data-science", "notebooks\nand plots", Some("ds"), true),
        ]);
        assert_eq!(
            text,
            "a             first\n\
             b              [missing]\n\
             data-science  notebooks and plots (alias: ds)\n"
        );
    }

    #[test]
    fn json_shape_is_stable() {
        let json = serde_json::to_value([entry("a", "two\nlines", Some("x"), true)]).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "name": "a",
                "description": "two\nlines",
                "alias": "x",
                "activate": ". /e/x/bin/activate",
                "present": true
            }])
        );
    }
}
