use crate::processor::{CommandProcessor, Removed};
use crate::venv::EnvironmentBuilder;
use anyhow::Result;

pub fn run_remove<B: EnvironmentBuilder>(
    processor: &CommandProcessor<B>,
    name: &str,
    purge: bool,
) -> Result<()> {
    let removed = processor.remove(name, purge)?;
    println!("{}", summary(&removed, &processor.config().env_path(name)));
    Ok(())
}

fn summary(removed: &Removed, env_path: &std::path::Path) -> String {
    let mut parts = Vec::new();
    if removed.alias_lines > 0 {
        parts.push("alias");
    }
    if removed.had_description {
        parts.push("description");
    }
    let what = if parts.is_empty() {
        "nothing registered".to_string()
    } else {
        parts.join(" and ")
    };
    match &removed.purged {
        Some(path) => format!(
            "Deleted \"{}\": removed {what} and {}",
            removed.name,
            path.display()
        ),
        None if env_path.is_dir() => format!(
            "Removed {what} of \"{}\"; environment kept at {} (use --purge to delete it)",
            removed.name,
            env_path.display()
        ),
        None => format!("Removed {what} of \"{}\"", removed.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn summary_mentions_purged_directory() {
        let removed = Removed {
            name: "web".into(),
            alias_lines: 1,
            had_description: true,
            purged: Some(PathBuf::from("/e/web")),
        };
        assert_eq!(
            summary(&removed, Path::new("/e/web")),
            "Deleted \"web\": removed alias and description and /e/web"
        );
    }

    #[test]
    fn summary_points_at_kept_directory() {
        let dir = tempfile::tempdir().unwrap();
        let removed = Removed {
            name: "web".into(),
            alias_lines: 0,
            had_description: true,
            purged: None,
        };
        let msg = summary(&removed, dir.path());
        assert!(msg.starts_with("Removed description of \"web\"; environment kept at"));
        assert!(msg.ends_with("(use --purge to delete it)"));
    }
}
