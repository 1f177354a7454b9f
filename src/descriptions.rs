use crate::error::QuickenvResult;
use crate::fs_utils::{read_or_empty, write_atomically};
use std::collections::BTreeMap;
use std::path::PathBuf;

const HEADER: &str = "# quickenv descriptions: name<TAB>description";

/// Name -> description records persisted as `name\tdescription` lines, sorted by name.
#[derive(Debug, Clone)]
pub struct DescriptionStore {
    path: PathBuf,
    records: BTreeMap<String, String>,
}

impl DescriptionStore {
    /// Load the store; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> QuickenvResult<Self> {
        let path = path.into();
        let data = read_or_empty(&path)?;
        Ok(DescriptionStore {
            records: parse(&data),
            path,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.records.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, description: &str) {
        self.records.insert(name.to_string(), description.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.records.remove(name)
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn save(&self) -> QuickenvResult<()> {
        write_atomically(&self.path, &render(&self.records))
    }
}

fn parse(data: &str) -> BTreeMap<String, String> {
    let mut records = BTreeMap::new();
    for line in data.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, description) = line.split_once('\t').unwrap_or((line, ""));
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("skipping description record without a name: {line:?}");
            continue;
        }
        records.insert(name.to_string(), unescape(description));
    }
    records
}

fn render(records: &BTreeMap<String, String>) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (name, description) in records {
        out.push_str(name);
        out.push('\t');
        out.push_str(&escape(description));
        out.push('\n');
    }
    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_sorted_tab_separated_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("descriptions.tsv");
        let mut store = DescriptionStore::load(&path).unwrap();
        assert_eq!(store.len(), 0);
        store.set("b", "");
        store.set("a", "first");
        store.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{HEADER}\na\tfirst\nb\t\n"));
    }

    #[test]
    fn awkward_descriptions_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.tsv");
        let mut store = DescriptionStore::load(&path).unwrap();
        let tricky = "tabs\there\nnew line and a \\ backslash";
        store.set("x", tricky);
        store.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let reloaded = DescriptionStore::load(&path).unwrap();
        assert_eq!(reloaded.get("x"), Some(tricky));
    }

    #[test]
    fn tolerates_hand_edited_files() {
        let records = parse("# comment\n\nweb\tFlask app\nbare\n  \n");
        assert_eq!(records.len(), 2);
        assert_eq!(records["web"], "Flask app");
        assert_eq!(records["bare"], "");
    }

    #[test]
    fn remove_drops_only_the_named_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.tsv");
        std::fs::write(&path, "a\tfirst\nb\tsecond\n").unwrap();
        let mut store = DescriptionStore::load(&path).unwrap();
        assert_eq!(store.remove("a").as_deref(), Some("first"));
        store.save().unwrap();
        let names: Vec<_> = DescriptionStore::load(&path)
            .unwrap()
            .iter()
            .map(|(n, d)| (n.to_string(), d.to_string()))
            .collect();
        assert_eq!(names, vec![("b".to_string(), "second".to_string())]);
    }
}
