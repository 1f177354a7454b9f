use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit code for "already exists" / "does not exist" conditions.
pub const EXIT_CONFLICT: i32 = 126;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum QuickenvError {
    #[error("invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("a virtual environment named '{name}' already exists at {}", path.display())]
    EnvironmentExists { name: String, path: PathBuf },
    #[error("creating virtual environment '{name}' failed: {reason}")]
    CreationError { name: String, reason: String },
    #[error("unknown virtual environment '{name}'")]
    UnknownEnvironment { name: String },
    #[error("alias '{alias}' is already in use in {}", file.display())]
    AliasInUse { alias: String, file: PathBuf },
    #[error("environment '{name}' was created at {}, but alias registration failed: {source}", path.display())]
    AliasRegistration {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<QuickenvError>,
    },
    #[error("environment '{name}' and its alias were created, but saving the description failed: {source}")]
    DescriptionRegistration {
        name: String,
        #[source]
        source: Box<QuickenvError>,
    },
    #[error("removed the alias of '{name}', but updating its description failed: {source}")]
    DescriptionRemoval {
        name: String,
        #[source]
        source: Box<QuickenvError>,
    },
    #[error("{}", describe_access(path, source))]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

pub type QuickenvResult<T> = std::result::Result<T, QuickenvError>;

impl QuickenvError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuickenvError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            QuickenvError::EnvironmentExists { .. }
            | QuickenvError::UnknownEnvironment { .. }
            | QuickenvError::AliasInUse { .. } => EXIT_CONFLICT,
            _ => EXIT_FAILURE,
        }
    }
}

// fs-err and io_context messages already carry the path
fn describe_access(path: &Path, source: &std::io::Error) -> String {
    let msg = source.to_string();
    let shown = path.display().to_string();
    if msg.contains(&shown) {
        msg
    } else {
        format!("{shown}: {msg}")
    }
}

/// Word a bare std error the way fs-err does, for calls fs-err cannot wrap.
pub fn io_context(op: &str, path: &Path, source: std::io::Error) -> std::io::Error {
    std::io::Error::new(
        source.kind(),
        format!("failed to {op} `{}`: {source}", path.display()),
    )
}

/// Pick the process exit code for an error bubbling out of a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<QuickenvError>())
        .map(QuickenvError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

/// Render an error and its causes as one line, skipping causes whose text an outer
/// message already includes.
pub fn one_line_message(err: &anyhow::Error) -> String {
    let mut out = String::new();
    for cause in err.chain() {
        let msg = cause.to_string();
        let msg = msg.trim();
        if msg.is_empty() || out.contains(msg) {
            continue;
        }
        if !out.is_empty() {
            out.push_str(": ");
        }
        out.push_str(msg);
    }
    out.replace(['\n', '\r'], " ")
}
