mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

const EXPORT_FILE: &str = "weddingbudget-export.csv";

/// Expand a leading `~/` to the user's home directory.
pub(crate) fn shellexpand(path: &str) -> String {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => format!("{home}/{rest}"),
        _ => path.to_string(),
    }
}

pub(crate) fn default_export_path() -> String {
    match home_dir() {
        Some(home) => format!("{home}/{EXPORT_FILE}"),
        None => EXPORT_FILE.to_string(),
    }
}

fn home_dir() -> Option<String> {
    directories::UserDirs::new().map(|d| d.home_dir().display().to_string())
}
