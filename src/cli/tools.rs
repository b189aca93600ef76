use std::path::{Path, PathBuf};
use console::style;
use crate::cli::commands::ToolsArgs;
use crate::errors::TriageError;

pub async fn handle_tools(args: ToolsArgs, quiet: bool) -> Result<(), TriageError> {
    let file_config = super::load_config(args.config.as_deref()).await?;
    let catalog = file_config.catalog();

    for tool in catalog.names() {
        if quiet {
            println!("{}", tool);
            continue;
        }
        match find_on_path(tool) {
            Some(path) => println!("  {} {:<16} {}", style("✔").green(), tool, style(path.display()).dim()),
            None => println!("  {} {:<16} {}", style("✗").red(), tool, style("not installed").red().dim()),
        }
    }
    Ok(())
}

/// First executable file named `tool` on `PATH`, or `tool` itself if it is a path.
pub fn find_on_path(tool: &str) -> Option<PathBuf> {
    if tool.contains('/') {
        let path = PathBuf::from(tool);
        return is_executable(&path).then_some(path);
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_finds_sh() {
        assert!(find_on_path("sh").is_some());
    }

    #[test]
    fn test_missing_tool() {
        assert!(find_on_path("definitely-not-installed-xyz").is_none());
    }
}
