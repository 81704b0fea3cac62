//! Project initialization.
//!
//! Writes a commented `spritegen.toml` and ignore entries for the output
//! directory. Existing icons and sources are left alone.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::SpritegenConfig;
use crate::log;

/// Files to append the output directory pattern to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Initialization mode determines validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// `spritegen init` - current directory, must not have a config yet
    CurrentDir,
    /// `spritegen init <name>` - new subdirectory, must not exist
    NewDir,
}

/// Initialize a project.
///
/// If `dry_run` is true, only prints the config template to stdout.
pub fn new_project(config: &SpritegenConfig, has_name: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", generate_config_template());
        return Ok(());
    }

    let root = config.get_root();
    let mode = if has_name {
        InitMode::NewDir
    } else {
        InitMode::CurrentDir
    };
    validate_target(root, &config.config_path, mode)?;

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;
    write_config(&config.config_path)?;
    write_ignore_files(root, &config.build.output)?;

    log!("init"; "wrote {}", config.config_path.display());
    Ok(())
}

/// Full config file content with a version header.
pub fn generate_config_template() -> String {
    format!(
        "# spritegen configuration (v{})\n\n{}",
        env!("CARGO_PKG_VERSION"),
        SpritegenConfig::template()
    )
}

/// Validate the target before writing anything.
pub fn validate_target(root: &Path, config_path: &Path, mode: InitMode) -> Result<()> {
    match mode {
        InitMode::CurrentDir if config_path.exists() => bail!(
            "'{}' already exists.\n\
             Edit it directly or remove it first.",
            config_path.display()
        ),
        InitMode::NewDir if root.exists() => bail!(
            "Directory '{}' already exists.\n\
             Choose a different name or run `spritegen init` inside it.",
            root.display()
        ),
        _ => Ok(()),
    }
}

fn write_config(path: &Path) -> Result<()> {
    fs::write(path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))
}

/// Append the output directory to ignore files, creating them if needed.
fn write_ignore_files(root: &Path, output_dir: &Path) -> Result<()> {
    let pattern = format!("/{}/", output_dir.display());

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        let existing = fs::read_to_string(&path).unwrap_or_default();
        if existing.lines().any(|line| line.trim() == pattern) {
            continue;
        }

        let mut content = existing;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&pattern);
        content.push('\n');

        fs::write(&path, content)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;
    use tempfile::TempDir;

    fn init_config(root: &Path) -> SpritegenConfig {
        SpritegenConfig {
            config_path: root.join(CONFIG_FILE),
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.starts_with("# spritegen configuration"));
        assert!(template.contains("[sprite]"));
        assert!(template.contains("[build]"));
        assert!(template.contains("[serve]"));
    }

    #[test]
    fn test_new_project_in_current_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("icons")).unwrap();

        new_project(&init_config(temp.path()), false, false).unwrap();

        let written = fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(written, generate_config_template());
        let ignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(ignore, "/dist/\n");
        assert!(temp.path().join("icons").is_dir());
    }

    #[test]
    fn test_new_project_refuses_existing_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "").unwrap();

        assert!(new_project(&init_config(temp.path()), false, false).is_err());
        assert_eq!(fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap(), "");
    }

    #[test]
    fn test_new_dir_must_not_exist() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app");
        assert!(validate_target(&root, &root.join(CONFIG_FILE), InitMode::NewDir).is_ok());

        fs::create_dir(&root).unwrap();
        assert!(validate_target(&root, &root.join(CONFIG_FILE), InitMode::NewDir).is_err());
    }

    #[test]
    fn test_ignore_file_appended_once() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "node_modules").unwrap();

        write_ignore_files(temp.path(), Path::new("dist")).unwrap();
        write_ignore_files(temp.path(), Path::new("dist")).unwrap();

        let ignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(ignore, "node_modules\n/dist/\n");
    }
}
