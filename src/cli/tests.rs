//! Tests for argument parsing and the file-level run.

use super::*;
use std::ffi::OsStr;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["make-ssh-config"]).unwrap();
    assert_eq!(cli.input, PathBuf::from("config.yaml"));
    assert!(!cli.verbose && !cli.quiet);
    assert_eq!(cli.build_config().log_level.as_deref(), Some("warn"));
}

#[test]
fn test_verbosity_levels() {
    let cli = Cli::try_parse_from(["make-ssh-config", "-v"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

    let cli = Cli::try_parse_from(["make-ssh-config", "--quiet"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("error"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["make-ssh-config", "-v", "-q"]).is_err());
}

#[test]
fn test_execute_writes_output_file() -> Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("layers.yaml");
    let output = temp.path().join("ssh_config");
    std::fs::write(&input, "- host: box\n  config: { User: me }\n")?;

    let cli = Cli::try_parse_from([
        OsStr::new("make-ssh-config"),
        input.as_os_str(),
        OsStr::new("--output"),
        output.as_os_str(),
    ])?;
    cli.execute_with_config(CliConfig::new())?;

    assert_eq!(std::fs::read_to_string(&output)?, "Host box\n    User me\n\n");
    Ok(())
}

#[test]
fn test_failed_run_leaves_output_untouched() -> Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("layers.yaml");
    let output = temp.path().join("ssh_config");
    std::fs::write(&input, "- host: ok\n- merge: missing\n  host: bad\n")?;
    std::fs::write(&output, "previous\n")?;

    let cli = Cli::try_parse_from([
        OsStr::new("make-ssh-config"),
        input.as_os_str(),
        OsStr::new("-o"),
        output.as_os_str(),
    ])?;
    assert!(cli.execute_with_config(CliConfig::new()).is_err());

    assert_eq!(std::fs::read_to_string(&output)?, "previous\n");
    Ok(())
}

#[test]
fn test_missing_input_file() {
    let cli = Cli::try_parse_from(["make-ssh-config", "/nonexistent/layers.yaml"]).unwrap();
    let err = cli.execute_with_config(CliConfig::new()).unwrap_err();
    assert!(err.to_string().contains("Failed to read input file"), "{err}");
}
