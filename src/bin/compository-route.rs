//! CLI tool to replay UI navigation against a list of installed cells.
//!
//! Usage:
//!   compository-route --cells <cells.json> --dna-hash <hash> [PATH...]
//!
//! The remaining settings come from the same environment variables the web
//! build reads; `--announce` and `--static-demo` override them. Invalid
//! configuration exits with status 1.
//!
//! The cells file is a JSON array of `[dna_hash, agent_pub_key]` pairs.
//! Each PATH is navigated in order and the resulting screen is printed,
//! one line per path.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use compository::{
    AppAction, AppState, CellId, MemoryConductor, MemoryLocation, Router, UiConfig,
    config::DNA_HASH_VAR, connect_to_holochain,
};

#[derive(Parser, Debug)]
#[command(name = "compository-route")]
#[command(about = "Replay compository UI navigation against a list of installed cells")]
struct Args {
    /// JSON file with the installed cells
    #[arg(short, long)]
    cells: PathBuf,

    /// Serialized hash of the compository DNA [default: $COMPOSITORY_DNA_HASH]
    #[arg(short, long)]
    dna_hash: Option<String>,

    /// Announce as a file storage provider after connecting
    #[arg(long)]
    announce: bool,

    /// Simulate a conductor that refuses connections
    #[arg(long)]
    unreachable: bool,

    /// Treat the build as the static demo
    #[arg(long)]
    static_demo: bool,

    /// Paths to navigate, in order
    #[arg(default_value = "/")]
    paths: Vec<String>,
}

fn load_cells(path: &Path) -> Result<Vec<CellId>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Error reading cells file '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Error parsing cells file '{}': {}", path.display(), e))
}

/// Config from the environment, with command line flags taking precedence.
fn load_config<F>(args: &Args, env: F) -> Result<UiConfig, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = UiConfig::from_lookup(|name| {
        if name == DNA_HASH_VAR && args.dna_hash.is_some() {
            return args.dna_hash.clone();
        }
        env(name)
    })
    .map_err(|e| format!("Error in configuration: {}", e))?;

    if args.announce {
        config.file_storage_provider = true;
    }
    if args.static_demo {
        config.static_demo = true;
    }
    Ok(config)
}

fn run<F, W>(args: Args, env: F, out: &mut W) -> Result<(), String>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let config = load_config(&args, env)?;
    let cells = load_cells(&args.cells)?;

    let mut conductor = MemoryConductor::new(cells);
    if args.unreachable {
        conductor = conductor.unreachable();
    }

    let mut state = AppState::new();
    let session = match block_on(connect_to_holochain(&conductor, &config)) {
        Ok(session) => {
            state.apply(AppAction::BootstrapSucceeded {
                announcement: session.announcement.clone(),
            });
            Some(session)
        }
        Err(e) => {
            tracing::warn!(error = %e, "bootstrap failed");
            state.apply(AppAction::BootstrapFailed(e.unavailable_reason()));
            None
        }
    };

    let router = Router::new(MemoryLocation::new());
    for path in &args.paths {
        let navigation = router.navigate(path);
        let lookup = match &session {
            Some(session) => block_on(session.service.lookup_detail(&navigation)),
            None => None,
        };
        state.apply(AppAction::Navigated(navigation));
        if let Some(action) = lookup {
            state.apply(action);
        }

        writeln!(out, "{} -> {}", path, state.screen(config.static_demo))
            .map_err(|e| format!("Error writing output: {}", e))?;
    }

    if let Some(notice) = &state.notice {
        eprintln!("Notice: {}", notice);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let stdout = io::stdout();
    if let Err(e) = run(Args::parse(), |name| env::var(name).ok(), &mut stdout.lock()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const COMPOSITORY: &str = "uAgICAgIC";
    const INSTALLED: &str = "uAQEBAQEB";

    fn cells_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[["{INSTALLED}", "uBwcHBwcH"], ["{COMPOSITORY}", "uBwcHBwcH"]]"#
        )
        .unwrap();
        file
    }

    fn args(cells: &Path, extra: &[&str]) -> Args {
        let mut argv = vec!["compository-route", "--cells", cells.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn output(args: Args, env: impl Fn(&str) -> Option<String>) -> Result<String, String> {
        let mut out = Vec::new();
        run(args, env, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_load_cells_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["uAQEBAQEB", "uBwcHBwcH"], ["uAgICAgIC", "uBwcHBwcH"]]"#).unwrap();

        let cells = load_cells(file.path()).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].dna_hash().to_string(), "uAgICAgIC");
    }

    #[test]
    fn test_load_cells_rejects_bad_hash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["AQEBAQEB", "uBwcHBwcH"]]"#).unwrap();

        let err = load_cells(file.path()).unwrap_err();
        assert!(err.contains("Error parsing cells file"));
    }

    #[test]
    fn test_missing_cells_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_cells(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.contains("Error reading cells file"));
    }

    #[test]
    fn test_run_detail_then_missing_dna() {
        let file = cells_file();
        let detail = format!("/dna/{INSTALLED}");
        let args = args(
            file.path(),
            &["--dna-hash", COMPOSITORY, detail.as_str(), "/dna/zzz", "/"],
        );

        let out = output(args, env_of(&[])).unwrap();
        assert_eq!(
            out,
            format!("{detail} -> dna {INSTALLED}\n/dna/zzz -> nonexisting-dna zzz\n/ -> home\n")
        );
    }

    #[test]
    fn test_run_rejects_invalid_dna_hash() {
        let file = cells_file();
        let err = output(args(file.path(), &["--dna-hash", "not-a-hash"]), env_of(&[]))
            .unwrap_err();
        assert!(err.starts_with("Error in configuration"), "{err}");
    }

    #[test]
    fn test_run_requires_dna_hash() {
        let file = cells_file();
        let err = output(args(file.path(), &[]), env_of(&[])).unwrap_err();
        assert!(err.contains(DNA_HASH_VAR), "{err}");
    }

    #[test]
    fn test_dna_hash_read_from_environment() {
        let file = cells_file();
        let out = output(
            args(file.path(), &["/publish-zome"]),
            env_of(&[(DNA_HASH_VAR, COMPOSITORY)]),
        )
        .unwrap();
        assert_eq!(out, "/publish-zome -> publish-zome\n");
    }

    #[test]
    fn test_invalid_environment_flag_is_an_error() {
        let file = cells_file();
        let err = output(
            args(file.path(), &["--dna-hash", COMPOSITORY]),
            env_of(&[("FILE_STORAGE_PROVIDER", "maybe")]),
        )
        .unwrap_err();
        assert!(err.contains("FILE_STORAGE_PROVIDER"), "{err}");
    }

    #[test]
    fn test_environment_flags_apply() {
        let file = cells_file();
        let out = output(
            args(file.path(), &["--dna-hash", COMPOSITORY]),
            env_of(&[("GH_PAGES", "true")]),
        )
        .unwrap();
        assert_eq!(out, "/ -> holochain-not-present\n");
    }

    #[test]
    fn test_flags_override_environment() {
        let file = cells_file();
        let config = load_config(
            &args(file.path(), &["--dna-hash", COMPOSITORY, "--announce", "--static-demo"]),
            env_of(&[
                (DNA_HASH_VAR, INSTALLED),
                ("FILE_STORAGE_PROVIDER", "false"),
                ("GH_PAGES", "0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.compository_dna_hash, COMPOSITORY);
        assert!(config.file_storage_provider);
        assert!(config.static_demo);
    }

    #[test]
    fn test_run_missing_compository_dna_is_not_a_config_error() {
        let file = cells_file();
        let out = output(
            args(file.path(), &["--dna-hash", "uCQkJCQkJ"]),
            env_of(&[]),
        )
        .unwrap();
        assert!(out.starts_with("/ -> holochain-not-present ("), "{out}");
    }
}
