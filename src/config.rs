use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

use crate::interpreter::EofPolicy;
use crate::tape::DEFAULT_CAPACITY;

/// Environment variable names consulted during resolution.
pub const ENV_EOF: &str = "BF_EOF";
pub const ENV_TAPE_CAPACITY: &str = "BF_TAPE_CAPACITY";
pub const ENV_MAX_STEPS: &str = "BF_MAX_STEPS";

/// Everything a single invocation needs, resolved once up front and then
/// passed by value into the compiler and interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Print opcode bytes instead of executing.
    pub dump: bool,
    /// Print a disassembly listing instead of executing.
    pub listing: bool,
    pub fuse: bool,
    pub eof: EofPolicy,
    /// Cells on each side of the tape origin.
    pub tape_capacity: usize,
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dump: false,
            listing: false,
            fuse: true,
            eof: EofPolicy::default(),
            tape_capacity: DEFAULT_CAPACITY,
            max_steps: None,
        }
    }
}

/// Values given on the command line; `None` defers to the next layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dump: bool,
    pub listing: bool,
    pub no_fuse: bool,
    pub eof: Option<EofPolicy>,
    pub tape_capacity: Option<usize>,
    pub max_steps: Option<u64>,
}

/// Settings read from the `[run]` section of `bf.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub fuse: Option<bool>,
    pub eof: Option<EofPolicy>,
    pub tape_capacity: Option<usize>,
    pub max_steps: Option<u64>,
}

impl Config {
    /// Resolve with the process environment and the user's config file.
    pub fn load(overrides: &Overrides) -> Self {
        let file = load_file_settings().unwrap_or_default();
        Self::resolve(overrides, |key| std::env::var(key).ok(), &file)
    }

    /// Layering: flags -> env -> config file -> defaults. Values that fail to
    /// parse are skipped so the next layer applies.
    pub fn resolve<E>(overrides: &Overrides, env: E, file: &FileSettings) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let eof = overrides
            .eof
            .or_else(|| env_parsed(&env, ENV_EOF))
            .or(file.eof)
            .unwrap_or(defaults.eof);
        let tape_capacity = overrides
            .tape_capacity
            .or_else(|| env_parsed(&env, ENV_TAPE_CAPACITY))
            .or(file.tape_capacity)
            .unwrap_or(defaults.tape_capacity);
        let max_steps = overrides
            .max_steps
            .or_else(|| env_parsed(&env, ENV_MAX_STEPS))
            .or(file.max_steps);
        let fuse = !overrides.no_fuse && file.fuse.unwrap_or(defaults.fuse);

        let config = Self {
            dump: overrides.dump,
            listing: overrides.listing,
            fuse,
            eof,
            tape_capacity,
            max_steps,
        };
        debug!(?config, "resolved configuration");
        config
    }
}

fn env_parsed<E, T>(env: &E, key: &str) -> Option<T>
where
    E: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed environment value");
            None
        }
    }
}

/// `$XDG_CONFIG_HOME/bf.toml`, if a home directory can be determined.
pub fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;

    // Linux: /home/<user>/.config, macOS: /Users/<user>/.config,
    // Windows: C:\Users\<user>\.config
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_file_settings() -> Option<FileSettings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!(path = %path.display(), "loaded config file");
    Some(parse_settings(&content))
}

/// Parse the `[run]` section of a small TOML-like file. Only flat
/// `key = value` pairs are understood; everything else is ignored.
pub fn parse_settings(content: &str) -> FileSettings {
    let mut in_run = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_run = line[1..line.len() - 1].trim() == "run";
            continue;
        }
        if !in_run {
            continue;
        }
        if let Some((key, raw)) = line.split_once('=') {
            let raw = raw.trim();
            // Accept quoted or unquoted
            let value = raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(raw);
            map.insert(key.trim().to_string(), value.to_string());
        }
    }

    let parsed = |key: &str| map.get(key).map(String::as_str);
    FileSettings {
        fuse: parsed("fuse").and_then(|v| v.parse().ok()),
        eof: parsed("eof").and_then(|v| v.parse().ok()),
        tape_capacity: parsed("tape_capacity").and_then(|v| v.replace('_', "").parse().ok()),
        max_steps: parsed("max_steps").and_then(|v| v.replace('_', "").parse().ok()),
    }
}
