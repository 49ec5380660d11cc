use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Effective run configuration after the merge: defaults <- config file
/// <- `FLAGREFS_*` env vars (the CI wrapper's surface) <- CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub base_uri: String,
    pub proj_key: String,
    pub repo_name: String,
    pub dir: PathBuf,
    /// Context lines around each match, in [-1, 5]. 0 sends matched lines
    /// only; -1 scrubs line text entirely.
    pub context_lines: i32,
    /// Pattern excluding matching repo-relative paths; empty matches nothing.
    pub exclude: String,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            access_token: String::new(),
            base_uri: String::new(),
            proj_key: String::new(),
            repo_name: String::new(),
            dir: PathBuf::from("."),
            context_lines: 2,
            exclude: String::new(),
            dry_run: false,
        }
    }
}

/// CLI-level overrides that the binary passes to `load_config`.
/// Keep this small and explicit.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub access_token: Option<String>,
    pub base_uri: Option<String>,
    pub proj_key: Option<String>,
    pub repo_name: Option<String>,
    pub dir: Option<PathBuf>,
    pub context_lines: Option<i32>,
    pub exclude: Option<String>,
    pub dry_run: bool,
}

/// Load and merge the configuration, then validate it.
pub fn load_config(opts: CliOverrides) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = opts.config_path.as_ref() {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            let v: toml::Value = toml::from_str(&s)
                .with_context(|| format!("could not parse config file {}", path.display()))?;
            if let Some(t) = v.get("access_token").and_then(|x| x.as_str()) {
                cfg.access_token = t.to_string();
            }
            if let Some(u) = v.get("base_uri").and_then(|x| x.as_str()) {
                cfg.base_uri = u.to_string();
            }
            if let Some(p) = v.get("proj_key").and_then(|x| x.as_str()) {
                cfg.proj_key = p.to_string();
            }
            if let Some(r) = v.get("repo_name").and_then(|x| x.as_str()) {
                cfg.repo_name = r.to_string();
            }
            if let Some(d) = v.get("dir").and_then(|x| x.as_str()) {
                cfg.dir = PathBuf::from(d);
            }
            if let Some(c) = v.get("context_lines").and_then(|x| x.as_integer()) {
                cfg.context_lines = c as i32;
            }
            if let Some(e) = v.get("exclude").and_then(|x| x.as_str()) {
                cfg.exclude = e.to_string();
            }
        }
    }

    // env vars override file; unparseable numeric values are ignored
    if let Ok(t) = std::env::var("FLAGREFS_ACCESS_TOKEN") {
        cfg.access_token = t;
    }
    if let Ok(u) = std::env::var("FLAGREFS_BASE_URI") {
        cfg.base_uri = u;
    }
    if let Ok(p) = std::env::var("FLAGREFS_PROJ_KEY") {
        cfg.proj_key = p;
    }
    if let Ok(r) = std::env::var("FLAGREFS_REPO_NAME") {
        cfg.repo_name = r;
    }
    if let Ok(d) = std::env::var("FLAGREFS_DIR") {
        cfg.dir = PathBuf::from(d);
    }
    if let Ok(c) = std::env::var("FLAGREFS_CONTEXT_LINES") {
        if let Ok(n) = c.parse::<i32>() {
            cfg.context_lines = n;
        }
    }
    if let Ok(e) = std::env::var("FLAGREFS_EXCLUDE") {
        cfg.exclude = e;
    }
    if let Ok(d) = std::env::var("FLAGREFS_DRY_RUN") {
        cfg.dry_run = is_truthy(&d);
    }

    // CLI overrides everything
    if let Some(t) = opts.access_token {
        cfg.access_token = t;
    }
    if let Some(u) = opts.base_uri {
        cfg.base_uri = u;
    }
    if let Some(p) = opts.proj_key {
        cfg.proj_key = p;
    }
    if let Some(r) = opts.repo_name {
        cfg.repo_name = r;
    }
    if let Some(d) = opts.dir {
        cfg.dir = d;
    }
    if let Some(c) = opts.context_lines {
        cfg.context_lines = c;
    }
    if let Some(e) = opts.exclude {
        cfg.exclude = e;
    }
    if opts.dry_run {
        cfg.dry_run = true;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn is_truthy(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "True" | "yes" | "YES")
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            bail!("access token is required (FLAGREFS_ACCESS_TOKEN or --access-token)");
        }
        if self.base_uri.is_empty() {
            bail!("base uri is required (FLAGREFS_BASE_URI or --base-uri)");
        }
        if self.proj_key.is_empty() {
            bail!("project key is required (FLAGREFS_PROJ_KEY or --proj-key)");
        }
        if self.repo_name.is_empty() {
            bail!("repo name is required (FLAGREFS_REPO_NAME or --repo-name)");
        }
        if !(-1..=5).contains(&self.context_lines) {
            bail!(
                "context lines must be between -1 and 5, got {}",
                self.context_lines
            );
        }
        self.exclude_regex()?;
        Ok(())
    }

    /// The compiled exclude pattern. An empty pattern compiles fine and is
    /// treated downstream as matching nothing.
    pub fn exclude_regex(&self) -> Result<Regex> {
        Regex::new(&self.exclude)
            .with_context(|| format!("invalid exclude pattern: {}", self.exclude))
    }
}
