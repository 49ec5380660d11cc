use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use flagrefs::config::{load_config, CliOverrides};
use flagrefs::remote::ApiClient;
use flagrefs::types::BranchRep;
use flagrefs::{parse, search, RepoWorkspace};

/// Scans a checked-out source tree for feature flag references and publishes
/// the per-branch inventory to the flag service.
#[derive(Parser)]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to scan; must be inside a git work tree.
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long)]
    access_token: Option<String>,
    #[arg(long)]
    base_uri: Option<String>,
    #[arg(long)]
    proj_key: Option<String>,
    #[arg(long)]
    repo_name: Option<String>,
    /// Context lines around each match (-1 to 5); -1 suppresses line text.
    #[arg(long)]
    context_lines: Option<i32>,
    /// Pattern excluding matching repo-relative paths from the scan.
    #[arg(long)]
    exclude: Option<String>,
    /// Print the branch payload instead of publishing it.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    // Quiet down chatty HTTP client internals
    builder
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn);
    builder.init();

    let cfg = load_config(CliOverrides {
        config_path: args.config,
        access_token: args.access_token,
        base_uri: args.base_uri,
        proj_key: args.proj_key,
        repo_name: args.repo_name,
        dir: args.dir,
        context_lines: args.context_lines,
        exclude: args.exclude,
        dry_run: args.dry_run,
    })?;
    let exclude = cfg.exclude_regex()?;

    let workspace = RepoWorkspace::open(&cfg.dir)?;
    info!(
        "scanning {} on branch {} at {}",
        workspace.root.display(),
        workspace.branch,
        workspace.head_sha
    );

    let client = ApiClient::new(&cfg.base_uri, &cfg.access_token)?;
    let flags = client.flag_keys(&cfg.proj_key)?;
    if flags.is_empty() {
        info!(
            "no flag keys found for project {}, exiting early",
            cfg.proj_key
        );
        return Ok(());
    }
    info!("found {} flag keys for project {}", flags.len(), cfg.proj_key);

    let raw = search::search_for_flags(&workspace.root, &flags, cfg.context_lines)?;
    let records = parse::parse_grep_output(&workspace.root, &raw)?;
    let refs = parse::generate_references_from_grep(&flags, records, cfg.context_lines, &exclude);
    let references = parse::make_reference_hunks_reps(refs, cfg.context_lines, &cfg.proj_key);
    info!("found flag references in {} files", references.len());

    let branch = BranchRep::new(&workspace.branch, &workspace.head_sha, references);
    if cfg.dry_run {
        println!("{}", serde_json::to_string_pretty(&branch)?);
        return Ok(());
    }
    client.put_code_references(&cfg.repo_name, &branch)?;
    info!(
        "published code references for {} at {}",
        workspace.branch, workspace.head_sha
    );
    Ok(())
}
