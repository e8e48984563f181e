use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitea_migrate::filter::filter_repositories;
use gitea_migrate::mapping;
use gitea_migrate::{
    GiteaClient, GitHubClient, Migrator, Outcome, PolicyFlags, RepoSource, Settings,
};

#[derive(Parser)]
#[command(name = "gitea-migrate")]
#[command(about = "Create Gitea migration jobs mirroring GitHub repositories")]
#[command(version)]
struct Cli {
    /// URL of the Gitea instance
    #[arg(long)]
    gitea_url: String,

    /// Token to interact with the Gitea instance (or GITEA_TOKEN)
    #[arg(long)]
    gitea_token: Option<String>,

    /// GitHub access token (or GITHUB_TOKEN)
    #[arg(long)]
    github_token: Option<String>,

    /// YAML mapping file; authoritative when given
    #[arg(long)]
    map_file: Option<std::path::PathBuf>,

    /// Regular expression matched against source repo full names (e.g. '^acme/.*$')
    #[arg(long)]
    source_expression: Option<String>,

    /// ID of the Gitea user or organization to assign repositories to
    #[arg(long)]
    target_user: Option<i64>,

    /// Username of the target ID (to check whether a repo already exists)
    #[arg(long)]
    target_user_name: Option<String>,

    /// Only report actions to be done, don't execute them
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Migrate archived repositories
    #[arg(long)]
    migrate_archived: bool,

    /// Migrate forked repositories
    #[arg(long)]
    migrate_forks: bool,

    /// Skip private repositories (migrating one embeds the GitHub token as its sync credential)
    #[arg(long)]
    skip_private: bool,

    /// Create one-time clones instead of continuously syncing mirrors
    #[arg(long)]
    no_mirror: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        dry_run = cli.dry_run,
        "gitea-migrate started"
    );

    let policy = PolicyFlags {
        migrate_archived: cli.migrate_archived,
        migrate_forks: cli.migrate_forks,
        migrate_private: !cli.skip_private,
        mirror: !cli.no_mirror,
        dry_run: cli.dry_run,
    };

    // Fatal configuration errors abort here, before any listing or mutation
    let table = mapping::build_table(
        cli.map_file.as_deref(),
        cli.source_expression.as_deref(),
        cli.target_user,
        cli.target_user_name.as_deref(),
    )?;
    info!("Mapping table loaded with {} rule(s)", table.len());

    let settings = Settings::new(cli.gitea_url, cli.gitea_token, cli.github_token, policy)?;

    let github = GitHubClient::new(&settings.github_token)?;
    let gitea = GiteaClient::new(&settings.gitea_url, &settings.gitea_token);

    info!("Collecting source repos...");
    let repos = github
        .list_repositories()
        .await
        .context("Failed to list source repositories")?;

    let eligible = filter_repositories(repos, &table, &settings.policy);
    info!("{} repositories eligible for migration", eligible.len());

    info!("Creating target repos...");
    let migrator = Migrator::new(&table, &gitea, settings.policy, settings.github_token.clone());
    let summary = migrator.run(&eligible).await;

    println!();
    println!("Migration summary:");
    println!("   Total processed:  {}", summary.total);
    println!("   Created:          {}", summary.created);
    println!("   Already existing: {}", summary.already_exists);
    if policy.dry_run {
        println!("   Would create:     {}", summary.would_create);
    }
    println!("   Failed:           {}", summary.failed);
    println!("   Duration:         {:.2}s", summary.duration.as_secs_f64());

    // Per-repository failures are reported but never change the exit status
    if summary.failed > 0 {
        println!();
        println!("Failed repositories:");
        for result in &summary.results {
            if let Outcome::Failed(reason) = &result.outcome {
                println!("   {}: {}", result.full_name, reason);
            }
        }
    }

    Ok(())
}

/// Initialize logging; RUST_LOG overrides the --log-level flag
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
