//! Eligibility filtering of the raw repository list.

use tracing::debug;

use crate::config::PolicyFlags;
use crate::github::SourceRepository;
use crate::mapping::MappingTable;

/// Apply mapping eligibility and policy filters. Checks are independent
/// AND conditions; their order only affects the skip diagnostics. Output
/// preserves input order and never deduplicates.
pub fn filter_repositories(
    repos: Vec<SourceRepository>,
    table: &MappingTable,
    policy: &PolicyFlags,
) -> Vec<SourceRepository> {
    let mut eligible = Vec::with_capacity(repos.len());

    for repo in repos {
        if !table.is_eligible(&repo.full_name) {
            debug!("Skipping {}: no mapping rule matches", repo.full_name);
            continue;
        }

        if repo.is_archived && !policy.migrate_archived {
            debug!("Skipping {}: archived", repo.full_name);
            continue;
        }

        if repo.is_fork && !policy.migrate_forks {
            debug!("Skipping {}: fork", repo.full_name);
            continue;
        }

        if repo.is_private && !policy.migrate_private {
            debug!("Skipping {}: private", repo.full_name);
            continue;
        }

        eligible.push(repo);
    }

    eligible
}
