// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository URL decomposition

/// Host, owner and repository name of a git remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitUrl {
    pub host: String,
    /// Everything between host and repository, e.g. `group/subgroup`.
    pub owner: String,
    pub repo: String,
}

/// Split a git remote into host, owner and repository name.
///
/// Accepts URL forms (`https://host/owner/repo`, `ssh://git@host:22/owner/repo`)
/// and scp-like forms (`git@host:owner/repo`). Credentials, ports and a
/// trailing `.git` are dropped. Returns `None` when fewer than three path
/// components remain.
pub fn parse_git_url(url: &str) -> Option<GitUrl> {
    let clean = url.trim().trim_end_matches('/');
    let clean = clean.strip_suffix(".git").unwrap_or(clean);

    let parts: Vec<&str> = match clean.split_once("://") {
        Some((_, rest)) => {
            let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
            let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
            let host = host.split_once(':').map_or(host, |(host, _)| host);
            std::iter::once(host).chain(path.split('/')).collect()
        }
        None => {
            let rest = clean.split_once('@').map_or(clean, |(_, rest)| rest);
            rest.split([':', '/']).collect()
        }
    };
    let parts: Vec<&str> = parts.into_iter().filter(|p| !p.is_empty()).collect();

    let [host, owner @ .., repo] = parts.as_slice() else {
        return None;
    };
    if owner.is_empty() {
        return None;
    }
    Some(GitUrl {
        host: host.to_string(),
        owner: owner.join("/"),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
