//! URL construction for the GitHub contents API.

use hub_core::RepoCoordinates;
use url::Url;

use crate::error::{GithubError, GithubResult};

/// Build `{base}/repos/{owner}/{repo}/contents/{path}?ref={ref}`.
///
/// Path components are percent-encoded individually; an empty path
/// addresses the repository root.
pub fn build_contents_url(base: &Url, repo: &RepoCoordinates, path: &str) -> GithubResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| GithubError::InvalidConfig {
                message: format!("'{base}' cannot be used as an API base URL"),
            })?;
        segments
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repository.as_str(), "contents"])
            .extend(path.split('/').filter(|part| !part.is_empty()));
    }

    url.query_pairs_mut().append_pair("ref", &repo.git_ref);
    Ok(url)
}
