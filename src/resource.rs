use url::Url;

use crate::error::{Error, Result};
use crate::scanner::UrlKind;

const SCHEME_SEP: &str = "://";

/// Resolved identity of one remote resource and its local mirror location.
///
/// `local_full_path` is always rooted under the download directory and is
/// the de-duplication key: two URLs normalizing to the same local path are
/// the same resource.
#[derive(Debug, Clone)]
pub struct ResourceUrl {
    /// Remote URL, scheme included
    pub absolute_url: String,
    /// Remote URL with the scheme stripped (`host/path...`)
    pub url_without_scheme: String,
    pub scheme: String,
    pub host: String,
    /// `{download_dir}/{host}/{path...}`, '/'-joined
    pub local_full_path: String,
    /// Parent directory of `local_full_path`
    pub local_dir_path: String,
}

impl ResourceUrl {
    pub fn new(absolute: &str, download_dir: &str) -> Result<Self> {
        // full parse up front so malformed URLs fail here, not at fetch time
        Url::parse(absolute)?;

        let (scheme, rest) = absolute
            .split_once(SCHEME_SEP)
            .ok_or_else(|| Error::MalformedUrl(absolute.to_string()))?;
        let rest = rest.trim_end_matches('/');
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(Error::MalformedUrl(absolute.to_string()));
        }

        let local_full_path = join_under_root(download_dir, rest);
        let local_dir_path = match local_full_path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };

        Ok(Self {
            absolute_url: absolute.to_string(),
            url_without_scheme: rest.to_string(),
            scheme: scheme.to_string(),
            host: host.to_string(),
            local_full_path,
            local_dir_path,
        })
    }

    /// Resolve a raw link found on a page against that page's scheme and
    /// host, according to the link's classified shape.
    pub fn from_typed(
        raw: &str,
        kind: UrlKind,
        scheme: &str,
        host: &str,
        download_dir: &str,
    ) -> Result<Self> {
        let absolute = match kind {
            UrlKind::Absolute => raw.to_string(),
            UrlKind::RootRelative => {
                format!("{scheme}://{host}/{}", raw.trim_start_matches('/'))
            }
            UrlKind::ProtocolRelative => format!("{scheme}:{raw}"),
            UrlKind::Unknown => return Err(Error::MalformedUrl(raw.to_string())),
        };
        Self::new(&absolute, download_dir)
    }
}

/// Local mirror path a raw link would resolve to, without touching the
/// network. Same composition rule as `ResourceUrl`: scheme stripped, host
/// joined, rooted under `root_dir`. `None` for unclassifiable links.
pub fn local_path_for_link(raw: &str, kind: UrlKind, host: &str, root_dir: &str) -> Option<String> {
    let stripped = match kind {
        UrlKind::Absolute => raw.split_once(SCHEME_SEP)?.1.to_string(),
        UrlKind::RootRelative => format!("{host}/{}", raw.trim_start_matches('/')),
        UrlKind::ProtocolRelative => raw.trim_start_matches('/').to_string(),
        UrlKind::Unknown => return None,
    };
    Some(join_under_root(root_dir, stripped.trim_end_matches('/')))
}

fn join_under_root(root_dir: &str, rest: &str) -> String {
    format!("{}/{}", root_dir.trim_end_matches('/'), rest)
}
