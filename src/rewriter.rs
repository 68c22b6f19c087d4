use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::resource::local_path_for_link;
use crate::scanner::LinkContainer;

const HTML_EXT: &str = ".html";
const PARENT_DIR: &str = "../";

/// One planned substitution in a page file. `start` and `original_len`
/// index the original buffer, before any earlier splice shifted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub start: usize,
    pub original_len: usize,
    pub replacement: String,
}

/// Number of `/`-segments to ascend from `path_ref` to reach the deepest
/// directory shared with `path_target`. Identical paths need no ascent;
/// paths with different first segments share no root at all.
pub fn levels_to_common_parent(path_ref: &str, path_target: &str) -> Result<usize> {
    if path_ref == path_target {
        return Ok(0);
    }
    let no_common = || Error::NoCommonAncestor {
        from: path_ref.to_string(),
        to: path_target.to_string(),
    };

    let pr: Vec<&str> = path_ref.split('/').collect();
    let pt: Vec<&str> = path_target.split('/').collect();
    if pr[0] != pt[0] {
        return Err(no_common());
    }

    let shared = pr.iter().zip(pt.iter()).take_while(|(a, b)| a == b).count();
    Ok(pr.len() - shared)
}

/// Relative path from the directory `target_dir` to `resource_path`:
/// `../` per level to ascend, then the suffix of the resource path past
/// the shared prefix. With nothing to ascend the suffix gets a single
/// leading separator.
pub fn relative_to(target_dir: &str, resource_path: &str) -> Result<String> {
    let levels = levels_to_common_parent(target_dir, resource_path)?;
    let shared = target_dir.split('/').count() - levels;
    let suffix = resource_path
        .split('/')
        .skip(shared)
        .collect::<Vec<_>>()
        .join("/");

    if levels == 0 {
        return Ok(format!("/{suffix}"));
    }

    let mut out = String::with_capacity(PARENT_DIR.len() * levels + suffix.len());
    for _ in 0..levels {
        out.push_str(PARENT_DIR);
    }
    out.push_str(&suffix);
    Ok(out)
}

/// Plan the substitutions for one downloaded page.
///
/// Pure: candidate local paths are computed with the resolver's rule, the
/// `exists` predicate decides which targets were actually downloaded, and
/// only those produce a splice — links whose target is missing (or shares
/// no root with the page) are left untouched. Page links get the `.html`
/// suffix their saved files carry, but only when this page recursed into
/// its children (`relink_pages`).
pub fn plan_rewrites<F>(
    container: &LinkContainer,
    page_dir: &str,
    host: &str,
    root_dir: &str,
    relink_pages: bool,
    exists: F,
) -> Vec<Splice>
where
    F: Fn(&str) -> bool,
{
    let mut out = Vec::new();
    for (i, item) in container.items().iter().enumerate() {
        let Some(mut candidate) = local_path_for_link(&item.link, item.kind, host, root_dir)
        else {
            continue;
        };
        if container.is_page_link(i) && relink_pages && !candidate.ends_with(HTML_EXT) {
            candidate.push_str(HTML_EXT);
        }
        if !exists(&candidate) {
            continue;
        }
        if let Ok(replacement) = relative_to(page_dir, &candidate) {
            out.push(Splice {
                start: item.byte_start,
                original_len: item.original_len,
                replacement,
            });
        }
    }
    out
}

/// Replace `data.len() - byte_delta` bytes of `src` at `start` with
/// `data`, returning a new buffer of `src.len() + byte_delta` bytes.
pub fn splice_bytes(src: &[u8], data: &[u8], start: usize, byte_delta: isize) -> Result<Vec<u8>> {
    let original_len = data.len() as isize - byte_delta;
    if start >= src.len() || original_len < 0 || start as isize + original_len > src.len() as isize
    {
        return Err(Error::SpliceOutOfRange {
            pos: start,
            len: src.len(),
        });
    }
    let tail_start = start + original_len as usize;

    let mut out = Vec::with_capacity((src.len() as isize + byte_delta) as usize);
    out.extend_from_slice(&src[..start]);
    out.extend_from_slice(data);
    out.extend_from_slice(&src[tail_start..]);
    Ok(out)
}

/// Apply splices (in ascending original-offset order) to a copy of `src`,
/// shifting each start by the cumulative length delta of the splices
/// before it. A start landing outside the buffer aborts instead of
/// corrupting the output.
pub fn apply_splices(src: &[u8], splices: &[Splice]) -> Result<Vec<u8>> {
    let mut out = src.to_vec();
    let mut offset: isize = 0;

    for splice in splices {
        let start = splice.start as isize + offset;
        if start < 0 {
            return Err(Error::SpliceOutOfRange {
                pos: splice.start,
                len: out.len(),
            });
        }
        let delta = splice.replacement.len() as isize - splice.original_len as isize;
        out = splice_bytes(&out, splice.replacement.as_bytes(), start as usize, delta)?;
        offset += delta;
    }
    Ok(out)
}

/// Rewrite the links of a downloaded page in place: plan against the files
/// actually present on disk, splice, write back.
pub fn rewrite_file(
    container: &LinkContainer,
    page_path: &str,
    host: &str,
    root_dir: &str,
    relink_pages: bool,
) -> Result<()> {
    let page_dir = match page_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let splices = plan_rewrites(container, page_dir, host, root_dir, relink_pages, |p| {
        Path::new(p).is_file()
    });
    if splices.is_empty() {
        return Ok(());
    }

    let src = fs::read(page_path)?;
    let rewritten = apply_splices(&src, &splices)?;
    fs::write(page_path, rewritten)?;
    Ok(())
}
