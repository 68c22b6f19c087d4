use std::collections::HashSet;

use once_cell::sync::Lazy;

const ARCHIVE: &[&str] = &["tar", "zip", "zipx", "rar", "7z"];

const AUDIO: &[&str] = &[
    "aif", "flac", "m3u", "m4a", "mid", "mp3", "ogg", "wav", "wma",
];

const DOCUMENT: &[&str] = &[
    "bin", "csv", "obb", "doc", "docx", "log", "odt", "rtf", "txt", "pdf", "ppt", "pptx", "xml",
    "xls", "xlsx",
];

const EXECUTABLE: &[&str] = &["apk", "app", "bat", "bin", "cmd", "exe"];

const IMAGE: &[&str] = &[
    "jpg", "jpeg", "jpe", "jif", "jfif", "jfi", "png", "gif", "webp", "tiff", "tif", "ind", "indd",
    "indt", "psd", "ps", "raw", "arw", "cr", "rw2", "nrw", "k25", "svg", "svgz",
];

const VIDEO: &[&str] = &[
    "3gp", "asf", "avi", "flw", "m4v", "mov", "mp4", "mpeg", "wmv",
];

const WEB: &[&str] = &["csr", "css", "js", "json", "jsp", "php"];

/// All file extensions treated as terminal resources rather than pages.
static FORMATS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [ARCHIVE, AUDIO, DOCUMENT, EXECUTABLE, IMAGE, VIDEO, WEB]
        .iter()
        .flat_map(|group| group.iter().copied())
        .collect()
});

/// Whether `ext` (already lowercased) names a known resource format.
pub fn is_resource_format(ext: &str) -> bool {
    FORMATS.contains(ext)
}

/// Whether the last path segment of `link` carries a known resource
/// extension. Links without a dotted last segment are pages.
pub fn has_resource_extension(link: &str) -> bool {
    let last = link.rsplit('/').next().unwrap_or(link);
    match last.rsplit_once('.') {
        Some((_, ext)) => is_resource_format(&ext.to_lowercase()),
        None => false,
    }
}
