use crate::formats::has_resource_extension;

/// Attribute names whose quoted values are treated as candidate links.
const LINK_ATTRS: [&str; 3] = ["href", "src", "content"];

/// Character that closes an attribute value.
const TERMINATOR: char = '"';

const SCHEME_SEP: &str = "://";
const PROTOCOL_RELATIVE_PREFIX: &str = "//";

/// Shape of a raw link as it appears in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Carries its own scheme (`https://host/...`)
    Absolute,
    /// Starts with a single `/`, interpreted against the base host
    RootRelative,
    /// Starts with `//`, inherits the base scheme
    ProtocolRelative,
    Unknown,
}

pub fn classify_url(url: &str) -> UrlKind {
    if url.starts_with(PROTOCOL_RELATIVE_PREFIX) {
        UrlKind::ProtocolRelative
    } else if url.starts_with('/') {
        UrlKind::RootRelative
    } else if url.contains(SCHEME_SEP) {
        UrlKind::Absolute
    } else {
        UrlKind::Unknown
    }
}

/// One link occurrence discovered in a scanned document.
#[derive(Debug, Clone)]
pub struct LinkItem {
    /// Byte offset in the source text where the link text begins
    pub byte_start: usize,
    /// Length in bytes of the link text as found in the source
    pub original_len: usize,
    pub link: String,
    pub kind: UrlKind,
}

impl LinkItem {
    /// A usable link has a recognized shape and at least one path separator.
    /// Everything else (`mailto:`, `javascript:`, bare words) is dropped.
    fn is_proper(&self) -> bool {
        self.kind != UrlKind::Unknown && self.link.contains('/')
    }
}

/// All links found in one document, in order of appearance, partitioned
/// into page links (crawlable) and resource links (terminal downloads).
#[derive(Debug, Default)]
pub struct LinkContainer {
    items: Vec<LinkItem>,
    page_links: Vec<usize>,
    resource_links: Vec<usize>,
}

impl LinkContainer {
    pub fn items(&self) -> &[LinkItem] {
        &self.items
    }

    pub fn page_links(&self) -> impl Iterator<Item = &LinkItem> {
        self.page_links.iter().map(|&i| &self.items[i])
    }

    pub fn resource_links(&self) -> impl Iterator<Item = &LinkItem> {
        self.resource_links.iter().map(|&i| &self.items[i])
    }

    /// Partition membership for the item at `index`. Indices not present
    /// in the page partition are resource links.
    pub fn is_page_link(&self, index: usize) -> bool {
        self.page_links.binary_search(&index).is_ok()
    }

    /// Link texts in order of appearance, mostly useful in tests.
    pub fn links(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.link.as_str()).collect()
    }

    fn add(&mut self, item: LinkItem) {
        self.items.push(item);
    }

    fn retain_proper(&mut self) {
        self.items.retain(LinkItem::is_proper);
    }

    fn partition(&mut self) {
        for (i, item) in self.items.iter().enumerate() {
            if has_resource_extension(&item.link) {
                self.resource_links.push(i);
            } else {
                self.page_links.push(i);
            }
        }
    }
}

/// Scanner state: either looking for an attribute prefix, or accumulating
/// an attribute value whose first byte sits at `start`.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    Outside,
    Inside { start: usize },
}

/// Streaming link extractor.
///
/// Single left-to-right pass; no DOM, no tokenizer. Outside a value it
/// keeps a trailing window of non-whitespace characters and watches for
/// one of the `attr="` prefixes; inside a value it accumulates bytes until
/// the closing quote.
pub struct LinkScanner {
    prefixes: Vec<String>,
}

impl Default for LinkScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkScanner {
    pub fn new() -> Self {
        Self {
            prefixes: LINK_ATTRS
                .iter()
                .map(|attr| format!("{attr}={TERMINATOR}"))
                .collect(),
        }
    }

    pub fn scan(&self, source: &str) -> LinkContainer {
        let mut out = LinkContainer::default();
        let mut state = ScanState::Outside;
        let mut context = String::new();
        let mut data = String::new();

        for (pos, ch) in source.char_indices() {
            match state {
                ScanState::Inside { start } => {
                    if data.ends_with(TERMINATOR) {
                        out.add(finish_item(&mut data, start));
                        context.clear();
                        state = ScanState::Outside;
                        // the character that triggered the flush is consumed
                        // by the transition and never recorded
                        continue;
                    }
                    data.push(ch);
                }
                ScanState::Outside => {
                    if ch.is_whitespace() {
                        continue;
                    }
                    if self.at_prefix(&context) {
                        state = ScanState::Inside { start: pos };
                        data.push(ch);
                        continue;
                    }
                    context.push(ch);
                }
            }
        }

        // flush a value terminated exactly at end of input; an unterminated
        // one is malformed and silently dropped
        if let ScanState::Inside { start } = state {
            if data.ends_with(TERMINATOR) {
                out.add(finish_item(&mut data, start));
            }
        }

        out.retain_proper();
        out.partition();
        out
    }

    fn at_prefix(&self, context: &str) -> bool {
        self.prefixes.iter().any(|p| context.ends_with(p.as_str()))
    }
}

fn finish_item(data: &mut String, start: usize) -> LinkItem {
    data.pop(); // trailing quote
    let link = std::mem::take(data);
    LinkItem {
        byte_start: start,
        original_len: link.len(),
        kind: classify_url(&link),
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> LinkContainer {
        LinkScanner::new().scan(src)
    }

    #[test]
    fn extracts_single_link() {
        let out = scan(r#" href="https://test1.org/""#);
        assert_eq!(out.links(), vec!["https://test1.org/"]);
        assert_eq!(out.items()[0].kind, UrlKind::Absolute);
    }

    #[test]
    fn extracts_links_in_order_of_appearance() {
        let src = r#" href="https://test1.org/a"
                      src="https://test2.org/b"
                      content="https://test3.org/c""#;
        let out = scan(src);
        assert_eq!(
            out.links(),
            vec![
                "https://test1.org/a",
                "https://test2.org/b",
                "https://test3.org/c"
            ]
        );
    }

    #[test]
    fn records_byte_positions_and_lengths() {
        let src = r#"<a href="https://a.org/x"> <img src="/img/b.png">"#;
        let out = scan(src);

        let first = &out.items()[0];
        assert_eq!(first.byte_start, src.find("https://a.org/x").unwrap());
        assert_eq!(first.original_len, "https://a.org/x".len());

        let second = &out.items()[1];
        assert_eq!(second.byte_start, src.find("/img/b.png").unwrap());
        assert_eq!(second.original_len, "/img/b.png".len());
    }

    #[test]
    fn byte_positions_survive_multibyte_text() {
        let src = "δοκιμή href=\"/σελίδα/one\" τέλος";
        let out = scan(src);
        let item = &out.items()[0];
        assert_eq!(item.byte_start, src.find("/σελίδα/one").unwrap());
        assert_eq!(item.original_len, "/σελίδα/one".len());
    }

    #[test]
    fn multiple_attrs_on_one_line() {
        let src = r#"href="https://a.org/1" src="https://b.org/2""#;
        assert_eq!(scan(src).links(), vec!["https://a.org/1", "https://b.org/2"]);
    }

    #[test]
    fn tolerates_whitespace_inside_prefix() {
        // whitespace is skipped outside a value, so a spaced-out attribute
        // still matches its prefix
        let src = "href = \"https://a.org/1\"";
        assert_eq!(scan(src).links(), vec!["https://a.org/1"]);
    }

    #[test]
    fn unterminated_value_is_dropped() {
        let out = scan(r#"href="https://a.org/unfinished"#);
        assert!(out.items().is_empty());
    }

    #[test]
    fn value_closed_at_end_of_input_is_flushed() {
        let out = scan(r#"href="https://a.org/done""#);
        assert_eq!(out.links(), vec!["https://a.org/done"]);
    }

    #[test]
    fn drops_links_without_path_separator() {
        let out = scan(r#"href="mailto:someone@example.com" href="plainword""#);
        assert!(out.items().is_empty());
    }

    #[test]
    fn drops_unknown_url_shapes() {
        // a relative path without leading slash classifies as Unknown even
        // though it contains a separator; documented filtering policy
        let out = scan(r#"href="img/photo.png""#);
        assert!(out.items().is_empty());
    }

    #[test]
    fn classifies_url_shapes() {
        assert_eq!(classify_url("https://a.org/x"), UrlKind::Absolute);
        assert_eq!(classify_url("/about/team"), UrlKind::RootRelative);
        assert_eq!(classify_url("//cdn.a.org/app.js"), UrlKind::ProtocolRelative);
        assert_eq!(classify_url("mailto:x@y.org"), UrlKind::Unknown);
    }

    #[test]
    fn partition_is_total_and_disjoint() {
        let src = r#"href="/page/one" src="/img/a.png" href="https://a.org/docs" src="//cdn.a.org/app.js""#;
        let out = scan(src);

        let pages: Vec<usize> = (0..out.items().len())
            .filter(|&i| out.is_page_link(i))
            .collect();
        let resources: Vec<usize> = (0..out.items().len())
            .filter(|&i| !out.is_page_link(i))
            .collect();

        assert_eq!(pages.len() + resources.len(), out.items().len());
        assert_eq!(
            out.page_links().map(|i| i.link.as_str()).collect::<Vec<_>>(),
            vec!["/page/one", "https://a.org/docs"]
        );
        assert_eq!(
            out.resource_links()
                .map(|i| i.link.as_str())
                .collect::<Vec<_>>(),
            vec!["/img/a.png", "//cdn.a.org/app.js"]
        );
    }
}
