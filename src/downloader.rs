use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colored::*;
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, ClientBuilder};

use crate::error::{Error, Result};
use crate::file_manager::FileManager;
use crate::formats::has_resource_extension;
use crate::report::MirrorReport;
use crate::resource::ResourceUrl;
use crate::rewriter;
use crate::scanner::{LinkContainer, LinkScanner};

const HTML_EXT: &str = ".html";

/// Options for one mirroring run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub root_url: String,
    /// Root of the mirror tree
    pub output_dir: String,
    /// Maximum recursion depth; 0 downloads the root page only
    pub max_depth: usize,
    /// Also fetch prerequisite resources referenced by each page
    pub page_requisites: bool,
    /// Bounded fan-out for sibling resource fetches
    pub max_concurrent: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

/// BFS crawl frontier: pending `(url, depth)` pairs plus the set of local
/// paths already fetched or scheduled. Each path is admitted at most once,
/// which both de-duplicates fetches and terminates cyclic link graphs.
#[derive(Default)]
struct Frontier {
    queue: VecDeque<(ResourceUrl, usize)>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Record a local path as fetched-or-scheduled. False if already seen.
    fn admit(&mut self, local_path: &str) -> bool {
        self.visited.insert(local_path.to_string())
    }

    fn push(&mut self, url: ResourceUrl, depth: usize) -> bool {
        if !self.admit(&url.local_full_path) {
            return false;
        }
        self.queue.push_back((url, depth));
        true
    }

    fn pop(&mut self) -> Option<(ResourceUrl, usize)> {
        self.queue.pop_front()
    }
}

/// A page whose links still need the final relativization pass.
struct RewriteEntry {
    container: LinkContainer,
    page_path: String,
    host: String,
    relink_pages: bool,
}

/// Orchestrates the crawl: drains the frontier page by page, fetches
/// prerequisites with bounded fan-out, then runs the link rewriter over
/// every downloaded page once the whole traversal is done — only at that
/// point is the set of local files final.
///
/// This is the one layer that swallows and logs per-link failures; the
/// scanner, resolver and rewriter underneath stay silent and typed.
pub struct SiteMirror {
    options: MirrorOptions,
    client: Client,
    file_manager: FileManager,
    scanner: LinkScanner,
    frontier: Arc<Mutex<Frontier>>,
}

impl SiteMirror {
    pub fn new(options: MirrorOptions) -> Result<Self> {
        let client = Self::build_http_client(&options)?;
        let file_manager = FileManager::new(Path::new(&options.output_dir))?;

        Ok(Self {
            options,
            client,
            file_manager,
            scanner: LinkScanner::new(),
            frontier: Arc::new(Mutex::new(Frontier::default())),
        })
    }

    fn build_http_client(options: &MirrorOptions) -> Result<Client> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .user_agent(&options.user_agent)
            .timeout(options.timeout)
            .build()?;
        Ok(client)
    }

    pub async fn mirror(&self) -> Result<MirrorReport> {
        let mut report = MirrorReport::new(&self.options.root_url);
        let root = ResourceUrl::new(&self.options.root_url, &self.options.output_dir)?;

        println!("🚀 Mirroring {}", root.absolute_url.blue());
        println!("📁 Output directory: {}", self.options.output_dir);
        println!("🔗 Max depth: {}", self.options.max_depth);

        // a root that already names a resource is a single download
        if has_resource_extension(&root.absolute_url) {
            let bytes = self.fetch(&root.absolute_url).await?;
            self.file_manager.save_file(&root.local_full_path, &bytes)?;
            log_download(&root.absolute_url, bytes.len());
            report.resources_downloaded = 1;
            report.save(self.file_manager.base_dir())?;
            return Ok(report);
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap(),
        );

        self.frontier.lock().unwrap().push(root, 0);
        let mut backlog: Vec<RewriteEntry> = Vec::new();

        loop {
            let task = self.frontier.lock().unwrap().pop();
            let Some((page, depth)) = task else { break };

            progress.set_message(format!("downloading {}", page.absolute_url));
            match self.process_page(&page, depth, &mut report).await {
                Ok(entry) => {
                    report.pages_downloaded += 1;
                    backlog.push(entry);
                }
                Err(err) if depth == 0 => {
                    progress.finish_and_clear();
                    return Err(err);
                }
                Err(err) => {
                    report.failed_fetches += 1;
                    eprintln!("{} {}: {}", "skipping".yellow(), page.absolute_url, err);
                }
            }
        }

        progress.finish_with_message("all downloads complete");

        // final pass: every file that will ever exist is now on disk
        for entry in &backlog {
            match rewriter::rewrite_file(
                &entry.container,
                &entry.page_path,
                &entry.host,
                &self.options.output_dir,
                entry.relink_pages,
            ) {
                Ok(()) => report.pages_rewritten += 1,
                Err(err) => {
                    report.rewrite_failures += 1;
                    eprintln!("{} {}: {}", "rewrite failed".red(), entry.page_path, err);
                }
            }
        }

        report.save(self.file_manager.base_dir())?;
        println!(
            "📊 {} pages, {} resources, {} failures",
            report.pages_downloaded, report.resources_downloaded, report.failed_fetches
        );
        Ok(report)
    }

    /// Download one page, fetch its prerequisites, enqueue its children,
    /// and hand back the scan result for the final rewrite pass.
    async fn process_page(
        &self,
        page: &ResourceUrl,
        depth: usize,
        report: &mut MirrorReport,
    ) -> Result<RewriteEntry> {
        let mut page_path = page.local_full_path.clone();
        if !page_path.ends_with(HTML_EXT) {
            page_path.push_str(HTML_EXT);
        }

        let bytes = self.fetch(&page.absolute_url).await?;
        // scan offsets must index the exact bytes written to disk, so the
        // lossy-decoded text is what gets saved
        let body = String::from_utf8_lossy(&bytes).into_owned();
        self.file_manager.save_file(&page_path, body.as_bytes())?;
        log_download(&page.absolute_url, body.len());

        let container = self.scanner.scan(&body);

        if self.options.page_requisites {
            let (downloaded, failed) = self.download_requisites(&container, page).await;
            report.resources_downloaded += downloaded;
            report.failed_fetches += failed;
        }

        let relink_pages = depth < self.options.max_depth;
        if relink_pages {
            let mut frontier = self.frontier.lock().unwrap();
            for item in container.page_links() {
                match ResourceUrl::from_typed(
                    &item.link,
                    item.kind,
                    &page.scheme,
                    &page.host,
                    &self.options.output_dir,
                ) {
                    Ok(child) => {
                        frontier.push(child, depth + 1);
                    }
                    Err(err) => {
                        eprintln!("{} {}: {}", "skipping".yellow(), item.link, err);
                    }
                }
            }
        }

        Ok(RewriteEntry {
            container,
            page_path,
            host: page.host.clone(),
            relink_pages,
        })
    }

    /// Fetch every resource link of a page concurrently, bounded by
    /// `max_concurrent`. Failures are logged and skipped; a stalled or
    /// broken resource never takes the page down with it.
    async fn download_requisites(
        &self,
        container: &LinkContainer,
        page: &ResourceUrl,
    ) -> (usize, usize) {
        let mut targets = Vec::new();
        {
            let mut frontier = self.frontier.lock().unwrap();
            for item in container.resource_links() {
                match ResourceUrl::from_typed(
                    &item.link,
                    item.kind,
                    &page.scheme,
                    &page.host,
                    &self.options.output_dir,
                ) {
                    Ok(url) => {
                        // idempotent by path: files from a prior run count
                        if self.file_manager.file_exists(&url.local_full_path) {
                            continue;
                        }
                        if frontier.admit(&url.local_full_path) {
                            targets.push(url);
                        }
                    }
                    Err(err) => {
                        eprintln!("{} {}: {}", "skipping".yellow(), item.link, err);
                    }
                }
            }
        }

        let results = stream::iter(targets.into_iter().map(|url| {
            let client = self.client.clone();
            let file_manager = self.file_manager.clone();
            async move {
                let outcome = Self::download_resource(&client, &file_manager, &url).await;
                (url, outcome)
            }
        }))
        .buffer_unordered(self.options.max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut downloaded = 0;
        let mut failed = 0;
        for (url, outcome) in results {
            match outcome {
                Ok(size) => {
                    downloaded += 1;
                    log_download(&url.absolute_url, size);
                }
                Err(err) => {
                    failed += 1;
                    eprintln!("{} {}: {}", "failed".red(), url.absolute_url, err);
                }
            }
        }
        (downloaded, failed)
    }

    async fn download_resource(
        client: &Client,
        file_manager: &FileManager,
        url: &ResourceUrl,
    ) -> Result<usize> {
        let response = client.get(&url.absolute_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.absolute_url.clone(),
                status,
            });
        }
        let bytes = response.bytes().await?;
        file_manager.save_file(&url.local_full_path, &bytes)?;
        Ok(bytes.len())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

fn log_download(url: &str, size: usize) {
    println!("Got {} bytes from {}", size, url.green());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> ResourceUrl {
        ResourceUrl::new(&format!("https://site.test{path}"), "data").unwrap()
    }

    #[test]
    fn frontier_admits_each_path_once() {
        let mut frontier = Frontier::default();
        assert!(frontier.push(url("/a"), 0));
        assert!(!frontier.push(url("/a"), 1));
        assert!(frontier.push(url("/b"), 1));
        assert_eq!(frontier.queue.len(), 2);
    }

    #[test]
    fn resource_admission_blocks_later_page_push() {
        let mut frontier = Frontier::default();
        assert!(frontier.admit("data/site.test/x"));
        assert!(!frontier.push(url("/x"), 0));
    }

    #[test]
    fn cyclic_link_graph_terminates() {
        // A links to B, B links back to A; with max depth 2 the walk must
        // visit each node exactly once and stop
        let mut frontier = Frontier::default();
        frontier.push(url("/a"), 0);

        let mut pops = 0;
        while let Some((page, depth)) = frontier.pop() {
            pops += 1;
            assert!(pops <= 2, "cycle was not cut off by the visited set");
            if depth < 2 {
                let next = if page.local_full_path.ends_with("/a") {
                    url("/b")
                } else {
                    url("/a")
                };
                frontier.push(next, depth + 1);
            }
        }
        assert_eq!(pops, 2);
    }

    #[test]
    fn pops_in_breadth_first_order() {
        let mut frontier = Frontier::default();
        frontier.push(url("/a"), 0);
        frontier.push(url("/b"), 1);
        frontier.push(url("/c"), 1);

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|(_, depth)| depth)
            .collect();
        assert_eq!(order, vec![0, 1, 1]);
    }
}
