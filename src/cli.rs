use std::time::Duration;

use clap::Parser;

use crate::downloader::MirrorOptions;

#[derive(Parser, Debug)]
#[command(
    name = "webget",
    about = "Mirror a website recursively for offline browsing",
    version,
    long_about = "Downloads a page-by-page copy of a website up to a recursion depth, \
optionally including prerequisite resources (images, scripts, styles), and rewrites \
links in the downloaded pages so the mirror browses locally."
)]
pub struct MirrorCommand {
    /// The root URL to mirror
    #[arg(required = true)]
    pub url: String,

    /// Maximum recursion depth (0 downloads the root page only)
    #[arg(short = 'l', long = "level", default_value_t = 0)]
    pub max_depth: usize,

    /// Also download prerequisite resources referenced by each page
    #[arg(short = 'p', long = "page-requisites")]
    pub page_requisites: bool,

    /// Download directory, the root of the mirror tree
    #[arg(short = 'O', long = "output-dir", default_value = "data")]
    pub output_dir: String,

    /// Maximum concurrent prerequisite downloads
    #[arg(long, default_value_t = 10)]
    pub max_concurrent: usize,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// User agent string to use for requests
    #[arg(long, default_value = "webget/0.1")]
    pub user_agent: String,
}

impl MirrorCommand {
    pub fn to_options(&self) -> MirrorOptions {
        MirrorOptions {
            root_url: self.url.clone(),
            output_dir: self.output_dir.clone(),
            max_depth: self.max_depth,
            page_requisites: self.page_requisites,
            max_concurrent: self.max_concurrent,
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
        }
    }
}
