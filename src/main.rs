use anyhow::{Context, Result};
use clap::Parser;

use webget::{MirrorCommand, SiteMirror};

#[tokio::main]
async fn main() -> Result<()> {
    let args = MirrorCommand::parse();

    let mirror = SiteMirror::new(args.to_options())
        .with_context(|| format!("failed to set up mirror for {}", args.url))?;

    mirror
        .mirror()
        .await
        .with_context(|| format!("failed to mirror {}", args.url))?;

    println!("✅ Website mirroring completed successfully!");
    Ok(())
}
