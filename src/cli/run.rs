//! Run command - the full extract → stage → publish pipeline

use deckdiff::config::Config;
use deckdiff::error::Result;
use deckdiff::extract;
use deckdiff::host::GitHubHost;
use deckdiff::publish::publish_review;
use deckdiff::stage::StageArea;
use deckdiff::types::Side;
use std::path::Path;

/// Run the pipeline described by the configuration at `path`
pub async fn run(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let pr_number = config.pull_request.number;
    println!(
        "Diffing deck from {}/{} PR #{pr_number}",
        config.pull_request.repository.owner, config.pull_request.repository.repo
    );

    // Two distinct immutable handles: one for reading the source PR, one for
    // publishing into the destination repository.
    let source = GitHubHost::new(&config.access_token, config.pull_request.repository.clone());
    let dest = GitHubHost::new(&config.access_token, config.dest_repo());

    println!("Fetching head version...");
    let head = extract::fetch_head_file(&source, pr_number).await?;
    println!("  ✓ {} ({} bytes)", head.filename, head.content.len());

    println!("Fetching base version...");
    let base = extract::fetch_base_file(&source, pr_number, &head.filename).await?;
    println!("  ✓ {} ({} bytes)", base.filename, base.content.len());

    let stage = StageArea::new()?;
    stage.stage(&head, Side::Head)?;
    stage.stage(&base, Side::Base)?;
    println!("Staged both sides under {}", stage.path().display());

    println!(
        "Publishing review branches to {}/{}...",
        config.dest.owner, config.dest.repo
    );
    let pr = publish_review(
        &dest,
        &config.dest.owner,
        &stage,
        &config.dest.origin_sha,
        pr_number,
    )
    .await?;
    println!("  ✓ Opened review PR #{}", pr.number);
    println!("    {}", pr.html_url);

    Ok(())
}
