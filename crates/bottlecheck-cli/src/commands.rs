//! Subcommand handlers.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use bottlecheck_catalog::CatalogCache;
use bottlecheck_core::ObservedProduct;

use crate::render;

pub(crate) async fn compare(
    cache: &CatalogCache,
    input: &Path,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let products = parse_products(&raw)
        .with_context(|| format!("reading products from {}", input.display()))?;

    let report = bottlecheck_engine::compare_batch(cache, products).await;

    if let Some(path) = output {
        let body = serde_json::to_vec_pretty(&report)?;
        std::fs::write(path, body)
            .with_context(|| format!("writing report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "comparison report written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::report_table(&report));
    }
    Ok(())
}

pub(crate) async fn refresh(cache: &CatalogCache) -> anyhow::Result<()> {
    let snapshot = cache
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("catalog refresh failed: {e}"))?;
    println!(
        "fetched {} catalog entries at {}",
        snapshot.len(),
        snapshot.fetched_at.to_rfc3339()
    );
    Ok(())
}

pub(crate) async fn status(cache: &CatalogCache) {
    match cache.status().await {
        Some(status) => print!("{}", render::status_lines(&status)),
        None => println!("no cached catalog"),
    }
}

pub(crate) fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

/// Parses a JSON array of scraped products, dropping records without a name
/// or a positive price.
pub(crate) fn parse_products(raw: &str) -> anyhow::Result<Vec<ObservedProduct>> {
    let all: Vec<ObservedProduct> = serde_json::from_str(raw)?;
    let total = all.len();
    let products: Vec<_> = all.into_iter().filter(ObservedProduct::is_valid).collect();
    if products.len() < total {
        tracing::warn!(
            dropped = total - products.len(),
            kept = products.len(),
            "dropping products without a name or positive price"
        );
    }
    Ok(products)
}
