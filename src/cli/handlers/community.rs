//! CLI handler for the community legend.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output_json, print_header, print_hint, print_rows, OutputMode};
use crate::init::AppContext;
use crate::models::BucketId;
use crate::services::community_appearances;

#[derive(Serialize)]
struct BucketSummary {
    id: BucketId,
    label: String,
    order: usize,
    member_count: usize,
    /// Character listings attributed to the bucket over the whole series.
    total_appearances: u64,
    centroid: Option<[f64; 2]>,
    members: Vec<String>,
}

pub fn handle_communities(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let buckets = ctx.buckets();
    let series = community_appearances(&ctx.dataset.episodes, &buckets, &ctx.communities);
    let characters = ctx.engine.characters();

    let summaries: Vec<BucketSummary> = buckets
        .iter()
        .zip(series.iter())
        .map(|(bucket, s)| BucketSummary {
            id: bucket.id,
            label: bucket.label.clone(),
            order: bucket.order,
            member_count: bucket.member_count,
            total_appearances: s.values.iter().map(|&v| u64::from(v)).sum(),
            centroid: match bucket.id {
                BucketId::Community(id) => ctx.communities.centroids().get(&id).copied(),
                _ => None,
            },
            members: bucket
                .members
                .iter()
                .filter_map(|&id| characters.name(id).map(String::from))
                .collect(),
        })
        .collect();

    if mode == OutputMode::Json {
        output_json(&summaries);
        return Ok(());
    }

    print_header(mode, "Communities");
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.label.clone(),
                s.member_count.to_string(),
                s.total_appearances.to_string(),
                s.centroid
                    .map(|c| format!("({:.3}, {:.3})", c[0], c[1]))
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    print_rows(
        mode,
        &["Bucket", "Label", "Members", "Appearances", "Centroid"],
        rows,
    );
    if !ctx.layout.has_positions() {
        print_hint("No co-appearance base loaded; layout positions are synthetic.");
    }

    Ok(())
}
