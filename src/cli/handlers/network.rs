//! CLI handlers for network and partner queries.

use anyhow::Result;
use std::collections::BTreeSet;

use crate::cli::output::{output_json, print_header, print_hint, print_kv, print_rows, OutputMode};
use crate::init::AppContext;
use crate::models::{BucketId, CharacterIndex, NetworkQuery};
use crate::CastError;

/// Similarity floor for "did you mean" suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.6;
const MAX_SUGGESTIONS: usize = 3;

pub struct NetworkArgs {
    pub episode: Option<i64>,
    pub min_node: u32,
    pub min_edge: u32,
    pub top_n: Option<usize>,
    pub hide: Vec<BucketId>,
    pub edge_limit: usize,
}

fn default_episode(ctx: &AppContext) -> i64 {
    ctx.dataset.last_episode_number().unwrap_or(0)
}

pub fn handle_network(ctx: &AppContext, args: &NetworkArgs, mode: OutputMode) -> Result<()> {
    let query = NetworkQuery {
        episode_boundary: args.episode.unwrap_or_else(|| default_episode(ctx)),
        min_node_appearances: args.min_node,
        min_edge_weight: args.min_edge,
        top_n: args.top_n,
        hidden_buckets: args.hide.iter().copied().collect::<BTreeSet<_>>(),
    };
    let graph = ctx.network().filter_graph(&query);

    if mode == OutputMode::Json {
        output_json(&graph);
        return Ok(());
    }

    print_header(
        mode,
        &format!(
            "Network as of episode {} ({} episodes folded)",
            graph.episode_boundary, graph.prefix_index
        ),
    );
    print_kv("Nodes", &graph.nodes.len().to_string());
    print_kv("Edges", &graph.edges.len().to_string());

    if graph.is_empty() {
        print_hint("No characters pass the current filters.");
        return Ok(());
    }

    let mut nodes: Vec<_> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| b.appearances.cmp(&a.appearances).then(a.id.cmp(&b.id)));
    let rows = nodes
        .iter()
        .map(|n| {
            vec![
                n.name.clone(),
                n.appearances.to_string(),
                n.label.clone(),
                format!("{:.2}", n.size),
                format!("({:.3}, {:.3})", n.position[0], n.position[1]),
            ]
        })
        .collect();
    print_header(mode, "Characters");
    print_rows(
        mode,
        &["Character", "Appearances", "Community", "Size", "Position"],
        rows,
    );

    let characters = ctx.engine.characters();
    let mut edges = graph.edges.clone();
    edges.sort_by(|x, y| y.weight.cmp(&x.weight).then((x.a, x.b).cmp(&(y.a, y.b))));
    let rows = edges
        .iter()
        .take(args.edge_limit)
        .map(|e| {
            vec![
                characters.name(e.a).unwrap_or_default().to_string(),
                characters.name(e.b).unwrap_or_default().to_string(),
                e.weight.to_string(),
            ]
        })
        .collect();
    print_header(mode, "Strongest edges");
    print_rows(mode, &["Character", "Character", "Shared episodes"], rows);
    if edges.len() > args.edge_limit {
        print_hint(&format!(
            "{} more edges not shown (use --edges or --json)",
            edges.len() - args.edge_limit
        ));
    }

    Ok(())
}

pub fn handle_partners(
    ctx: &AppContext,
    name: &str,
    episode: Option<i64>,
    limit: usize,
    mode: OutputMode,
) -> Result<()> {
    if limit == 0 {
        return Err(CastError::Validation("--limit must be at least 1".into()).into());
    }
    let characters = ctx.engine.characters();
    let id = match resolve_character(characters, name) {
        Ok(id) => id,
        Err(e) => {
            let suggestions = suggest_names(characters, name);
            if !suggestions.is_empty() && mode != OutputMode::Json {
                print_hint(&format!("Did you mean: {}?", suggestions.join(", ")));
            }
            return Err(e.into());
        }
    };

    let boundary = episode.unwrap_or_else(|| default_episode(ctx));
    let partners = ctx.network().partners(id, boundary, limit);

    if mode == OutputMode::Json {
        output_json(&partners);
        return Ok(());
    }

    print_header(
        mode,
        &format!(
            "{} partners as of episode {}",
            characters.name(id).unwrap_or(name),
            boundary
        ),
    );
    let rows = partners
        .iter()
        .enumerate()
        .map(|(i, p)| vec![format!("{}", i + 1), p.name.clone(), p.weight.to_string()])
        .collect();
    print_rows(mode, &["#", "Partner", "Shared episodes"], rows);

    Ok(())
}

/// Case-insensitive exact lookup of a user-typed character name.
pub fn resolve_character(characters: &CharacterIndex, name: &str) -> Result<usize, CastError> {
    characters
        .find_ignore_case(name)
        .ok_or_else(|| CastError::NotFound {
            entity_type: "character".into(),
            id: name.to_string(),
        })
}

/// Closest character names by normalized Levenshtein similarity.
pub fn suggest_names(characters: &CharacterIndex, name: &str) -> Vec<String> {
    use rapidfuzz::distance::levenshtein;

    let query = name.trim().to_lowercase();
    let mut scored: Vec<(f64, &String)> = characters
        .names()
        .iter()
        .map(|candidate| {
            let score = levenshtein::normalized_similarity(
                query.chars(),
                candidate.to_lowercase().chars(),
            );
            (score, candidate)
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, n)| n.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CharacterIndex {
        CharacterIndex::from_names(
            ["Monkey D. Luffy", "Roronoa Zoro", "Nami", "Usopp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_resolve_character_ignores_case() {
        assert_eq!(resolve_character(&index(), "nami").unwrap(), 2);
        assert_eq!(resolve_character(&index(), "ROronoa zoro").unwrap(), 1);
    }

    #[test]
    fn test_resolve_character_not_found() {
        let err = resolve_character(&index(), "Sanji").unwrap_err();
        assert!(matches!(err, CastError::NotFound { .. }));
    }

    #[test]
    fn test_suggestions_for_typo() {
        let suggestions = suggest_names(&index(), "Roronoa Zorro");
        assert_eq!(suggestions.first().map(String::as_str), Some("Roronoa Zoro"));
        assert!(suggest_names(&index(), "xyzzy").is_empty());
    }
}
