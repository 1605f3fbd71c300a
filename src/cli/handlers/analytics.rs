//! CLI handlers for per-episode metric series.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output_json, print_header, print_hint, print_kv, print_rows, OutputMode};
use crate::init::AppContext;
use crate::models::CrewRole;
use crate::services::{
    arc_meta, character_presence, crew_leaderboard, crew_metrics, episode_metrics,
    technique_running, EpisodeMetrics, PresenceCategory,
};
use crate::utils::math::rolling_mean;

#[derive(Serialize)]
struct StatsRow {
    #[serde(flatten)]
    metrics: EpisodeMetrics,
    debuts_rolling: f64,
    appearances_rolling: f64,
    techniques_rolling: f64,
}

pub fn handle_stats(ctx: &AppContext, window: usize, last: usize, mode: OutputMode) -> Result<()> {
    let metrics = episode_metrics(&ctx.dataset.episodes);
    let series = |f: fn(&EpisodeMetrics) -> usize| -> Vec<f64> {
        rolling_mean(
            &metrics.iter().map(|m| f(m) as f64).collect::<Vec<_>>(),
            window,
        )
    };
    let debuts = series(|m| m.character_debuts);
    let appearances = series(|m| m.character_appearances);
    let techniques = series(|m| m.technique_debuts);

    let rows: Vec<StatsRow> = metrics
        .into_iter()
        .enumerate()
        .map(|(i, m)| StatsRow {
            metrics: m,
            debuts_rolling: debuts[i],
            appearances_rolling: appearances[i],
            techniques_rolling: techniques[i],
        })
        .collect();

    if mode == OutputMode::Json {
        output_json(&rows);
        return Ok(());
    }

    print_header(mode, &format!("Episode metrics (rolling window {})", window));
    let skip = rows.len().saturating_sub(last);
    let table = rows
        .iter()
        .skip(skip)
        .map(|r| {
            vec![
                r.metrics.episode_number.to_string(),
                r.metrics
                    .air_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
                format!("{} ({:.1})", r.metrics.character_debuts, r.debuts_rolling),
                format!(
                    "{} ({:.1})",
                    r.metrics.character_appearances, r.appearances_rolling
                ),
                format!("{} ({:.1})", r.metrics.technique_debuts, r.techniques_rolling),
            ]
        })
        .collect();
    print_rows(
        mode,
        &["Episode", "Air date", "Debuts", "Appearances", "Technique debuts"],
        table,
    );
    if skip > 0 {
        print_hint(&format!("{} earlier episodes not shown (use --last)", skip));
    }

    Ok(())
}

#[derive(Serialize)]
struct CrewReport {
    role: CrewRole,
    unique_people: usize,
    credits_per_person: f64,
    avg_per_episode: f64,
    leaderboard: Vec<(String, usize)>,
}

pub fn handle_crew(ctx: &AppContext, limit: usize, mode: OutputMode) -> Result<()> {
    let episodes = &ctx.dataset.episodes;
    let running = crew_metrics(episodes);
    let latest = running.last();

    let reports: Vec<CrewReport> = CrewRole::ALL
        .iter()
        .map(|&role| {
            let totals = latest.and_then(|m| m.roles.iter().find(|r| r.role == role));
            let mut leaderboard = crew_leaderboard(episodes, role);
            leaderboard.truncate(limit);
            CrewReport {
                role,
                unique_people: totals.map(|t| t.unique_people).unwrap_or(0),
                credits_per_person: totals.map(|t| t.credits_per_person).unwrap_or(0.0),
                avg_per_episode: totals.map(|t| t.avg_per_episode).unwrap_or(0.0),
                leaderboard,
            }
        })
        .collect();

    if mode == OutputMode::Json {
        output_json(&reports);
        return Ok(());
    }

    for report in &reports {
        print_header(mode, report.role.label());
        print_kv("Unique people", &report.unique_people.to_string());
        print_kv(
            "Credits per person",
            &format!("{:.2}", report.credits_per_person),
        );
        print_kv("Credits per episode", &format!("{:.2}", report.avg_per_episode));
        let rows = report
            .leaderboard
            .iter()
            .map(|(name, n)| vec![name.clone(), n.to_string()])
            .collect();
        print_rows(mode, &["Name", "Episodes"], rows);
    }

    Ok(())
}

pub fn handle_techniques(ctx: &AppContext, min_debuts: u32, mode: OutputMode) -> Result<()> {
    let running = technique_running(&ctx.dataset.episodes, min_debuts);

    if mode == OutputMode::Json {
        output_json(&running);
        return Ok(());
    }

    print_header(
        mode,
        &format!("Technique debuts (characters with at least {})", min_debuts),
    );
    let mut totals: Vec<(&str, u32)> = running
        .series
        .iter()
        .map(|s| (s.character.as_str(), s.values.last().copied().unwrap_or(0)))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let rows = totals
        .iter()
        .map(|(name, n)| vec![name.to_string(), n.to_string()])
        .collect();
    print_rows(mode, &["Character", "Techniques"], rows);
    if let Some(avg) = running.average.last() {
        print_kv("Average per character", &format!("{:.2}", avg));
    }

    Ok(())
}

pub fn handle_arcs(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let arcs = arc_meta(&ctx.dataset.episodes);

    if mode == OutputMode::Json {
        output_json(&arcs);
        return Ok(());
    }

    print_header(mode, "Arcs");
    let rows = arcs
        .iter()
        .map(|a| {
            vec![
                a.saga.clone(),
                a.name.clone(),
                a.from_episode.to_string(),
                a.to_episode.to_string(),
            ]
        })
        .collect();
    print_rows(mode, &["Saga", "Arc", "From", "To"], rows);

    Ok(())
}

pub fn handle_presence(ctx: &AppContext, min_count: usize, mode: OutputMode) -> Result<()> {
    let presence = character_presence(&ctx.dataset.episodes, min_count);

    if mode == OutputMode::Json {
        output_json(&presence);
        return Ok(());
    }

    print_header(
        mode,
        &format!("Character presence (at least {} listings)", min_count),
    );
    let rows = presence
        .iter()
        .map(|p| {
            vec![
                p.character.clone(),
                p.debut_episode.to_string(),
                p.episodes.to_string(),
                p.arcs.to_string(),
                format!("{:.0}%", p.coverage * 100.0),
                match p.category {
                    PresenceCategory::Core => "Core",
                    PresenceCategory::ArcOnly => "Arc only",
                    PresenceCategory::Recurring => "Recurring",
                }
                .to_string(),
            ]
        })
        .collect();
    print_rows(
        mode,
        &["Character", "Debut", "Episodes", "Arcs", "Coverage", "Category"],
        rows,
    );

    Ok(())
}
