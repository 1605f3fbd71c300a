//! Metric series computed from debut, crew and air-date fields on disk.

mod common;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use castgraph::models::CrewRole;
use castgraph::services::{
    arc_meta, crew_leaderboard, crew_metrics, episode_metrics, technique_running,
};
use common::{DatasetDir, EpisodeBuilder};

async fn romance_dawn() -> castgraph::init::AppContext {
    let dir = DatasetDir::new();
    dir.write_episodes(&[
        EpisodeBuilder::new(1, &["Luffy", "Koby"])
            .arc("Romance Dawn")
            .airdate("1999-10-20")
            .char_debut("Luffy, Koby")
            .tech_debut("Luffy: Gum-Gum Pistol; Unattributed: Bandit swing")
            .director("Konosuke Uda")
            .build(),
        EpisodeBuilder::new(2, &["Luffy", "Zoro", "Koby"])
            .arc("Romance Dawn")
            .airdate("1999-11-17")
            .char_debut("Zoro")
            .tech_debut("Luffy: Gum-Gum Bazooka\nZoro: Oni Giri")
            .director("Konosuke Uda")
            .build(),
        EpisodeBuilder::new(3, &["Luffy", "Zoro"])
            .arc("Orange Town")
            .tech_debut("Zoro: Tora Gari")
            .director("Junji Shimizu")
            .build(),
    ]);
    dir.context().await.unwrap()
}

#[tokio::test]
async fn debut_fields_feed_episode_metrics() {
    let ctx = romance_dawn().await;
    let metrics = episode_metrics(&ctx.dataset.episodes);

    let rows: Vec<(i64, usize, usize, usize)> = metrics
        .iter()
        .map(|m| {
            (
                m.episode_number,
                m.character_debuts,
                m.character_appearances,
                m.technique_debuts,
            )
        })
        .collect();
    assert_eq!(rows, vec![(1, 2, 2, 1), (2, 1, 3, 2), (3, 0, 2, 1)]);
    assert_eq!(metrics[0].air_date, NaiveDate::from_ymd_opt(1999, 10, 20));
    assert_eq!(metrics[2].air_date, None);
}

#[tokio::test]
async fn technique_debuts_accumulate_per_character() {
    let ctx = romance_dawn().await;
    let running = technique_running(&ctx.dataset.episodes, 2);

    assert_eq!(running.episode_numbers, vec![1, 2, 3]);
    let series: Vec<(&str, &[u32])> = running
        .series
        .iter()
        .map(|s| (s.character.as_str(), s.values.as_slice()))
        .collect();
    assert_eq!(
        series,
        vec![("Luffy", &[1, 2, 2][..]), ("Zoro", &[0, 1, 2][..])]
    );
    assert_eq!(running.average, vec![1.0, 1.5, 2.0]);
}

#[tokio::test]
async fn director_credits_feed_crew_metrics() {
    let ctx = romance_dawn().await;
    let episodes = &ctx.dataset.episodes;
    let metrics = crew_metrics(episodes);

    let director = |idx: usize| {
        metrics[idx]
            .roles
            .iter()
            .find(|r| r.role == CrewRole::Director)
            .unwrap()
            .clone()
    };
    assert_eq!(director(0).contributor.as_deref(), Some("Konosuke Uda"));
    assert_eq!(director(0).unique_people, 1);
    assert_eq!(director(2).unique_people, 2);
    assert_eq!(director(2).credits_per_person, 1.5);
    assert_eq!(director(2).avg_per_episode, 1.0);

    let writer = metrics[2]
        .roles
        .iter()
        .find(|r| r.role == CrewRole::Writer)
        .unwrap();
    assert!(!writer.credited);
    assert_eq!(writer.unique_people, 0);

    assert_eq!(
        crew_leaderboard(episodes, CrewRole::Director),
        vec![
            ("Konosuke Uda".to_string(), 2),
            ("Junji Shimizu".to_string(), 1)
        ]
    );
}

#[tokio::test]
async fn arc_names_give_ranges() {
    let ctx = romance_dawn().await;
    let arcs: Vec<(String, i64, i64)> = arc_meta(&ctx.dataset.episodes)
        .into_iter()
        .map(|a| (a.name, a.from_episode, a.to_episode))
        .collect();
    assert_eq!(
        arcs,
        vec![
            ("Romance Dawn".to_string(), 1, 2),
            ("Orange Town".to_string(), 3, 3)
        ]
    );
}
