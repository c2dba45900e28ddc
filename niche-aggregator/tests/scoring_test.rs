mod common;

use chrono::Duration;
use common::{article, fixed_now, init_tracing};
use niche_aggregator::scoring::{freshness_points, richness_points};
use niche_aggregator::utils::time::format_timestamp;
use niche_aggregator::{KeywordTiers, Niche, RelevanceScorer, ScoreBreakdown, ScoringConfig};
use tracing::info;

fn hours_ago(hours: i64) -> String {
    format_timestamp(fixed_now() - Duration::hours(hours))
}

#[test]
fn test_freshness_thresholds() {
    init_tracing();
    let now = fixed_now();

    let cases = [
        (0, 30),
        (5, 30),
        (6, 25),
        (23, 25),
        (24, 15),
        (71, 15),
        (72, 5),
        (167, 5),
        (168, 10),
        (1000, 10),
    ];
    for (hours, expected) in cases {
        assert_eq!(
            freshness_points(&hours_ago(hours), now),
            expected,
            "freshness for an article {} hours old",
            hours
        );
    }

    assert_eq!(freshness_points(&hours_ago(-2), now), 30, "future dates count as fresh");
    assert_eq!(freshness_points("garbage", now), 10, "unparseable dates fall back");
}

#[test]
fn test_richness_boundaries() {
    let cases = [(0, 2), (100, 2), (101, 4), (200, 4), (201, 7), (500, 7), (501, 10)];
    for (len, expected) in cases {
        assert_eq!(
            richness_points(&"a".repeat(len)),
            expected,
            "richness for a {} character description",
            len
        );
    }

    // Characters, not bytes.
    assert_eq!(richness_points(&"é".repeat(150)), 4);
}

#[test]
fn test_authority_from_name_or_url() {
    let scorer = RelevanceScorer::default();
    let now = fixed_now();
    let published = hours_ago(1);

    let by_name = article("Plain", "", "TechCrunch", "https://example.com/a", &published);
    assert_eq!(scorer.breakdown_at(&by_name, Niche::Ai, now).authority, 20);

    let by_url = article("Plain", "", "Random Blog", "https://github.com/blog/post", &published);
    assert_eq!(scorer.breakdown_at(&by_url, Niche::Ai, now).authority, 20);

    let several = article("Plain", "", "TechCrunch and Wired", "https://example.com/a", &published);
    assert_eq!(
        scorer.breakdown_at(&several, Niche::Ai, now).authority,
        20,
        "authority does not stack"
    );

    let unknown = article("Plain", "", "Some Blog", "https://blog.example.org/p", &published);
    assert_eq!(scorer.breakdown_at(&unknown, Niche::Ai, now).authority, 5);
}

#[test]
fn test_keyword_band() {
    let scorer = RelevanceScorer::default();
    let now = fixed_now();

    let two_high = article("Critical RCE vulnerability", "", "Blog", "", "");
    assert_eq!(scorer.breakdown_at(&two_high, Niche::Security, now).keyword, 20);

    let capped = article("zero-day exploit ransomware breach", "", "Blog", "", "");
    assert_eq!(scorer.breakdown_at(&capped, Niche::Security, now).keyword, 40);

    let mixed = article("A new machine learning algorithm", "", "Blog", "", "");
    assert_eq!(
        scorer.breakdown_at(&mixed, Niche::Ai, now).keyword,
        4,
        "one medium and one low keyword"
    );

    let matching_description = article("Weekly notes", "A new Bitcoin wallet", "Blog", "", "");
    assert_eq!(
        scorer.breakdown_at(&matching_description, Niche::Finance, now).keyword,
        13
    );
}

#[test]
fn test_niche_without_table_scores_no_keywords() {
    let scorer = RelevanceScorer::default();
    let item = article("PHP 8.4 released", "Laravel and Symfony news", "Blog", "", "");

    assert_eq!(scorer.breakdown_at(&item, Niche::Php, fixed_now()).keyword, 0);
    assert!(scorer.extract_keywords(&item, Niche::Php).is_empty());
}

#[test]
fn test_extract_keywords_in_priority_order() {
    let scorer = RelevanceScorer::default();

    let item = article("Phishing wave: ransomware gangs exploit zero-day", "", "Blog", "", "");
    assert_eq!(
        scorer.extract_keywords(&item, Niche::Security),
        vec!["zero-day", "exploit", "ransomware", "phishing"]
    );

    let crowded = article("Zero-day exploit: ransomware breach via XSS flaw", "", "Blog", "", "");
    assert_eq!(
        scorer.extract_keywords(&crowded, Niche::Security),
        vec!["zero-day", "exploit", "ransomware", "breach", "XSS"],
        "at most five keywords"
    );
}

#[test]
fn test_extract_keywords_deduplicates_across_tiers() {
    let config = ScoringConfig::empty().with_keywords(
        Niche::Dev,
        KeywordTiers::new(&["rust"], &["rust", "cargo"], &[]),
    );
    let scorer = RelevanceScorer::new(config);
    let item = article("Rust and cargo", "", "Blog", "", "");

    assert_eq!(scorer.extract_keywords(&item, Niche::Dev), vec!["rust", "cargo"]);
}

#[test]
fn test_base_score_example() {
    init_tracing();

    let scorer = RelevanceScorer::default();
    let item = article(
        "Critical RCE vulnerability",
        "",
        "example.com",
        "https://example.com/a",
        "2024-01-01T00:00:00+00:00",
    );

    let breakdown = scorer.breakdown_at(&item, Niche::Security, fixed_now());
    info!("Breakdown: {:?}", breakdown);

    assert_eq!(
        breakdown,
        ScoreBreakdown {
            keyword: 20,
            freshness: 10,
            authority: 5,
            richness: 2,
        }
    );
    assert_eq!(scorer.score_at(&item, Niche::Security, fixed_now()), 37);
}

#[test]
fn test_score_never_exceeds_maximum() {
    let scorer = RelevanceScorer::default();
    let item = article(
        "zero-day exploit ransomware breach",
        &"x".repeat(600),
        "The Hacker News",
        "https://thehackernews.com/a",
        &hours_ago(1),
    );

    assert_eq!(scorer.score_at(&item, Niche::Security, fixed_now()), 100);

    let overfull = ScoreBreakdown {
        keyword: 40,
        freshness: 30,
        authority: 20,
        richness: 40,
    };
    assert_eq!(overfull.total(), 100);
}
