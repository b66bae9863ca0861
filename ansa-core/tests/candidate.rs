use ansa_core::{Candidate, EvidenceItem, SourceKind};

#[test]
fn top_score_is_max_of_items() {
    let candidate = Candidate::new(
        SourceKind::Web,
        "answer",
        vec![
            EvidenceItem {
                title: Some("a".to_string()),
                score: 0.4,
                ..Default::default()
            },
            EvidenceItem {
                title: Some("b".to_string()),
                score: 0.82,
                ..Default::default()
            },
            EvidenceItem {
                title: Some("c".to_string()),
                score: 0.6,
                ..Default::default()
            },
        ],
    );
    assert_eq!(candidate.top_score, 0.82);
}

#[test]
fn top_score_is_zero_for_empty_items() {
    let candidate = Candidate::new(SourceKind::KnowledgeBase, "answer", Vec::new());
    assert_eq!(candidate.top_score, 0.0);
}

#[test]
fn title_or_source_fallback_chain() {
    let titled = EvidenceItem {
        title: Some("Intro to Rust".to_string()),
        source: Some("book.pdf".to_string()),
        ..Default::default()
    };
    assert_eq!(titled.title_or_source(), "Intro to Rust");

    let sourced = EvidenceItem {
        source: Some("book.pdf".to_string()),
        url: Some("https://example.com".to_string()),
        ..Default::default()
    };
    assert_eq!(sourced.title_or_source(), "book.pdf");

    let linked = EvidenceItem {
        url: Some("https://example.com".to_string()),
        ..Default::default()
    };
    assert_eq!(linked.title_or_source(), "https://example.com");

    assert_eq!(EvidenceItem::default().title_or_source(), "unknown");
}

#[test]
fn candidate_serializes_round_trip() {
    let candidate = Candidate::new(
        SourceKind::KnowledgeBase,
        "answer",
        vec![EvidenceItem {
            source: Some("notes.md".to_string()),
            page: Some(3),
            chunk_index: Some(7),
            score: 0.91,
            ..Default::default()
        }],
    );
    let json = serde_json::to_string(&candidate).unwrap();
    let back: Candidate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, candidate);
}
