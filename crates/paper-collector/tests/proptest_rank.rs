//! Property tests for accumulation and selection invariants.

use proptest::prelude::*;

use paper_collector::config::MergeStrategy;
use paper_collector::models::{NormalizedPaper, SourceApi};
use paper_collector::pipeline::{Accumulator, select};

fn arb_paper() -> impl Strategy<Value = NormalizedPaper> {
    ("[a-z]{1,6}", 0i64..10_000, any::<bool>()).prop_map(|(slug, citations, trusted)| {
        NormalizedPaper {
            title: format!("Paper {slug}"),
            authors: vec![],
            year: 2020,
            venue: String::new(),
            identifier: format!("10.1/{slug}"),
            citation_count: citations,
            summary: String::new(),
            publication_type: "article".into(),
            matched_keywords: vec![],
            source: SourceApi::SemanticScholar,
            url: String::new(),
            is_trusted_venue: trusted,
        }
    })
}

proptest! {
    #[test]
    fn selection_is_sorted_and_bounded(
        papers in proptest::collection::vec(arb_paper(), 0..40),
        limit in 0usize..60,
    ) {
        let mut acc = Accumulator::new(MergeStrategy::KeepFirst);
        for p in papers {
            acc.accept(p, "k");
        }

        let selected = select(&acc, limit);

        prop_assert_eq!(selected.len(), limit.min(acc.len()));
        for pair in selected.windows(2) {
            let a = (pair[0].is_trusted_venue, pair[0].citation_count);
            let b = (pair[1].is_trusted_venue, pair[1].citation_count);
            prop_assert!(a >= b, "selection not ordered: {:?} before {:?}", a, b);
        }
    }

    #[test]
    fn accumulator_never_holds_duplicate_identifiers(
        papers in proptest::collection::vec(arb_paper(), 0..40),
    ) {
        let mut acc = Accumulator::new(MergeStrategy::KeepFirst);
        for p in papers {
            acc.accept(p, "k");
        }

        let mut seen = std::collections::HashSet::new();
        for paper in acc.papers() {
            prop_assert!(seen.insert(paper.identifier.clone()));
        }
    }

    #[test]
    fn repeat_sightings_only_grow_keywords(
        paper in arb_paper(),
        keywords in proptest::collection::vec("[a-z]{1,5}", 1..8),
    ) {
        let mut acc = Accumulator::new(MergeStrategy::KeepFirst);
        acc.accept(paper.clone(), &keywords[0]);
        let baseline = acc.get(&paper.identifier).unwrap().clone();

        for keyword in &keywords {
            let mut repeat = paper.clone();
            repeat.citation_count += 1;
            repeat.summary = "richer".into();
            acc.accept(repeat, keyword);
        }

        prop_assert_eq!(acc.len(), 1);
        let merged = acc.get(&paper.identifier).unwrap();
        prop_assert_eq!(merged.citation_count, baseline.citation_count);
        prop_assert_eq!(&merged.summary, &baseline.summary);

        let mut unique: Vec<&String> = vec![];
        for k in &merged.matched_keywords {
            prop_assert!(!unique.contains(&k), "duplicate keyword {}", k);
            unique.push(k);
        }
    }
}
