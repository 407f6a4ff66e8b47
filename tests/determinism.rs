//! Reproducibility and shell distribution of generated segments.

mod common;

use cmd_corpus::corpus::CorpusAssembler;
use cmd_corpus::shell::Shell;
use cmd_corpus::types::SegmentKind;
use std::collections::BTreeMap;

fn shell_shares(examples: &[cmd_corpus::example::TrainingExample]) -> BTreeMap<Shell, f64> {
    let mut counts: BTreeMap<Shell, usize> = BTreeMap::new();
    for example in examples {
        *counts.entry(example.shell).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(shell, count)| (shell, count as f64 / examples.len() as f64))
        .collect()
}

#[test]
fn chained_segment_is_identical_for_a_fixed_seed() {
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    let first = assembler
        .build_segment(SegmentKind::Chained, 1000, 42)
        .expect("first run");
    let second = assembler
        .build_segment(SegmentKind::Chained, 1000, 42)
        .expect("second run");
    assert_eq!(first.examples.len(), 1000);
    assert_eq!(first, second);

    let first_json: Vec<String> = first
        .examples
        .iter()
        .map(|example| example.analysis().to_string())
        .collect();
    let second_json: Vec<String> = second
        .examples
        .iter()
        .map(|example| example.analysis().to_string())
        .collect();
    assert_eq!(first_json, second_json);
}

#[test]
fn different_seeds_shuffle_a_similar_shell_distribution() {
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    let a = assembler
        .build_segment(SegmentKind::Chained, 1000, 1)
        .expect("seed 1");
    let b = assembler
        .build_segment(SegmentKind::Chained, 1000, 2)
        .expect("seed 2");
    assert_ne!(a.examples, b.examples);

    for examples in [&a.examples, &b.examples] {
        let shares = shell_shares(examples);
        for weight in &config.shell_weights {
            let share = shares.get(&weight.shell).copied().unwrap_or(0.0);
            assert!(
                (share - weight.weight).abs() < 0.04,
                "{} share {share:.3} vs weight {}",
                weight.shell,
                weight.weight
            );
        }
    }
}

#[test]
fn corpus_split_is_reproducible() {
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    let requests: Vec<_> = SegmentKind::ALL.iter().map(|&kind| (kind, 120)).collect();
    let corpus = assembler.assemble(&requests, 5).expect("assemble");
    let once = assembler.split(&corpus, 5);
    let twice = assembler.split(&corpus, 5);
    assert_eq!(once, twice);
    assert_eq!(once.total(), 480);
    assert_eq!(once.train.len(), 432);
    assert_eq!(once.validation.len(), 24);
    assert_eq!(once.test.len(), 24);
}
