//! End-to-end quality properties of a full generated corpus.

mod common;

use cmd_corpus::corpus::CorpusAssembler;
use cmd_corpus::output;
use cmd_corpus::quality;
use cmd_corpus::report;
use cmd_corpus::types::SegmentKind;
use cmd_corpus::vars;

#[test]
fn every_segment_is_free_of_null_corrections() {
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    for kind in SegmentKind::ALL {
        let segment = assembler.build_segment(kind, 600, 17).expect("segment");
        assert_eq!(segment.examples.len(), 600, "{kind}");
        for example in &segment.examples {
            assert_ne!(
                example.incorrect_command.trim(),
                example.correct_command.trim(),
                "{kind}: null correction"
            );
        }
        let single = segment
            .examples
            .iter()
            .filter(|example| example.is_single_char())
            .count();
        assert!(
            single <= quality::single_char_quota(600, config.max_single_char_ratio),
            "{kind}: {single} single-character corrections"
        );
    }
}

#[test]
fn known_placeholders_are_always_resolved() {
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    for kind in [SegmentKind::SingleCommand, SegmentKind::TopTools] {
        let segment = assembler.build_segment(kind, 300, 23).expect("segment");
        for example in &segment.examples {
            let unresolved: Vec<String> = vars::placeholders(&example.correct_command)
                .into_iter()
                .filter(|name| catalogs.variables.contains_key(name))
                .collect();
            assert!(
                unresolved.is_empty(),
                "{kind}: {} left {unresolved:?}",
                example.correct_command
            );
        }
    }
}

#[test]
fn written_corpus_passes_verification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let generated = dir.path().join("generated");
    let config = common::config();
    let catalogs = common::catalogs();
    let assembler = CorpusAssembler::new(&config, &catalogs);
    let requests: Vec<_> = SegmentKind::ALL.iter().map(|&kind| (kind, 250)).collect();
    let corpus = assembler.assemble(&requests, 42).expect("assemble");
    for segment in &corpus {
        output::write_segment(&generated, segment).expect("write segment");
    }
    let splits = assembler.split(&corpus, 42);
    let written = output::write_splits(&dir.path().join("final"), &splits).expect("write splits");
    let lines: usize = written
        .iter()
        .map(|path| output::count_lines(path).expect("count"))
        .sum();
    assert_eq!(lines, splits.total());

    let report = report::analyze_dir(&generated).expect("analyze");
    assert_eq!(report.total, 1000);
    assert_eq!(report.null_corrections, 0);
    assert!(report.passed(), "{}", report.render_text());
    assert_eq!(report.by_segment.len(), 4);
}
