//! Quality gate shared by every synthesizer.
//!
//! Two properties are enforced: no example may be a null correction, and
//! single-character corrections may only make up a capped share of a corpus.
use crate::example::TrainingExample;
use tracing::debug;

/// True when the trimmed strings are identical.
pub fn is_null(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// True when the trimmed strings differ by one substitution, insertion or
/// deletion. Symmetric in its arguments.
pub fn is_single_char_correction(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.trim().chars().collect();
    let b: Vec<char> = b.trim().chars().collect();
    if a.len() == b.len() {
        return a.iter().zip(&b).filter(|(x, y)| x != y).count() == 1;
    }
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };
    if long.len() - short.len() != 1 {
        return false;
    }
    let prefix = short
        .iter()
        .zip(&long)
        .take_while(|(x, y)| x == y)
        .count();
    short[prefix..] == long[prefix + 1..]
}

/// Most single-character examples a corpus of `target` items may keep.
pub fn single_char_quota(target: usize, ratio: f64) -> usize {
    (target as f64 * ratio).ceil() as usize
}

/// Keep at most `single_char_quota(target, ratio)` single-character examples,
/// preserving order. The excess is discarded, not replaced.
pub fn cap_single_char(
    examples: Vec<TrainingExample>,
    target: usize,
    ratio: f64,
) -> Vec<TrainingExample> {
    let quota = single_char_quota(target, ratio);
    let mut kept_single = 0usize;
    let before = examples.len();
    let kept: Vec<TrainingExample> = examples
        .into_iter()
        .filter(|example| {
            if !example.is_single_char() {
                return true;
            }
            kept_single += 1;
            kept_single <= quota
        })
        .collect();
    if kept.len() < before {
        debug!(
            quota,
            dropped = before - kept.len(),
            "capped single-character corrections"
        );
    }
    kept
}

/// Corruption the gate may request when a candidate is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Segment-specific structural corruption of the correct string.
    Structural,
    /// Unconditional typo on the correct string.
    ForcedTypo,
    SpaceRemoval,
    FlagStyle,
    PathStyle,
}

const NULL_LADDER: [Fallback; 2] = [Fallback::Structural, Fallback::ForcedTypo];
const SINGLE_CHAR_LADDER: [Fallback; 3] = [
    Fallback::SpaceRemoval,
    Fallback::FlagStyle,
    Fallback::PathStyle,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { incorrect: String, single_char: bool },
    Rejected,
}

/// Retry policy applied to one correct/incorrect candidate pair.
#[derive(Debug, Clone, Copy)]
pub struct QualityGate {
    max_attempts: usize,
}

impl QualityGate {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Settle `candidate` against `correct`.
    ///
    /// Null candidates are replaced by `Structural`, then `ForcedTypo`
    /// corruptions of the correct string until one is non-null or the attempt
    /// budget runs out. A surviving single-character candidate gets up to
    /// `max_attempts` rounds of the space/flag/path ladder, each step applied
    /// to the current candidate and adopted only if it yields a multi-character
    /// correction. `corrupt` receives the fallback and the text to corrupt.
    pub fn settle<F>(&self, correct: &str, candidate: String, mut corrupt: F) -> Verdict
    where
        F: FnMut(Fallback, &str) -> String,
    {
        let mut incorrect = candidate;
        let mut attempts = 1;
        while is_null(&incorrect, correct) {
            if attempts >= self.max_attempts {
                return Verdict::Rejected;
            }
            let step = NULL_LADDER
                .get(attempts - 1)
                .copied()
                .unwrap_or(Fallback::ForcedTypo);
            incorrect = corrupt(step, correct);
            attempts += 1;
        }

        let mut rounds = 0;
        while rounds < self.max_attempts && is_single_char_correction(&incorrect, correct) {
            for step in SINGLE_CHAR_LADDER {
                let next = corrupt(step, &incorrect);
                if !is_null(&next, correct) && !is_single_char_correction(&next, correct) {
                    incorrect = next;
                    break;
                }
            }
            rounds += 1;
        }

        let single_char = is_single_char_correction(&incorrect, correct);
        Verdict::Accepted {
            incorrect,
            single_char,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;
    use crate::types::ErrorType;
    use proptest::prelude::*;

    #[test]
    fn single_char_examples() {
        assert!(is_single_char_correction("ls -la", "ls -lA"));
        assert!(is_single_char_correction("cat file", "cat files"));
        assert!(is_single_char_correction("git status", "git stats"));
        assert!(!is_single_char_correction("ls", "ls -la"));
        assert!(!is_single_char_correction("gti status", "git status"));
        assert!(!is_single_char_correction("ls", "ls"));
        assert!(is_single_char_correction("  ls -l ", "ls -lh"));
    }

    #[test]
    fn null_ignores_surrounding_whitespace() {
        assert!(is_null(" git status\n", "git status"));
        assert!(!is_null("git  status", "git status"));
    }

    #[test]
    fn quota_rounds_up() {
        assert_eq!(single_char_quota(1000, 0.05), 50);
        assert_eq!(single_char_quota(10, 0.05), 1);
        assert_eq!(single_char_quota(0, 0.05), 0);
    }

    fn example(incorrect: &str, correct: &str) -> TrainingExample {
        TrainingExample::new(
            Shell::Bash,
            incorrect,
            correct,
            "test",
            ErrorType::Typo,
            "template",
        )
    }

    #[test]
    fn cap_drops_excess_single_char_examples_only() {
        let mut examples = Vec::new();
        for _ in 0..5 {
            examples.push(example("git stats", "git status"));
            examples.push(example("gti stauts", "git status"));
        }
        let kept = cap_single_char(examples, 20, 0.1);
        assert_eq!(kept.len(), 7);
        assert_eq!(kept.iter().filter(|ex| ex.is_single_char()).count(), 2);
    }

    #[test]
    fn settle_accepts_multi_char_candidate_untouched() {
        let gate = QualityGate::new(3);
        let verdict = gate.settle("git status", "gti stauts".into(), |_, _| {
            panic!("no fallback expected")
        });
        assert_eq!(
            verdict,
            Verdict::Accepted {
                incorrect: "gti stauts".into(),
                single_char: false
            }
        );
    }

    #[test]
    fn settle_walks_null_ladder_then_rejects() {
        let gate = QualityGate::new(3);
        let mut seen = Vec::new();
        let verdict = gate.settle("ls -la", "ls -la".into(), |step, text| {
            seen.push(step);
            text.to_string()
        });
        assert_eq!(verdict, Verdict::Rejected);
        assert_eq!(seen, vec![Fallback::Structural, Fallback::ForcedTypo]);
    }

    #[test]
    fn settle_recovers_with_structural_fallback() {
        let gate = QualityGate::new(3);
        let verdict = gate.settle("a && b", " a && b ".into(), |step, _| match step {
            Fallback::Structural => "a; b".into(),
            other => panic!("unexpected {other:?}"),
        });
        assert_eq!(
            verdict,
            Verdict::Accepted {
                incorrect: "a; b".into(),
                single_char: false
            }
        );
    }

    #[test]
    fn settle_escalates_single_char_candidates() {
        let gate = QualityGate::new(3);
        let mut seen = Vec::new();
        let verdict = gate.settle("git log --oneline", "git log -oneline".into(), |step, text| {
            seen.push(step);
            match step {
                Fallback::SpaceRemoval => text.to_string(),
                Fallback::FlagStyle => "git log --online".into(),
                _ => "git log".into(),
            }
        });
        assert_eq!(seen, vec![Fallback::SpaceRemoval, Fallback::FlagStyle, Fallback::PathStyle]);
        assert_eq!(
            verdict,
            Verdict::Accepted {
                incorrect: "git log".into(),
                single_char: false
            }
        );
    }

    #[test]
    fn settle_keeps_unfixable_single_char_candidate_flagged() {
        let gate = QualityGate::new(2);
        let mut calls = 0;
        let verdict = gate.settle("pwd", "pw".into(), |_, text| {
            calls += 1;
            text.to_string()
        });
        assert_eq!(calls, 6);
        assert_eq!(
            verdict,
            Verdict::Accepted {
                incorrect: "pw".into(),
                single_char: true
            }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn single_char_is_symmetric(a in "[a-c -]{0,6}", b in "[a-c -]{0,6}") {
            prop_assert_eq!(
                is_single_char_correction(&a, &b),
                is_single_char_correction(&b, &a)
            );
        }

        #[test]
        fn one_deletion_is_single_char(text in "[a-z]{1,5}( [a-z]{1,5}){0,2}", pos in any::<prop::sample::Index>()) {
            let chars: Vec<char> = text.chars().collect();
            let idx = pos.index(chars.len());
            let shorter: String = chars
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, ch)| *ch)
                .collect();
            if shorter.trim().len() + 1 == text.len() {
                prop_assert!(is_single_char_correction(&text, &shorter));
            }
        }
    }
}
