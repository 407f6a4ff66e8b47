//! Context-free string mutators used to derive an incorrect command.
//!
//! Every primitive takes an already-expanded command and returns a new
//! string. When the structure a primitive targets is absent the input is
//! returned unchanged, so callers can chain fallbacks freely. Word-level edits
//! only rewrite the affected token span; the rest of the text, including any
//! unusual whitespace, is preserved.
use crate::types::ErrorType;
use rand::distributions::WeightedIndex;
use rand::seq::SliceRandom;
use rand::Rng;

const FLAG_ARGUMENT_DROP_RATE: f64 = 0.3;
const EXTRA_SYNTAX_CHARS: &[char] = &['{', '}', '[', ']', '(', ')', ';'];
const OPERATOR_DOWNGRADES: &[(&str, &str)] = &[("&&", "&"), ("||", "|"), (">>", ">"), ("==", "=")];

/// QWERTY neighbours of each lowercase letter.
fn keyboard_adjacent(ch: char) -> Option<&'static str> {
    let neighbours = match ch {
        'a' => "qwsz",
        'b' => "vghn",
        'c' => "xdfv",
        'd' => "serfcx",
        'e' => "wsdr",
        'f' => "drtgcv",
        'g' => "ftyhbv",
        'h' => "gyujnb",
        'i' => "ujko",
        'j' => "huiknm",
        'k' => "jiolm",
        'l' => "kop",
        'm' => "njk",
        'n' => "bhjm",
        'o' => "iklp",
        'p' => "ol",
        'q' => "wa",
        'r' => "edft",
        's' => "awedxz",
        't' => "rfgy",
        'u' => "yhji",
        'v' => "cfgb",
        'w' => "qase",
        'x' => "zsdc",
        'y' => "tghu",
        'z' => "asx",
        _ => return None,
    };
    Some(neighbours)
}

/// Byte ranges of the whitespace-separated tokens in `text`.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                spans.push((begin, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(begin) = start {
        spans.push((begin, text.len()));
    }
    spans
}

fn replace_span(text: &str, span: (usize, usize), replacement: &str) -> String {
    format!("{}{}{}", &text[..span.0], replacement, &text[span.1..])
}

#[derive(Debug, Clone, Copy)]
enum TypoKind {
    Swap,
    Delete,
    Insert,
    Adjacent,
    Double,
}

const TYPO_KINDS: [TypoKind; 5] = [
    TypoKind::Swap,
    TypoKind::Delete,
    TypoKind::Insert,
    TypoKind::Adjacent,
    TypoKind::Double,
];

/// With probability `rate`, mutate one word (longer words are likelier).
pub fn typo<R: Rng>(text: &str, rate: f64, rng: &mut R) -> String {
    if text.is_empty() || !rng.gen_bool(rate.clamp(0.0, 1.0)) {
        return text.to_string();
    }
    let spans = token_spans(text);
    let weights: Vec<usize> = spans
        .iter()
        .map(|(start, end)| text[*start..*end].chars().count())
        .collect();
    let Ok(dist) = WeightedIndex::new(&weights) else {
        return text.to_string();
    };
    let span = spans[rng.sample(&dist)];
    let mut word: Vec<char> = text[span.0..span.1].chars().collect();
    let len = word.len();
    if len < 2 {
        return text.to_string();
    }

    match TYPO_KINDS[rng.gen_range(0..TYPO_KINDS.len())] {
        TypoKind::Swap if len >= 3 => {
            let pos = rng.gen_range(0..=len - 2);
            word.swap(pos, pos + 1);
        }
        TypoKind::Delete if len >= 3 => {
            let pos = rng.gen_range(1..len);
            word.remove(pos);
        }
        TypoKind::Insert => {
            let pos = rng.gen_range(1..len);
            let letter = char::from(b'a' + rng.gen_range(0..26u8));
            word.insert(pos, letter);
        }
        TypoKind::Adjacent => {
            let pos = rng.gen_range(0..len);
            if let Some(neighbours) = keyboard_adjacent(word[pos].to_ascii_lowercase()) {
                if let Some(byte) = neighbours.as_bytes().choose(rng) {
                    word[pos] = char::from(*byte);
                }
            }
        }
        TypoKind::Double => {
            let pos = rng.gen_range(0..len);
            word.insert(pos, word[pos]);
        }
        _ => {}
    }
    let word: String = word.into_iter().collect();
    replace_span(text, span, &word)
}

/// Merge two adjacent tokens by deleting the whitespace between them.
pub fn remove_space<R: Rng>(text: &str, rng: &mut R) -> String {
    let spans = token_spans(text);
    if spans.len() < 2 {
        return text.to_string();
    }
    let idx = rng.gen_range(0..spans.len() - 1);
    format!("{}{}", &text[..spans[idx].1], &text[spans[idx + 1].0..])
}

/// Demote the first ` --` to ` -`, or promote the first ` -` when no long
/// flag is present.
pub fn toggle_flag_style(text: &str) -> String {
    if text.contains(" --") {
        text.replacen(" --", " -", 1)
    } else if text.contains(" -") {
        text.replacen(" -", " --", 1)
    } else {
        text.to_string()
    }
}

/// Toggle flag style, then sometimes drop the argument of the first flag.
pub fn flag_error<R: Rng>(text: &str, rng: &mut R) -> String {
    let toggled = toggle_flag_style(text);
    if !rng.gen_bool(FLAG_ARGUMENT_DROP_RATE) {
        return toggled;
    }
    let spans = token_spans(&toggled);
    for pair in spans.windows(2) {
        let (flag, arg) = (pair[0], pair[1]);
        if toggled[flag.0..flag.1].starts_with('-') && !toggled[arg.0..arg.1].starts_with('-') {
            return format!("{}{}", &toggled[..flag.1], &toggled[arg.1..]);
        }
    }
    toggled
}

/// Drop a privilege escalation: a leading `sudo`, or PowerShell's
/// `-Verb RunAs`.
pub fn strip_privilege(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("sudo ") {
        return rest.trim_start().to_string();
    }
    if text.contains(" -Verb RunAs") {
        return text.replacen(" -Verb RunAs", "", 1);
    }
    text.to_string()
}

#[derive(Debug, Clone, Copy)]
enum PathKind {
    RelativeAbsolute,
    MergeSegments,
    Typo,
    WindowsSeparator,
}

const PATH_KINDS: [PathKind; 4] = [
    PathKind::RelativeAbsolute,
    PathKind::MergeSegments,
    PathKind::Typo,
    PathKind::WindowsSeparator,
];

pub fn path_error<R: Rng>(text: &str, rng: &mut R) -> String {
    match PATH_KINDS[rng.gen_range(0..PATH_KINDS.len())] {
        PathKind::RelativeAbsolute => toggle_path_prefix(text),
        PathKind::MergeSegments => merge_path_segments(text, rng),
        PathKind::Typo => typo(text, 1.0, rng),
        PathKind::WindowsSeparator => text.replacen('/', "\\", 1),
    }
}

fn toggle_path_prefix(text: &str) -> String {
    let spans = token_spans(text);
    if let Some(span) = spans.iter().find(|(s, e)| text[*s..*e].starts_with("./")) {
        return replace_span(text, *span, &text[span.0 + 1..span.1]);
    }
    if let Some(span) = spans.iter().find(|(s, e)| text[*s..*e].starts_with('/')) {
        return replace_span(text, *span, &format!(".{}", &text[span.0..span.1]));
    }
    text.to_string()
}

fn merge_path_segments<R: Rng>(text: &str, rng: &mut R) -> String {
    let spans = token_spans(text);
    let Some(span) = spans
        .into_iter()
        .find(|(s, e)| text[*s..*e].split('/').count() > 2)
    else {
        return text.to_string();
    };
    let mut segments: Vec<String> = text[span.0..span.1].split('/').map(str::to_string).collect();
    let idx = rng.gen_range(0..segments.len() - 1);
    let next = segments.remove(idx + 1);
    segments[idx].push_str(&next);
    replace_span(text, span, &segments.join("/"))
}

#[derive(Debug, Clone, Copy)]
enum SyntaxKind {
    MissingQuote,
    MissingEscape,
    WrongOperator,
    ExtraCharacter,
}

const SYNTAX_KINDS: [SyntaxKind; 4] = [
    SyntaxKind::MissingQuote,
    SyntaxKind::MissingEscape,
    SyntaxKind::WrongOperator,
    SyntaxKind::ExtraCharacter,
];

pub fn syntax_error<R: Rng>(text: &str, rng: &mut R) -> String {
    match SYNTAX_KINDS[rng.gen_range(0..SYNTAX_KINDS.len())] {
        SyntaxKind::MissingQuote => {
            if text.contains('"') {
                text.replacen('"', "", 1)
            } else {
                text.replacen('\'', "", 1)
            }
        }
        SyntaxKind::MissingEscape => text.replacen('\\', "", 1),
        SyntaxKind::WrongOperator => OPERATOR_DOWNGRADES
            .iter()
            .find(|(from, _)| text.contains(from))
            .map(|(from, to)| text.replacen(from, to, 1))
            .unwrap_or_else(|| text.to_string()),
        SyntaxKind::ExtraCharacter => {
            let spans = token_spans(text);
            let Some(span) = spans.choose(rng).copied() else {
                return text.to_string();
            };
            let mut word: Vec<char> = text[span.0..span.1].chars().collect();
            let pos = rng.gen_range(0..=word.len());
            let extra = EXTRA_SYNTAX_CHARS[rng.gen_range(0..EXTRA_SYNTAX_CHARS.len())];
            word.insert(pos, extra);
            let word: String = word.into_iter().collect();
            replace_span(text, span, &word)
        }
    }
}

/// Structural edit for chained commands. Subshell shares the chaining edits.
pub fn structural_error<R: Rng>(text: &str, kind: ErrorType, rng: &mut R) -> String {
    match kind {
        ErrorType::Pipe => {
            let mut stages: Vec<&str> = text.split(" | ").collect();
            if stages.len() < 3 {
                return text.to_string();
            }
            let idx = rng.gen_range(1..stages.len() - 1);
            stages.remove(idx);
            stages.join(" | ")
        }
        ErrorType::Chaining | ErrorType::Subshell => {
            if text.contains(" && ") {
                text.replacen(" && ", "; ", 1)
            } else {
                text.replacen(" || ", " | ", 1)
            }
        }
        ErrorType::Redirection => {
            if text.contains("2>&1") {
                text.replacen("2>&1", "2>1", 1)
            } else {
                text.replacen(">>", ">", 1)
            }
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
#[path = "corrupt_tests.rs"]
mod tests;
