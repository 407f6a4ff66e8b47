use super::{or_casual_typo, Segment, SynthContext};
use crate::catalog::PatternEntry;
use crate::corrupt;
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Share of typo draws that merge two tokens instead of mangling a word;
/// merged tokens are never single-character corrections.
const SPACE_REMOVAL_SHARE: f64 = 0.8;

/// Single-command fixes drawn from the per-shell category tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCommand;

impl Segment for SingleCommand {
    fn kind(&self) -> SegmentKind {
        SegmentKind::SingleCommand
    }

    fn pool<'a>(
        &self,
        ctx: &SynthContext<'a>,
        shell: Shell,
        _error_type: ErrorType,
        _rng: &mut ChaCha8Rng,
    ) -> Vec<&'a PatternEntry> {
        let catalogs = ctx.catalogs;
        catalogs.single_entries(shell, &ctx.settings.categories, ctx.config.fallback_shell)
    }

    fn corrupt(
        &self,
        ctx: &SynthContext<'_>,
        text: &str,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        let corrupted = match error_type {
            ErrorType::Typo if rng.gen_bool(SPACE_REMOVAL_SHARE) => corrupt::remove_space(text, rng),
            ErrorType::WrongFlag => corrupt::flag_error(text, rng),
            ErrorType::Permission => corrupt::strip_privilege(text),
            ErrorType::Path => corrupt::path_error(text, rng),
            ErrorType::Syntax => corrupt::syntax_error(text, rng),
            _ => corrupt::typo(text, 1.0, rng),
        };
        or_casual_typo(ctx, text, corrupted, rng)
    }

    fn metadata(&self, entry: &PatternEntry) -> BTreeMap<String, String> {
        BTreeMap::from([("template".to_string(), entry.correct_template.clone())])
    }
}
