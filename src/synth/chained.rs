use super::{or_casual_typo, Segment, SynthContext};
use crate::catalog::PatternEntry;
use crate::corrupt;
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use rand_chacha::ChaCha8Rng;

/// Chained and piped command fixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chained;

/// Catalog pool serving an error type. No subshell catalog ships, so subshell
/// draws use the chaining pool.
fn pool_name(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::Pipe => "pipe",
        ErrorType::Redirection => "redirection",
        _ => "chaining",
    }
}

impl Segment for Chained {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Chained
    }

    fn pool<'a>(
        &self,
        ctx: &SynthContext<'a>,
        shell: Shell,
        error_type: ErrorType,
        _rng: &mut ChaCha8Rng,
    ) -> Vec<&'a PatternEntry> {
        let catalogs = ctx.catalogs;
        let fallback = ctx.config.fallback_shell;
        let entries = catalogs.chained_entries(pool_name(error_type), shell, fallback);
        if !entries.is_empty() {
            return entries.iter().collect();
        }
        // Any chained pattern beats skipping the draw.
        catalogs
            .chained
            .keys()
            .flat_map(|pool| catalogs.chained_entries(pool, shell, fallback))
            .collect()
    }

    fn corrupt(
        &self,
        ctx: &SynthContext<'_>,
        text: &str,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        let corrupted = corrupt::structural_error(text, error_type, rng);
        or_casual_typo(ctx, text, corrupted, rng)
    }
}
