use super::{Segment, SynthContext};
use crate::catalog::{PatternEntry, Variation};
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Natural-language requests paired with the command they describe.
///
/// The phrase is the incorrect side and the command the correct side, so the
/// phrase is always used and surface variations only ever touch it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalLanguage;

impl Segment for NaturalLanguage {
    fn kind(&self) -> SegmentKind {
        SegmentKind::NaturalLanguage
    }

    /// Style pool for the shell, with each configured extra pool prepended on
    /// its own independent roll.
    fn pool<'a>(
        &self,
        ctx: &SynthContext<'a>,
        shell: Shell,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> Vec<&'a PatternEntry> {
        let catalogs = ctx.catalogs;
        let settings = ctx.settings;
        let mut pool: Vec<&'a PatternEntry> = catalogs
            .natural_entries(shell, error_type, ctx.config.fallback_shell)
            .iter()
            .collect();
        if settings.extra_pool_styles.contains(&error_type)
            && settings.extra_pool_shells.contains(&shell)
        {
            for extra in &settings.extra_pools {
                if rng.gen_bool(extra.probability) {
                    let mut merged: Vec<&'a PatternEntry> =
                        catalogs.extra_pool(&extra.pool).iter().collect();
                    merged.append(&mut pool);
                    pool = merged;
                }
            }
        }
        pool
    }

    fn wrong_template_rate(&self, _ctx: &SynthContext<'_>) -> f64 {
        1.0
    }

    /// Wraps `text` in a random non-identity variation. The gate's structural
    /// fallback hands over the correct command, so a phrase identical to its
    /// command comes out as a wrapped command, e.g. `please git status`.
    fn corrupt(
        &self,
        ctx: &SynthContext<'_>,
        text: &str,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        let wrappers: Vec<&Variation> = ctx
            .catalogs
            .variations(error_type)
            .iter()
            .filter(|variation| !variation.is_identity())
            .collect();
        match wrappers.choose(rng) {
            Some(variation) => variation.apply(text),
            None => text.to_string(),
        }
    }

    fn surface(
        &self,
        ctx: &SynthContext<'_>,
        incorrect: String,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        match ctx.catalogs.variations(error_type).choose(rng) {
            Some(variation) => variation.apply(&incorrect),
            None => incorrect,
        }
    }
}
