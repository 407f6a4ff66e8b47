//! Example synthesis.
//!
//! One generic [`Synthesizer`] owns the shared draw/retry/quality logic; the
//! four corpus segments plug in through the [`Segment`] trait, which supplies
//! the candidate pool, the segment's own corruption and optional surface
//! wrapping.
mod chained;
mod natural;
mod single;
mod tools;

pub use chained::Chained;
pub use natural::NaturalLanguage;
pub use single::SingleCommand;
pub use tools::TopTools;

use crate::catalog::{Catalogs, PatternEntry};
use crate::config::{CorpusConfig, SegmentConfig, ShellWeight};
use crate::corrupt;
use crate::example::TrainingExample;
use crate::quality::{self, Fallback, QualityGate, Verdict};
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use crate::vars::{self, VariablePool};
use anyhow::{Context, Result};
use rand::distributions::WeightedIndex;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

/// Read-only inputs shared by a segment's draws.
#[derive(Debug, Clone, Copy)]
pub struct SynthContext<'a> {
    pub config: &'a CorpusConfig,
    pub settings: &'a SegmentConfig,
    pub catalogs: &'a Catalogs,
}

/// Segment-specific pieces of synthesis.
pub trait Segment {
    fn kind(&self) -> SegmentKind;

    /// Candidate entries for one draw. An empty pool skips the draw.
    fn pool<'a>(
        &self,
        ctx: &SynthContext<'a>,
        shell: Shell,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> Vec<&'a PatternEntry>;

    /// Chance of using an author-supplied wrong template when one exists.
    fn wrong_template_rate(&self, ctx: &SynthContext<'_>) -> f64 {
        ctx.config.predefined_error_rate
    }

    /// Derive an incorrect string from `text` without a wrong template.
    fn corrupt(
        &self,
        ctx: &SynthContext<'_>,
        text: &str,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String;

    /// Final wrapping applied to the incorrect side only.
    fn surface(
        &self,
        _ctx: &SynthContext<'_>,
        incorrect: String,
        _error_type: ErrorType,
        _rng: &mut ChaCha8Rng,
    ) -> String {
        incorrect
    }

    fn metadata(&self, _entry: &PatternEntry) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// Split `count` across shells by weight, truncating each share and crediting
/// the remainder to `fallback`. Order follows `weights`.
pub fn allocate_shells(count: usize, weights: &[ShellWeight], fallback: Shell) -> Vec<(Shell, usize)> {
    let mut counts: Vec<(Shell, usize)> = weights
        .iter()
        .map(|entry| (entry.shell, (count as f64 * entry.weight).floor() as usize))
        .collect();
    let allocated: usize = counts.iter().map(|(_, n)| n).sum();
    if allocated < count {
        let remainder = count - allocated;
        match counts.iter_mut().find(|(shell, _)| *shell == fallback) {
            Some((_, n)) => *n += remainder,
            None => counts.push((fallback, remainder)),
        }
    }
    counts
}

struct Draw {
    example: TrainingExample,
    single_char: bool,
}

/// Shared synthesis engine for one segment.
pub struct Synthesizer<'a, S> {
    segment: S,
    ctx: SynthContext<'a>,
    vars: VariablePool<'a>,
    gate: QualityGate,
    error_kinds: Vec<ErrorType>,
    error_mix: WeightedIndex<f64>,
}

impl<'a, S: Segment> Synthesizer<'a, S> {
    pub fn new(segment: S, config: &'a CorpusConfig, catalogs: &'a Catalogs) -> Result<Self> {
        let kind = segment.kind();
        let settings = config.segment(kind)?;
        let error_kinds = settings.error_mix.iter().map(|entry| entry.kind).collect();
        let error_mix = WeightedIndex::new(settings.error_mix.iter().map(|entry| entry.weight))
            .with_context(|| format!("build error mix for {kind}"))?;
        Ok(Self {
            segment,
            ctx: SynthContext {
                config,
                settings,
                catalogs,
            },
            vars: VariablePool::new(&catalogs.variables),
            gate: QualityGate::new(config.max_attempts),
            error_kinds,
            error_mix,
        })
    }

    /// Generate exactly `count` examples when the catalogs allow it.
    ///
    /// Shells get their weighted share first; missing examples are then
    /// over-generated from the fallback shell for a bounded number of rounds.
    /// Single-character corrections beyond the quota do not count toward the
    /// target and are dropped by the cap.
    pub fn generate(&self, count: usize, seed: u64) -> Vec<TrainingExample> {
        let config = self.ctx.config;
        let kind = self.segment.kind();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let quota = quality::single_char_quota(count, config.max_single_char_ratio);
        let mut examples = Vec::with_capacity(count);
        let mut single_char = 0usize;
        let mut rejected = 0usize;

        for (shell, share) in allocate_shells(count, &config.shell_weights, config.fallback_shell) {
            for _ in 0..share {
                match self.draw(shell, &mut rng) {
                    Some(draw) => {
                        single_char += usize::from(draw.single_char);
                        examples.push(draw.example);
                    }
                    None => rejected += 1,
                }
            }
        }

        for round in 0..config.deficit_rounds {
            let usable = examples.len() - single_char.saturating_sub(quota);
            if usable >= count {
                break;
            }
            let deficit = count - usable;
            debug!(segment = %kind, round, deficit, "regenerating deficit");
            for _ in 0..deficit * 2 {
                match self.draw(config.fallback_shell, &mut rng) {
                    Some(draw) => {
                        single_char += usize::from(draw.single_char);
                        examples.push(draw.example);
                    }
                    None => rejected += 1,
                }
            }
        }

        examples.shuffle(&mut rng);
        let mut examples =
            quality::cap_single_char(examples, count, config.max_single_char_ratio);
        examples.shuffle(&mut rng);
        examples.truncate(count);

        let kept_single = examples.iter().filter(|example| example.is_single_char()).count();
        info!(
            segment = %kind,
            requested = count,
            generated = examples.len(),
            single_char = kept_single,
            rejected,
            "segment synthesized"
        );
        examples
    }

    fn draw_error_type(&self, rng: &mut ChaCha8Rng) -> ErrorType {
        self.error_kinds[rng.sample(&self.error_mix)]
    }

    fn draw(&self, shell: Shell, rng: &mut ChaCha8Rng) -> Option<Draw> {
        let error_type = self.draw_error_type(rng);
        let pool = self.segment.pool(&self.ctx, shell, error_type, rng);
        let Some(entry) = pool.choose(rng).copied() else {
            trace!(%shell, %error_type, "empty pattern pool");
            return None;
        };

        let binding = self.vars.resolve_entry(entry, rng);
        let correct = vars::expand(&entry.correct_template, &binding);
        let rate = self.segment.wrong_template_rate(&self.ctx).clamp(0.0, 1.0);
        let candidate = if !entry.wrong_templates.is_empty() && rng.gen_bool(rate) {
            let template = &entry.wrong_templates[rng.gen_range(0..entry.wrong_templates.len())];
            vars::expand(template, &binding)
        } else {
            self.segment.corrupt(&self.ctx, &correct, error_type, rng)
        };
        let candidate = self.segment.surface(&self.ctx, candidate, error_type, rng);

        let verdict = self.gate.settle(&correct, candidate, |step, text| {
            self.fallback(step, text, error_type, rng)
        });
        let Verdict::Accepted {
            incorrect,
            single_char,
        } = verdict
        else {
            trace!(%shell, %error_type, correct = %correct, "null correction discarded");
            return None;
        };

        let example = TrainingExample::new(
            shell,
            &incorrect,
            &correct,
            &entry.category,
            error_type,
            self.segment.kind().source_label(),
        )
        .with_metadata(self.segment.metadata(entry));
        Some(Draw {
            example,
            single_char,
        })
    }

    fn fallback(
        &self,
        step: Fallback,
        text: &str,
        error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        match step {
            Fallback::Structural => self.segment.corrupt(&self.ctx, text, error_type, rng),
            Fallback::ForcedTypo => corrupt::typo(text, 1.0, rng),
            Fallback::SpaceRemoval => corrupt::remove_space(text, rng),
            Fallback::FlagStyle => corrupt::flag_error(text, rng),
            Fallback::PathStyle => corrupt::path_error(text, rng),
        }
    }
}

/// Run the synthesizer registered for `kind`.
pub fn synthesize(
    kind: SegmentKind,
    config: &CorpusConfig,
    catalogs: &Catalogs,
    count: usize,
    seed: u64,
) -> Result<Vec<TrainingExample>> {
    let examples = match kind {
        SegmentKind::SingleCommand => {
            Synthesizer::new(SingleCommand, config, catalogs)?.generate(count, seed)
        }
        SegmentKind::Chained => Synthesizer::new(Chained, config, catalogs)?.generate(count, seed),
        SegmentKind::NaturalLanguage => {
            Synthesizer::new(NaturalLanguage, config, catalogs)?.generate(count, seed)
        }
        SegmentKind::TopTools => Synthesizer::new(TopTools, config, catalogs)?.generate(count, seed),
    };
    Ok(examples)
}

/// Segment-level fallback when a targeted corruption found nothing to edit.
fn or_casual_typo(
    ctx: &SynthContext<'_>,
    original: &str,
    corrupted: String,
    rng: &mut ChaCha8Rng,
) -> String {
    if corrupted == original {
        corrupt::typo(original, ctx.config.typo_rate, rng)
    } else {
        corrupted
    }
}

#[cfg(test)]
#[path = "synth_tests.rs"]
mod tests;
