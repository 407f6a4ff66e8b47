//! Corpus assembly: per-segment generation plus the global train/validation/test split.
use crate::catalog::Catalogs;
use crate::config::CorpusConfig;
use crate::example::TrainingExample;
use crate::quality;
use crate::synth;
use crate::types::SegmentKind;
use anyhow::Result;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Examples produced for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutput {
    pub kind: SegmentKind,
    pub examples: Vec<TrainingExample>,
}

/// Prefix slices of the pooled, shuffled corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Splits {
    pub train: Vec<TrainingExample>,
    pub validation: Vec<TrainingExample>,
    pub test: Vec<TrainingExample>,
}

impl Splits {
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Named parts in write order.
    pub fn parts(&self) -> [(&'static str, &[TrainingExample]); 3] {
        [
            ("train", &self.train),
            ("validation", &self.validation),
            ("test", &self.test),
        ]
    }
}

pub struct CorpusAssembler<'a> {
    config: &'a CorpusConfig,
    catalogs: &'a Catalogs,
}

impl<'a> CorpusAssembler<'a> {
    pub fn new(config: &'a CorpusConfig, catalogs: &'a Catalogs) -> Self {
        Self { config, catalogs }
    }

    pub fn build_segment(&self, kind: SegmentKind, count: usize, seed: u64) -> Result<SegmentOutput> {
        let examples = synth::synthesize(kind, self.config, self.catalogs, count, seed)?;
        Ok(SegmentOutput { kind, examples })
    }

    /// Generate every requested segment. Each segment gets its own generator
    /// seeded with `seed`, so segments are reproducible independently.
    pub fn assemble(
        &self,
        requests: &[(SegmentKind, usize)],
        seed: u64,
    ) -> Result<Vec<SegmentOutput>> {
        requests
            .iter()
            .map(|&(kind, count)| self.build_segment(kind, count, seed))
            .collect()
    }

    /// Pool all segments, cap single-character corrections over the pooled
    /// total, shuffle once and slice by the configured ratios. Test takes the
    /// remainder.
    pub fn split(&self, corpus: &[SegmentOutput], seed: u64) -> Splits {
        let pooled: Vec<TrainingExample> = corpus
            .iter()
            .flat_map(|segment| segment.examples.iter().cloned())
            .collect();
        let target = pooled.len();
        let mut pooled =
            quality::cap_single_char(pooled, target, self.config.max_single_char_ratio);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        pooled.shuffle(&mut rng);

        let total = pooled.len();
        let ratios = &self.config.split;
        let train_end = (total as f64 * ratios.train).floor() as usize;
        let val_end = (train_end + (total as f64 * ratios.validation).floor() as usize).min(total);

        let test = pooled.split_off(val_end);
        let validation = pooled.split_off(train_end);
        let splits = Splits {
            train: pooled,
            validation,
            test,
        };
        info!(
            total,
            train = splits.train.len(),
            validation = splits.validation.len(),
            test = splits.test.len(),
            "corpus split"
        );
        splits
    }
}
