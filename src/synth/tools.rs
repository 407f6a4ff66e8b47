use super::{Segment, SynthContext};
use crate::catalog::PatternEntry;
use crate::corrupt;
use crate::shell::Shell;
use crate::types::{ErrorType, SegmentKind};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Fixes for popular CLI tools, drawn uniformly from the flattened catalog
/// whatever the shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopTools;

impl Segment for TopTools {
    fn kind(&self) -> SegmentKind {
        SegmentKind::TopTools
    }

    fn pool<'a>(
        &self,
        ctx: &SynthContext<'a>,
        _shell: Shell,
        _error_type: ErrorType,
        _rng: &mut ChaCha8Rng,
    ) -> Vec<&'a PatternEntry> {
        let catalogs = ctx.catalogs;
        catalogs.tools().iter().collect()
    }

    fn corrupt(
        &self,
        _ctx: &SynthContext<'_>,
        text: &str,
        _error_type: ErrorType,
        rng: &mut ChaCha8Rng,
    ) -> String {
        corrupt::typo(text, 1.0, rng)
    }

    fn metadata(&self, entry: &PatternEntry) -> BTreeMap<String, String> {
        entry
            .tool
            .iter()
            .map(|tool| ("tool".to_string(), tool.clone()))
            .collect()
    }
}
