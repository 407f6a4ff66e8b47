//! Placeholder extraction, sampling and substitution.
//!
//! A binding is drawn once per synthesis attempt and applied to both sides of
//! a pair, so the correct and incorrect strings only differ by the injected
//! error.
use crate::catalog::{PatternEntry, VariableTable};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Placeholder name to sampled value.
pub type Binding = BTreeMap<String, String>;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("regex for placeholders"))
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute every bound placeholder in one pass; unbound ones stay verbatim.
pub fn expand(template: &str, binding: &Binding) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| match binding.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Candidate values per placeholder name.
#[derive(Debug, Clone, Copy)]
pub struct VariablePool<'a> {
    candidates: &'a VariableTable,
}

impl<'a> VariablePool<'a> {
    pub fn new(candidates: &'a VariableTable) -> Self {
        Self { candidates }
    }

    /// Draw one value for `name`. Unknown names degrade to the name itself.
    pub fn sample<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> String {
        self.candidates
            .get(name)
            .and_then(|values| values.choose(rng))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    pub fn resolve<R: Rng + ?Sized>(&self, template: &str, rng: &mut R) -> Binding {
        self.bind(std::iter::once(template), rng)
    }

    /// Bind every placeholder of the correct template, then any extra ones
    /// that only appear in the wrong templates.
    pub fn resolve_entry<R: Rng + ?Sized>(&self, entry: &PatternEntry, rng: &mut R) -> Binding {
        self.bind(entry.templates(), rng)
    }

    fn bind<'t, R: Rng + ?Sized>(
        &self,
        templates: impl Iterator<Item = &'t str>,
        rng: &mut R,
    ) -> Binding {
        let mut binding = Binding::new();
        for template in templates {
            for name in placeholders(template) {
                if !binding.contains_key(&name) {
                    let value = self.sample(&name, rng);
                    binding.insert(name, value);
                }
            }
        }
        binding
    }
}
