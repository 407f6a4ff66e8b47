//! Pattern catalogs.
//!
//! Catalogs are plain data: per-shell tables of correct templates, each with
//! optional author-supplied wrong variants. The compiled-in copies live under
//! `catalogs/`; a directory of the same files can override any of them.
mod embedded;

use crate::shell::Shell;
use crate::types::ErrorType;
use crate::vars;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const SINGLE_COMMAND_FILE: &str = "single_command.json";
pub const CHAINED_FILE: &str = "chained.json";
pub const NATURAL_LANGUAGE_FILE: &str = "natural_language.json";
pub const TOOLS_FILE: &str = "tools.json";
pub const VARIABLES_FILE: &str = "variables.json";

const NATURAL_LANGUAGE_CATEGORY: &str = "natural_language";
const CHAINED_CATEGORY: &str = "chained";

/// One authored correction before variable expansion.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatternEntry {
    #[serde(rename = "correct")]
    pub correct_template: String,
    #[serde(rename = "errors", default, skip_serializing_if = "Vec::is_empty")]
    pub wrong_templates: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(rename = "error_type", default, skip_serializing_if = "Option::is_none")]
    pub error_type_hint: Option<String>,
    #[serde(skip)]
    pub tool: Option<String>,
}

impl PatternEntry {
    pub fn new(correct: &str, wrong: &[&str], category: &str) -> Self {
        Self {
            correct_template: correct.to_string(),
            wrong_templates: wrong.iter().map(|text| text.to_string()).collect(),
            category: category.to_string(),
            error_type_hint: None,
            tool: None,
        }
    }

    /// The correct template followed by every wrong template.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.correct_template.as_str())
            .chain(self.wrong_templates.iter().map(String::as_str))
    }
}

/// Surface wrapper applied to a natural-language phrase.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Variation {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl Variation {
    pub fn apply(&self, text: &str) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }

    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhrasePair {
    text: String,
    command: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NaturalFile {
    patterns: BTreeMap<String, BTreeMap<String, Vec<PhrasePair>>>,
    #[serde(default)]
    extra_pools: BTreeMap<String, Vec<PhrasePair>>,
    #[serde(default)]
    variations: BTreeMap<String, Vec<Variation>>,
}

/// Shared shape of the single-command (shell/category), chained (pool/shell)
/// and tools (category/tool) files.
type NestedFile = BTreeMap<String, BTreeMap<String, Vec<PatternEntry>>>;

pub type VariableTable = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct NaturalCatalog {
    pub patterns: BTreeMap<Shell, BTreeMap<ErrorType, Vec<PatternEntry>>>,
    pub extra_pools: BTreeMap<String, Vec<PatternEntry>>,
    pub variations: BTreeMap<ErrorType, Vec<Variation>>,
}

/// Every table the synthesizers read.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub single: BTreeMap<Shell, BTreeMap<String, Vec<PatternEntry>>>,
    pub chained: BTreeMap<String, BTreeMap<Shell, Vec<PatternEntry>>>,
    pub natural: NaturalCatalog,
    pub tools: Vec<PatternEntry>,
    pub variables: VariableTable,
}

impl Catalogs {
    /// Parse the compiled-in catalogs.
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            single: parse_single(embedded::SINGLE_COMMAND_JSON, "embedded single_command.json")?,
            chained: parse_chained(embedded::CHAINED_JSON, "embedded chained.json")?,
            natural: parse_natural(
                embedded::NATURAL_LANGUAGE_JSON,
                "embedded natural_language.json",
            )?,
            tools: parse_tools(embedded::TOOLS_JSON, "embedded tools.json")?,
            variables: parse_variables(embedded::VARIABLES_JSON, "embedded variables.json")?,
        })
    }

    /// Load catalogs from `dir`; files missing from the directory fall back to
    /// the embedded copy.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(anyhow!("catalog dir {} does not exist", dir.display()));
        }
        let read = |name: &str, fallback: &str| -> Result<(String, String)> {
            let path = dir.join(name);
            if path.is_file() {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("read catalog {}", path.display()))?;
                return Ok((text, path.display().to_string()));
            }
            debug!(file = name, dir = %dir.display(), "catalog file absent, using embedded copy");
            Ok((fallback.to_string(), format!("embedded {name}")))
        };

        let (text, origin) = read(SINGLE_COMMAND_FILE, embedded::SINGLE_COMMAND_JSON)?;
        let single = parse_single(&text, &origin)?;
        let (text, origin) = read(CHAINED_FILE, embedded::CHAINED_JSON)?;
        let chained = parse_chained(&text, &origin)?;
        let (text, origin) = read(NATURAL_LANGUAGE_FILE, embedded::NATURAL_LANGUAGE_JSON)?;
        let natural = parse_natural(&text, &origin)?;
        let (text, origin) = read(TOOLS_FILE, embedded::TOOLS_JSON)?;
        let tools = parse_tools(&text, &origin)?;
        let (text, origin) = read(VARIABLES_FILE, embedded::VARIABLES_JSON)?;
        let variables = parse_variables(&text, &origin)?;

        Ok(Self {
            single,
            chained,
            natural,
            tools,
            variables,
        })
    }

    /// Single-command entries for `shell` across `categories` (all categories
    /// when empty), degrading to `fallback`'s table when the shell has none.
    pub fn single_entries(
        &self,
        shell: Shell,
        categories: &[String],
        fallback: Shell,
    ) -> Vec<&PatternEntry> {
        let collect = |shell: Shell| -> Vec<&PatternEntry> {
            let Some(table) = self.single.get(&shell) else {
                return Vec::new();
            };
            if categories.is_empty() {
                return table.values().flatten().collect();
            }
            categories
                .iter()
                .filter_map(|category| table.get(category))
                .flatten()
                .collect()
        };
        let entries = collect(shell);
        if entries.is_empty() && shell != fallback {
            return collect(fallback);
        }
        entries
    }

    /// Chained entries from `pool` for `shell`, degrading to `fallback`.
    pub fn chained_entries(&self, pool: &str, shell: Shell, fallback: Shell) -> &[PatternEntry] {
        let Some(table) = self.chained.get(pool) else {
            return &[];
        };
        non_empty(table.get(&shell))
            .or_else(|| non_empty(table.get(&fallback)))
            .unwrap_or(&[])
    }

    /// Natural-language entries for `shell` and `style`. An empty style list
    /// falls back to the shell's imperative list, then to `fallback`'s data.
    pub fn natural_entries(&self, shell: Shell, style: ErrorType, fallback: Shell) -> &[PatternEntry] {
        let lookup = |shell: Shell| -> Option<&[PatternEntry]> {
            let styles = self.natural.patterns.get(&shell)?;
            non_empty(styles.get(&style)).or_else(|| non_empty(styles.get(&ErrorType::Imperative)))
        };
        lookup(shell).or_else(|| lookup(fallback)).unwrap_or(&[])
    }

    pub fn extra_pool(&self, name: &str) -> &[PatternEntry] {
        self.natural
            .extra_pools
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn variations(&self, style: ErrorType) -> &[Variation] {
        self.natural
            .variations
            .get(&style)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tools(&self) -> &[PatternEntry] {
        &self.tools
    }

    /// Reject entries whose correct template is empty.
    pub fn validate(&self) -> Result<()> {
        let offenders: Vec<String> = self
            .labelled_entries()
            .into_iter()
            .filter(|labelled| labelled.entry.correct_template.trim().is_empty())
            .map(|labelled| labelled.label)
            .collect();
        if offenders.is_empty() {
            return Ok(());
        }
        Err(anyhow!(
            "catalog entries with an empty correct template: {}",
            offenders.join(", ")
        ))
    }

    /// Report suspicious but usable data: POSIX-family templates that do not
    /// split as shell words, and placeholders with no candidate table.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for labelled in self.labelled_entries() {
            let posix = match labelled.shell {
                Some(shell) => shell.is_posix_like(),
                None => true,
            };
            if posix && shell_words::split(&labelled.entry.correct_template).is_err() {
                warnings.push(format!(
                    "{}: correct template does not split as shell words",
                    labelled.label
                ));
            }
            let names: BTreeSet<String> = labelled
                .entry
                .templates()
                .flat_map(vars::placeholders)
                .collect();
            for name in names {
                if !self.variables.contains_key(&name) {
                    warnings.push(format!(
                        "{}: placeholder {{{name}}} has no candidate values",
                        labelled.label
                    ));
                }
            }
        }
        for message in &warnings {
            warn!(message = %message, "catalog lint");
        }
        warnings
    }

    fn labelled_entries(&self) -> Vec<LabelledEntry<'_>> {
        let mut out = Vec::new();
        for (shell, table) in &self.single {
            for (category, entries) in table {
                push_labelled(&mut out, &format!("single_command/{shell}/{category}"), Some(*shell), entries);
            }
        }
        for (pool, table) in &self.chained {
            for (shell, entries) in table {
                push_labelled(&mut out, &format!("chained/{pool}/{shell}"), Some(*shell), entries);
            }
        }
        for (shell, styles) in &self.natural.patterns {
            for (style, entries) in styles {
                push_labelled(
                    &mut out,
                    &format!("natural_language/{shell}/{style}"),
                    Some(*shell),
                    entries,
                );
            }
        }
        for (pool, entries) in &self.natural.extra_pools {
            push_labelled(&mut out, &format!("natural_language/extra/{pool}"), None, entries);
        }
        push_labelled(&mut out, "tools", None, &self.tools);
        out
    }
}

struct LabelledEntry<'a> {
    label: String,
    shell: Option<Shell>,
    entry: &'a PatternEntry,
}

fn push_labelled<'a>(
    out: &mut Vec<LabelledEntry<'a>>,
    prefix: &str,
    shell: Option<Shell>,
    entries: &'a [PatternEntry],
) {
    for (idx, entry) in entries.iter().enumerate() {
        out.push(LabelledEntry {
            label: format!("{prefix}[{idx}]"),
            shell,
            entry,
        });
    }
}

fn non_empty(entries: Option<&Vec<PatternEntry>>) -> Option<&[PatternEntry]> {
    entries.filter(|list| !list.is_empty()).map(Vec::as_slice)
}

fn parse_shell(value: &str, origin: &str) -> Result<Shell> {
    value
        .parse()
        .with_context(|| format!("unknown shell key in {origin}"))
}

fn parse_style(value: &str, origin: &str) -> Result<ErrorType> {
    value
        .parse()
        .with_context(|| format!("unknown style key in {origin}"))
}

fn parse_single(
    text: &str,
    origin: &str,
) -> Result<BTreeMap<Shell, BTreeMap<String, Vec<PatternEntry>>>> {
    let raw: NestedFile =
        serde_json::from_str(text).with_context(|| format!("parse {origin}"))?;
    let mut out = BTreeMap::new();
    for (shell, categories) in raw {
        let shell = parse_shell(&shell, origin)?;
        let categories = categories
            .into_iter()
            .map(|(category, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|mut entry| {
                        entry.category = category.clone();
                        entry
                    })
                    .collect();
                (category, entries)
            })
            .collect();
        out.insert(shell, categories);
    }
    Ok(out)
}

fn parse_chained(
    text: &str,
    origin: &str,
) -> Result<BTreeMap<String, BTreeMap<Shell, Vec<PatternEntry>>>> {
    let raw: NestedFile =
        serde_json::from_str(text).with_context(|| format!("parse {origin}"))?;
    let mut out = BTreeMap::new();
    for (pool, shells) in raw {
        let mut table = BTreeMap::new();
        for (shell, entries) in shells {
            let shell = parse_shell(&shell, origin)?;
            let entries = entries
                .into_iter()
                .map(|mut entry| {
                    if entry.category.is_empty() {
                        entry.category = CHAINED_CATEGORY.to_string();
                    }
                    if entry.error_type_hint.is_none() {
                        entry.error_type_hint = Some(pool.clone());
                    }
                    entry
                })
                .collect();
            table.insert(shell, entries);
        }
        out.insert(pool, table);
    }
    Ok(out)
}

fn phrase_entry(pair: PhrasePair, style: Option<ErrorType>) -> PatternEntry {
    PatternEntry {
        correct_template: pair.command,
        wrong_templates: vec![pair.text],
        category: NATURAL_LANGUAGE_CATEGORY.to_string(),
        error_type_hint: style.map(|style| style.as_str().to_string()),
        tool: None,
    }
}

fn parse_natural(text: &str, origin: &str) -> Result<NaturalCatalog> {
    let raw: NaturalFile =
        serde_json::from_str(text).with_context(|| format!("parse {origin}"))?;
    let mut patterns = BTreeMap::new();
    for (shell, styles) in raw.patterns {
        let shell = parse_shell(&shell, origin)?;
        let mut table = BTreeMap::new();
        for (style, pairs) in styles {
            let style = parse_style(&style, origin)?;
            let entries = pairs
                .into_iter()
                .map(|pair| phrase_entry(pair, Some(style)))
                .collect();
            table.insert(style, entries);
        }
        patterns.insert(shell, table);
    }
    let extra_pools = raw
        .extra_pools
        .into_iter()
        .map(|(pool, pairs)| {
            let entries = pairs.into_iter().map(|pair| phrase_entry(pair, None)).collect();
            (pool, entries)
        })
        .collect();
    let mut variations = BTreeMap::new();
    for (style, list) in raw.variations {
        variations.insert(parse_style(&style, origin)?, list);
    }
    Ok(NaturalCatalog {
        patterns,
        extra_pools,
        variations,
    })
}

fn parse_tools(text: &str, origin: &str) -> Result<Vec<PatternEntry>> {
    let raw: NestedFile =
        serde_json::from_str(text).with_context(|| format!("parse {origin}"))?;
    let mut out = Vec::new();
    for (category, tools) in raw {
        for (tool, entries) in tools {
            out.extend(entries.into_iter().map(|mut entry| {
                entry.category = format!("tools_{category}");
                entry.tool = Some(tool.clone());
                entry
            }));
        }
    }
    Ok(out)
}

fn parse_variables(text: &str, origin: &str) -> Result<VariableTable> {
    let table: VariableTable =
        serde_json::from_str(text).with_context(|| format!("parse {origin}"))?;
    if let Some((name, _)) = table.iter().find(|(_, values)| values.is_empty()) {
        return Err(anyhow!("variable {name} in {origin} has no candidate values"));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogs_parse_and_validate() {
        let catalogs = Catalogs::embedded().expect("embedded catalogs");
        catalogs.validate().expect("embedded catalogs validate");
        assert_eq!(catalogs.single.len(), Shell::ALL.len());
        assert!(!catalogs.tools().is_empty());
        assert!(catalogs.variables.contains_key("path"));
    }

    #[test]
    fn embedded_catalogs_lint_clean() {
        let catalogs = Catalogs::embedded().expect("embedded catalogs");
        let warnings = catalogs.lint();
        assert!(warnings.is_empty(), "unexpected lint: {warnings:?}");
    }

    #[test]
    fn tools_are_flattened_with_category_and_tool() {
        let catalogs = Catalogs::embedded().expect("embedded catalogs");
        let git = catalogs
            .tools()
            .iter()
            .find(|entry| entry.tool.as_deref() == Some("git"))
            .expect("git tool entry");
        assert_eq!(git.category, "tools_version_control");
    }

    #[test]
    fn single_entries_carry_their_category() {
        let catalogs = Catalogs::embedded().expect("embedded catalogs");
        let categories = vec!["git".to_string()];
        let entries = catalogs.single_entries(Shell::Bash, &categories, Shell::Bash);
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|entry| entry.category == "git"));
    }

    #[test]
    fn missing_shell_degrades_to_fallback() {
        let mut catalogs = Catalogs::embedded().expect("embedded catalogs");
        catalogs.single.remove(&Shell::Tcsh);
        let entries = catalogs.single_entries(Shell::Tcsh, &[], Shell::Bash);
        assert_eq!(entries.len(), catalogs.single_entries(Shell::Bash, &[], Shell::Bash).len());

        for table in catalogs.chained.values_mut() {
            table.remove(&Shell::Fish);
        }
        assert!(!catalogs.chained_entries("pipe", Shell::Fish, Shell::Bash).is_empty());
        assert!(catalogs.chained_entries("subshell", Shell::Bash, Shell::Bash).is_empty());
    }

    #[test]
    fn empty_natural_style_uses_imperative() {
        let catalogs = Catalogs::embedded().expect("embedded catalogs");
        let mixed = catalogs.natural_entries(Shell::Tcsh, ErrorType::Mixed, Shell::Bash);
        let imperative = catalogs.natural_entries(Shell::Tcsh, ErrorType::Imperative, Shell::Bash);
        assert_eq!(mixed, imperative);
        assert_eq!(mixed[0].wrong_templates.len(), 1);
    }

    #[test]
    fn validate_lists_empty_correct_templates() {
        let mut catalogs = Catalogs::default();
        catalogs.tools.push(PatternEntry::new("  ", &["git"], "tools_vcs"));
        let err = catalogs.validate().expect_err("empty template rejected");
        assert!(err.to_string().contains("tools[0]"));
    }

    #[test]
    fn lint_flags_unbalanced_quotes_and_unknown_placeholders() {
        let mut catalogs = Catalogs::default();
        catalogs.tools.push(PatternEntry::new("grep '{needle} {file}", &[], "tools_text"));
        let warnings = catalogs.lint();
        assert_eq!(warnings.len(), 3, "{warnings:?}");
    }

    #[test]
    fn load_dir_overrides_only_present_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(TOOLS_FILE),
            r#"{"vcs": {"hg": [{"correct": "hg status", "errors": ["hg stauts"]}]}}"#,
        )
        .expect("write tools");
        let catalogs = Catalogs::load_dir(dir.path()).expect("load dir");
        assert_eq!(catalogs.tools().len(), 1);
        assert_eq!(catalogs.tools()[0].tool.as_deref(), Some("hg"));
        assert!(!catalogs.single.is_empty());
    }

    #[test]
    fn load_dir_reports_bad_json_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(VARIABLES_FILE), "{not json").expect("write");
        let err = Catalogs::load_dir(dir.path()).expect_err("bad json");
        assert!(format!("{err:#}").contains(VARIABLES_FILE));
    }
}
