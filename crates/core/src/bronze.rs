//! Bronze validation: the structural and metadata gate run before scoring.
//!
//! [`BronzeValidator`] is the seam the certification pipeline consumes.
//! [`ManifestValidator`] is the built-in implementation: it requires a root
//! `SKILL.md` whose frontmatter declares at least `name` and `description`.
//!
//! # Rules
//!
//! | Rule | Strict | Lenient |
//! |------|--------|---------|
//! | archive readable and non-empty | error | error |
//! | `SKILL.md` at root, UTF-8, with `---` frontmatter | error | error |
//! | `name` and `description` present | error | error |
//! | `name` lowercase kebab-case, at most 64 chars | error | warning |
//! | `version` (when present) is semver | error | warning |
//! | `description` at most 1024 chars | error | warning |
//! | `description` at least 20 chars | warning | warning |
//! | `README.md` present | warning | warning |
//! | license file or `license` field present | warning | warning |
//!
//! The frontmatter parser is a small `key: value` subset; nested YAML is not
//! needed for the fields checked here.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::archive::SkillArchive;
use crate::certification::bronze_score;

const MAX_NAME_LENGTH: usize = 64;
const MAX_DESCRIPTION_LENGTH: usize = 1024;
const MIN_DESCRIPTION_LENGTH: usize = 20;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How strictly format rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Used by the automated pipeline: every format violation is an error.
    Strict,
    /// Interactive pre-checks: format violations are only warnings.
    Lenient,
}

/// One finding produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
}

impl ValidationIssue {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Metadata declared in the `SKILL.md` frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMetadata {
    pub name: String,
    pub version: Option<String>,
    pub description: String,
    pub license: Option<String>,
    pub homepage: Option<String>,
}

/// Outcome of Bronze validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BronzeReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub metadata: Option<SkillMetadata>,
}

impl BronzeReport {
    /// A failing report carrying a single error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![ValidationIssue::new(message)],
            warnings: Vec::new(),
            metadata: None,
        }
    }

    /// Numeric Bronze score derived from validity and warning count.
    pub fn score(&self) -> u32 {
        bronze_score(self.valid, self.warnings.len())
    }

    /// All error messages joined into one human-readable reason.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Structural and metadata gate that must pass before Silver scoring.
pub trait BronzeValidator: Send + Sync {
    /// Validate raw archive bytes. Never panics on malformed input.
    fn validate(&self, archive_bytes: &[u8], mode: ValidationMode) -> BronzeReport;
}

// ---------------------------------------------------------------------------
// ManifestValidator
// ---------------------------------------------------------------------------

/// Built-in validator checking the `SKILL.md` manifest and packaging basics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestValidator;

impl BronzeValidator for ManifestValidator {
    fn validate(&self, archive_bytes: &[u8], mode: ValidationMode) -> BronzeReport {
        let archive = match SkillArchive::from_bytes(archive_bytes) {
            Ok(archive) => archive,
            Err(e) => return BronzeReport::failed(e.to_string()),
        };
        validate_archive(&archive, mode)
    }
}

/// Validate an already-inspected archive.
pub fn validate_archive(archive: &SkillArchive, mode: ValidationMode) -> BronzeReport {
    if archive.is_empty() {
        return BronzeReport::failed("Archive is empty");
    }
    if !archive.has_file("SKILL.md") {
        return BronzeReport::failed("Missing SKILL.md manifest at archive root");
    }
    let Some(manifest) = archive.read_text("SKILL.md") else {
        return BronzeReport::failed("SKILL.md is not readable UTF-8 text");
    };
    let Some(fields) = parse_frontmatter(manifest) else {
        return BronzeReport::failed("SKILL.md must start with a '---' frontmatter block");
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut format_issue = |message: String| match mode {
        ValidationMode::Strict => errors.push(ValidationIssue::new(message)),
        ValidationMode::Lenient => warnings.push(ValidationIssue::new(message)),
    };

    let field = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    let name = field("name");
    let description = field("description");
    let version = field("version");
    let license = field("license");

    if let Some(name) = &name {
        if name.len() > MAX_NAME_LENGTH {
            format_issue(format!(
                "Skill name must be at most {MAX_NAME_LENGTH} characters"
            ));
        } else if !NAME_RE.is_match(name) {
            format_issue(format!("Skill name '{name}' must be lowercase kebab-case"));
        }
    }
    if let Some(version) = &version {
        if !SEMVER_RE.is_match(version) {
            format_issue(format!("Version '{version}' is not a semantic version"));
        }
    }
    if let Some(description) = &description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            format_issue(format!(
                "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            ));
        }
    }

    if name.is_none() {
        errors.push(ValidationIssue::new("SKILL.md frontmatter is missing 'name'"));
    }
    match &description {
        None => errors.push(ValidationIssue::new(
            "SKILL.md frontmatter is missing 'description'",
        )),
        Some(d) if d.chars().count() < MIN_DESCRIPTION_LENGTH => warnings.push(
            ValidationIssue::new(format!(
                "Description is shorter than {MIN_DESCRIPTION_LENGTH} characters"
            )),
        ),
        Some(_) => {}
    }
    if !archive.has_file("README.md") {
        warnings.push(ValidationIssue::new("No README.md at archive root"));
    }
    if license.is_none() && !archive.has_file("LICENSE") && !archive.has_file("LICENSE.md") {
        warnings.push(ValidationIssue::new(
            "No LICENSE file or 'license' field declared",
        ));
    }

    let metadata = name.map(|name| SkillMetadata {
        name,
        version,
        description: description.unwrap_or_default(),
        license,
        homepage: field("homepage"),
    });

    BronzeReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        metadata,
    }
}

/// Parse the leading `---` frontmatter block into `(key, value)` pairs.
///
/// Returns `None` when the document does not open with a closed block.
pub fn parse_frontmatter(document: &str) -> Option<Vec<(String, String)>> {
    let mut lines = document.trim_start_matches('\u{feff}').lines();
    if lines.next()?.trim() != "---" {
        return None;
    }

    let mut fields = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed == "---" {
            return Some(fields);
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || line.starts_with([' ', '\t']) {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            fields.push((key.trim().to_string(), value.to_string()));
        }
    }
    None
}
