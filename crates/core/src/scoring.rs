//! Static Silver quality score (0-100) for skill archives.
//!
//! Five independent criteria, each capped to `[0, 20]`, summed unweighted:
//!
//! | Criterion      | Style       | Signals |
//! |----------------|-------------|---------|
//! | structure      | additive    | `SKILL.md`, `README.md`, `scripts/`, `config/`, `LICENSE` |
//! | documentation  | additive    | README length tiers, top heading, standard sections |
//! | tests          | additive    | files following common test naming conventions |
//! | code_quality   | subtractive | debug statements / work markers, very large submissions |
//! | security       | subtractive | denylisted npm / PyPI dependencies |
//!
//! Scoring is a pure function of the archive contents: no clock, no I/O, and
//! identical bytes always produce an identical [`SilverScore`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::archive::{ArchiveError, SkillArchive};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound of every criterion.
pub const MAX_CRITERION_SCORE: u32 = 20;

/// Only the first N code files are scanned for quality markers.
pub const MAX_SCANNED_CODE_FILES: usize = 20;

/// Submissions with more code files than this lose points for sprawl.
pub const LARGE_SUBMISSION_CODE_FILES: usize = 50;

/// File extensions treated as code by the quality scan.
pub const CODE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".sh"];

/// Package names with a history of sabotage, typosquatting or compromise.
pub const RISKY_PACKAGES: &[&str] = &[
    // npm
    "event-stream",
    "flatmap-stream",
    "colors",
    "faker",
    "node-ipc",
    "ua-parser-js",
    "coa",
    "rc",
    "crossenv",
    "peacenotwar",
    // PyPI
    "jeilyfish",
    "python3-dateutil",
    "colourama",
    "ctx",
    "urlib3",
    "setup-tools",
];

const RISKY_PACKAGE_PENALTY: u32 = 5;
const MARKER_PENALTY_EACH: u32 = 2;
const MARKER_PENALTY_CAP: u32 = 10;
const LARGE_SUBMISSION_PENALTY: u32 = 3;

static TOP_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# ").expect("valid regex"));

/// `(pattern, points, label)` for README section headers.
static SECTION_RULES: LazyLock<Vec<(Regex, u32, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?mi)^#+\s*installation", 3, "Installation"),
        (r"(?mi)^#+\s*usage", 3, "Usage"),
        (r"(?mi)^#+\s*examples?", 2, "Examples"),
        (r"(?mi)^#+\s*config(uration)?", 2, "Configuration"),
    ]
    .into_iter()
    .map(|(pattern, points, label)| (Regex::new(pattern).expect("valid regex"), points, label))
    .collect()
});

static TEST_FILE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\.(test|spec)\.(js|ts|py)$",
        r"_test\.(py|go)$",
        r"(^|/)test_[^/]*\.py$",
        r"^tests?/",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static WORK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(TODO|FIXME|HACK|XXX)\b").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-criterion points, each in `[0, 20]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaScores {
    pub structure: u32,
    pub documentation: u32,
    pub tests: u32,
    pub code_quality: u32,
    pub security: u32,
}

impl CriteriaScores {
    /// Unweighted sum of the five criteria.
    pub fn total(&self) -> u32 {
        self.structure + self.documentation + self.tests + self.code_quality + self.security
    }
}

/// Human-readable findings explaining each criterion's points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaDetails {
    pub structure: Vec<String>,
    pub documentation: Vec<String>,
    pub tests: Vec<String>,
    pub code_quality: Vec<String>,
    pub security: Vec<String>,
}

/// Result of scoring one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilverScore {
    /// Total in `[0, 100]`, always `criteria.total()`.
    pub score: u32,
    pub criteria: CriteriaScores,
    pub details: CriteriaDetails,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse and score raw archive bytes.
pub fn score_bytes(bytes: &[u8]) -> Result<SilverScore, ArchiveError> {
    let archive = SkillArchive::from_bytes(bytes)?;
    Ok(score_archive(&archive))
}

/// Score an already-inspected archive.
pub fn score_archive(archive: &SkillArchive) -> SilverScore {
    let (structure, structure_details) = score_structure(archive);
    let (documentation, documentation_details) = score_documentation(archive);
    let (tests, tests_details) = score_tests(archive);
    let (code_quality, code_quality_details) = score_code_quality(archive);
    let (security, security_details) = score_security(archive);

    let criteria = CriteriaScores {
        structure,
        documentation,
        tests,
        code_quality,
        security,
    };

    SilverScore {
        score: criteria.total(),
        criteria,
        details: CriteriaDetails {
            structure: structure_details,
            documentation: documentation_details,
            tests: tests_details,
            code_quality: code_quality_details,
            security: security_details,
        },
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

fn score_structure(archive: &SkillArchive) -> (u32, Vec<String>) {
    let mut points: u32 = 0;
    let mut details = Vec::new();

    let checks: [(bool, u32, &str); 5] = [
        (archive.has_file("SKILL.md"), 5, "SKILL.md manifest"),
        (archive.has_file("README.md"), 5, "README.md"),
        (archive.has_dir("scripts"), 4, "scripts/ directory"),
        (archive.has_dir("config"), 3, "config/ directory"),
        (
            archive.has_file("LICENSE") || archive.has_file("LICENSE.md"),
            3,
            "LICENSE file",
        ),
    ];

    for (present, award, label) in checks {
        if present {
            points += award;
            details.push(format!("{label} present (+{award})"));
        } else {
            details.push(format!("{label} missing"));
        }
    }

    (points.min(MAX_CRITERION_SCORE), details)
}

fn score_documentation(archive: &SkillArchive) -> (u32, Vec<String>) {
    let Some(readme) = archive.read_text("README.md") else {
        return (0, vec!["No readable README.md".to_string()]);
    };

    let mut points: u32 = 0;
    let mut details = Vec::new();

    let words = readme.split_whitespace().count();
    details.push(format!("README has {words} words"));
    for (min_words, award) in [(100, 3), (200, 3), (500, 2)] {
        if words > min_words {
            points += award;
            details.push(format!("More than {min_words} words (+{award})"));
        }
    }

    if TOP_HEADING_RE.is_match(readme) {
        points += 2;
        details.push("Top-level heading (+2)".to_string());
    }

    for (re, award, label) in SECTION_RULES.iter() {
        if re.is_match(readme) {
            points += award;
            details.push(format!("{label} section (+{award})"));
        } else {
            details.push(format!("No {label} section"));
        }
    }

    (points.min(MAX_CRITERION_SCORE), details)
}

/// Whether a root-relative path follows a recognised test naming convention.
pub fn is_test_file(relative_path: &str) -> bool {
    TEST_FILE_PATTERNS.iter().any(|re| re.is_match(relative_path))
}

fn score_tests(archive: &SkillArchive) -> (u32, Vec<String>) {
    let count = archive.relative_paths().filter(|p| is_test_file(p)).count();

    let mut points: u32 = 0;
    let mut details = vec![format!("Found {count} test file(s)")];
    for (min_files, award) in [(1, 10), (3, 5), (5, 5)] {
        if count >= min_files {
            points += award;
            details.push(format!("At least {min_files} test file(s) (+{award})"));
        }
    }

    (points.min(MAX_CRITERION_SCORE), details)
}

fn is_code_file(path: &str) -> bool {
    CODE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Count debug statements and work markers in one source file.
pub fn count_quality_markers(source: &str) -> usize {
    source.matches("console.log(").count()
        + WORK_MARKER_RE.find_iter(source).count()
        + source.matches("debugger;").count()
}

fn score_code_quality(archive: &SkillArchive) -> (u32, Vec<String>) {
    let code_files: Vec<&str> = archive.relative_paths().filter(|p| is_code_file(p)).collect();

    let mut markers = 0usize;
    for path in code_files.iter().take(MAX_SCANNED_CODE_FILES) {
        if let Some(source) = archive.read_text(path) {
            markers += count_quality_markers(source);
        }
    }

    let mut points = MAX_CRITERION_SCORE;
    let mut details = vec![format!(
        "Scanned {} of {} code file(s)",
        code_files.len().min(MAX_SCANNED_CODE_FILES),
        code_files.len()
    )];

    if markers > 0 {
        let penalty = (markers as u32)
            .saturating_mul(MARKER_PENALTY_EACH)
            .min(MARKER_PENALTY_CAP);
        points = points.saturating_sub(penalty);
        details.push(format!(
            "{markers} debug statement(s) or work marker(s) (-{penalty})"
        ));
    }

    if code_files.len() > LARGE_SUBMISSION_CODE_FILES {
        points = points.saturating_sub(LARGE_SUBMISSION_PENALTY);
        details.push(format!(
            "More than {LARGE_SUBMISSION_CODE_FILES} code files (-{LARGE_SUBMISSION_PENALTY})"
        ));
    }

    (points, details)
}

fn is_risky_package(name: &str) -> bool {
    let lowered = name.trim().to_ascii_lowercase();
    RISKY_PACKAGES.contains(&lowered.as_str())
}

/// Dependency names declared in a `package.json` (runtime and dev).
pub fn npm_dependencies(package_json: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(package_json) else {
        return Vec::new();
    };
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|deps| deps.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Package names from a `requirements.txt`: the first token before `==`/`>=`.
pub fn python_requirements(requirements: &str) -> Vec<String> {
    requirements
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let token = line.split(|c: char| c.is_whitespace() || c == ';').next()?;
            let name = token.split("==").next()?.split(">=").next()?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn score_security(archive: &SkillArchive) -> (u32, Vec<String>) {
    let mut points = MAX_CRITERION_SCORE;
    let mut details = Vec::new();

    let sources: [(&str, fn(&str) -> Vec<String>); 2] = [
        ("package.json", npm_dependencies),
        ("requirements.txt", python_requirements),
    ];

    for (file, parse) in sources {
        let Some(contents) = archive.read_text(file) else {
            continue;
        };
        for name in parse(contents).into_iter().filter(|n| is_risky_package(n)) {
            points = points.saturating_sub(RISKY_PACKAGE_PENALTY);
            details.push(format!(
                "Risky dependency '{name}' in {file} (-{RISKY_PACKAGE_PENALTY})"
            ));
        }
    }

    if details.is_empty() {
        details.push("No known risky dependencies".to_string());
    }

    (points, details)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
