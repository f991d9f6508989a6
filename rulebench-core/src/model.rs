//! Benchmark Data Model
//!
//! Inputs arrive already validated from the configuration source. A `TestCase`
//! binds one rule to its corpus of code samples and is the unit of isolation:
//! it gets its own evaluator and its failures never leak into other cases.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source language of a code sample
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Plain JavaScript (`.js`, `.mjs`, `.cjs`)
    JavaScript,
    /// JavaScript with JSX (`.jsx`)
    Jsx,
    /// TypeScript (`.ts`, `.mts`, `.cts`)
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
    /// Vue single-file component (`.vue`)
    Vue,
    /// Anything else; carries the raw extension
    Other(String),
}

impl Language {
    /// Infer the language from a file name's extension
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "ts" | "mts" | "cts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "vue" => Language::Vue,
            _ => Language::Other(ext),
        }
    }

    /// Whether samples in this language can be evaluated
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Language::Other(_))
    }

    /// Whether this language needs a TypeScript-aware parser
    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Jsx => write!(f, "jsx"),
            Language::TypeScript => write!(f, "typescript"),
            Language::Tsx => write!(f, "tsx"),
            Language::Vue => write!(f, "vue"),
            Language::Other(ext) if ext.is_empty() => write!(f, "unknown"),
            Language::Other(ext) => write!(f, "unknown (.{ext})"),
        }
    }
}

/// One unit of source text to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSample {
    /// File name reported to the rule (also drives language detection)
    pub filename: String,
    /// Source text
    pub code: String,
    /// Source language
    pub language: Language,
}

impl CodeSample {
    /// Create a sample, inferring the language from `filename`
    pub fn new(filename: impl Into<String>, code: impl Into<String>) -> Self {
        let filename = filename.into();
        let language = Language::from_filename(&filename);
        Self {
            filename,
            code: code.into(),
            language,
        }
    }

    /// Override the inferred language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Rule severity as configured for the evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule disabled
    Off,
    /// Findings reported as warnings
    Warn,
    /// Findings reported as errors
    #[default]
    Error,
}

/// Identifies and parametrizes the rule under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule identifier, optionally plugin-qualified (`plugin/rule-name`)
    pub rule_id: String,
    /// Module providing the rule; `None` means the built-in rule set
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Severity the rule runs at
    #[serde(default)]
    pub severity: Severity,
    /// Rule options passed through untouched
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

impl RuleConfig {
    /// Built-in rule at error severity with no options
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            path: None,
            severity: Severity::default(),
            options: None,
        }
    }

    /// Load the rule from a module path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set rule options
    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// One rule bound to its corpus of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Identifier, unique within a run
    pub id: String,
    /// Display name
    pub name: String,
    /// Rule under test
    pub rule: RuleConfig,
    /// Samples in declaration order
    pub samples: Vec<CodeSample>,
}

impl TestCase {
    /// Create a test case
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rule: RuleConfig,
        samples: Vec<CodeSample>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rule,
            samples,
        }
    }

    /// Samples whose language is recognized, with their declaration index
    pub fn runnable_samples(&self) -> impl Iterator<Item = (usize, &CodeSample)> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.language.is_recognized())
    }

    /// Distinct recognized languages, in first-seen order
    pub fn languages(&self) -> Vec<Language> {
        let mut langs: Vec<Language> = Vec::new();
        for (_, sample) in self.runnable_samples() {
            if !langs.contains(&sample.language) {
                langs.push(sample.language.clone());
            }
        }
        langs
    }
}

/// Warmup policy for the sample executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupConfig {
    /// Run discarded calls before measuring
    pub enabled: bool,
    /// Number of discarded calls
    pub iterations: u64,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            iterations: 5,
        }
    }
}

/// Global policy for the sample executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Run name
    pub name: String,
    /// Measured calls per sample (upper bound)
    pub iterations: u64,
    /// Time budget for the measured calls of one sample
    pub timeout: Duration,
    /// Warmup policy
    pub warmup: WarmupConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: "rulebench".to_string(),
            iterations: 50,
            timeout: Duration::from_secs(5),
            warmup: WarmupConfig::default(),
        }
    }
}
