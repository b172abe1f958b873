//! Programming language normalisation.
//!
//! The store keeps whatever language string it is given. Callers pass user
//! input through a [`LanguageNormalizer`] first so that `golang`, `GO` and
//! `Go` all end up stored as `Go`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported language, or `Other` for anything unrecognised
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Bash,
    C,
    Cpp,
    CSharp,
    Css,
    Dockerfile,
    Go,
    Haskell,
    Html,
    Java,
    JavaScript,
    Json,
    Kotlin,
    Lua,
    Markdown,
    Php,
    PowerShell,
    Python,
    Ruby,
    Rust,
    Scala,
    Sql,
    Swift,
    Toml,
    TypeScript,
    Yaml,
    Other,
}

impl Language {
    /// Every language except `Other`, in display order
    pub const SUPPORTED: [Self; 26] = [
        Self::Bash,
        Self::C,
        Self::Cpp,
        Self::CSharp,
        Self::Css,
        Self::Dockerfile,
        Self::Go,
        Self::Haskell,
        Self::Html,
        Self::Java,
        Self::JavaScript,
        Self::Json,
        Self::Kotlin,
        Self::Lua,
        Self::Markdown,
        Self::Php,
        Self::PowerShell,
        Self::Python,
        Self::Ruby,
        Self::Rust,
        Self::Scala,
        Self::Sql,
        Self::Swift,
        Self::Toml,
        Self::TypeScript,
        Self::Yaml,
    ];

    /// Canonical name stored in the database
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "Bash",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::CSharp => "C#",
            Self::Css => "CSS",
            Self::Dockerfile => "Dockerfile",
            Self::Go => "Go",
            Self::Haskell => "Haskell",
            Self::Html => "HTML",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::Json => "JSON",
            Self::Kotlin => "Kotlin",
            Self::Lua => "Lua",
            Self::Markdown => "Markdown",
            Self::Php => "PHP",
            Self::PowerShell => "PowerShell",
            Self::Python => "Python",
            Self::Ruby => "Ruby",
            Self::Rust => "Rust",
            Self::Scala => "Scala",
            Self::Sql => "SQL",
            Self::Swift => "Swift",
            Self::Toml => "TOML",
            Self::TypeScript => "TypeScript",
            Self::Yaml => "YAML",
            Self::Other => "Other",
        }
    }

    /// Alternative spellings accepted on input, lowercase
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Bash => &["sh", "shell", "zsh"],
            Self::Cpp => &["cpp", "cxx", "cc", "c++"],
            Self::CSharp => &["csharp", "cs", "c#"],
            Self::Go => &["golang"],
            Self::Haskell => &["hs"],
            Self::JavaScript => &["js", "node", "nodejs"],
            Self::Kotlin => &["kt"],
            Self::Markdown => &["md"],
            Self::PowerShell => &["ps1", "pwsh"],
            Self::Python => &["py", "python3"],
            Self::Ruby => &["rb"],
            Self::Rust => &["rs"],
            Self::TypeScript => &["ts"],
            Self::Yaml => &["yml"],
            _ => &[],
        }
    }

    /// Typical file extension, used when opening an external editor
    pub fn extension(self) -> &'static str {
        match self {
            Self::Bash => "sh",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "cs",
            Self::Css => "css",
            Self::Dockerfile => "dockerfile",
            Self::Go => "go",
            Self::Haskell => "hs",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "js",
            Self::Json => "json",
            Self::Kotlin => "kt",
            Self::Lua => "lua",
            Self::Markdown => "md",
            Self::Php => "php",
            Self::PowerShell => "ps1",
            Self::Python => "py",
            Self::Ruby => "rb",
            Self::Rust => "rs",
            Self::Scala => "scala",
            Self::Sql => "sql",
            Self::Swift => "swift",
            Self::Toml => "toml",
            Self::TypeScript => "ts",
            Self::Yaml => "yaml",
            Self::Other => "txt",
        }
    }

    fn matches(self, lowered: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(lowered) || self.aliases().contains(&lowered)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    /// Never fails: unknown input becomes [`Language::Other`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Ok(Self::SUPPORTED
            .into_iter()
            .find(|lang| lang.matches(&lowered))
            .unwrap_or(Self::Other))
    }
}

/// Turns free-form language input into a canonical [`Language`].
///
/// Handed to the command layer explicitly; the store never consults it.
pub trait LanguageNormalizer: Send + Sync + fmt::Debug {
    /// Map raw input onto a language, `Other` when unrecognised
    fn normalize(&self, raw: &str) -> Language;

    /// Canonical names this normaliser recognises
    fn supported(&self) -> Vec<&'static str>;
}

/// Normaliser backed by the built-in [`Language`] table
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLanguages;

impl LanguageNormalizer for BuiltinLanguages {
    fn normalize(&self, raw: &str) -> Language {
        raw.parse().unwrap_or(Language::Other)
    }

    fn supported(&self) -> Vec<&'static str> {
        Language::SUPPORTED.iter().map(|l| l.as_str()).collect()
    }
}
