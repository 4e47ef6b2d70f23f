//! Template file identities

use serde::{Deserialize, Serialize};

/// The template files bundled with kickstart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// `.editorconfig`
    EditorConfig,
    /// `.gitignore`
    GitIgnore,
    /// `.travis.yml`
    Travis,
}

/// Source identifier and destination name of a bundled template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateFile {
    /// Which template this is
    pub kind: TemplateKind,
    /// Name of the bundled asset
    pub source: &'static str,
    /// File name written into the target directory
    pub destination: &'static str,
}

impl TemplateKind {
    /// Every bundled template, in deployment order
    pub const ALL: [TemplateKind; 3] = [Self::EditorConfig, Self::GitIgnore, Self::Travis];

    /// The template's file mapping
    pub fn file(&self) -> TemplateFile {
        let (source, destination) = match self {
            Self::EditorConfig => ("editorconfig", ".editorconfig"),
            Self::GitIgnore => ("gitignore", ".gitignore"),
            Self::Travis => ("travis.yml", ".travis.yml"),
        };
        TemplateFile {
            kind: *self,
            source,
            destination,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file().destination)
    }
}
