//! Named color palettes and the script text that installs them.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Lookup from palette name to the commands that define it.
pub trait PaletteCatalog: Send + Sync {
    /// Script text for `name`, failing for names the catalog does not know.
    fn lookup(&self, name: &str) -> Result<&str>;

    fn names(&self) -> Vec<String>;
}

/// Line styles 1..=N plus a continuous palette built from the same colors.
pub fn palette_commands(colors: &[&str]) -> String {
    let mut out = String::new();
    for (i, color) in colors.iter().enumerate() {
        out.push_str(&format!("set style line {} lt 1 lc rgb '{}'\n", i + 1, color));
    }
    out.push_str(&format!("set palette maxcolors {}\n", colors.len()));
    let stops: Vec<String> = colors
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} '{}'", i, c))
        .collect();
    out.push_str(&format!("set palette defined ({})\n", stops.join(", ")));
    out
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "dark2",
        &["#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E", "#E6AB02", "#A6761D", "#666666"],
    ),
    (
        "set1",
        &["#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF"],
    ),
    (
        "set2",
        &["#66C2A5", "#FC8D62", "#8DA0CB", "#E78AC3", "#A6D854", "#FFD92F", "#E5C494", "#B3B3B3"],
    ),
    (
        "paired",
        &["#A6CEE3", "#1F78B4", "#B2DF8A", "#33A02C", "#FB9A99", "#E31A1C", "#FDBF6F", "#FF7F00"],
    ),
    (
        "viridis",
        &["#440154", "#472C7A", "#3B518B", "#2C718E", "#21908D", "#27AD81", "#5CC863", "#AADC32"],
    ),
    (
        "jet",
        &["#000080", "#0000FF", "#0080FF", "#00FFFF", "#80FF80", "#FFFF00", "#FF8000", "#FF0000"],
    ),
    (
        "parula",
        &["#352A87", "#0363E1", "#1485D4", "#06A7C6", "#38B99E", "#92BF73", "#D9BA56", "#FCCE2E"],
    ),
    (
        "gray",
        &["#000000", "#252525", "#525252", "#737373", "#969696", "#BDBDBD", "#D9D9D9", "#F0F0F0"],
    ),
];

/// The palettes shipped with the crate.
#[derive(Debug, Clone)]
pub struct BuiltinPalettes {
    entries: HashMap<String, String>,
}

impl BuiltinPalettes {
    pub fn new() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, colors)| (name.to_string(), palette_commands(colors)))
            .collect();
        Self { entries }
    }
}

impl Default for BuiltinPalettes {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup_in<'a>(entries: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    entries
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Unknown palette '{}'", name))
}

fn sorted_names(entries: &HashMap<String, String>) -> Vec<String> {
    let mut names: Vec<String> = entries.keys().cloned().collect();
    names.sort();
    names
}

impl PaletteCatalog for BuiltinPalettes {
    fn lookup(&self, name: &str) -> Result<&str> {
        lookup_in(&self.entries, name)
    }

    fn names(&self) -> Vec<String> {
        sorted_names(&self.entries)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaletteEntry {
    Colors(Vec<String>),
    Script(String),
}

/// Palettes loaded from a JSON object mapping names to either a list of
/// colors or ready-made script text.
///
/// ```json
/// { "ocean": ["#003f5c", "#2f4b7c", "#665191"], "custom": "set palette gray\n" }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonPalettes {
    entries: HashMap<String, String>,
}

impl JsonPalettes {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, PaletteEntry> =
            serde_json::from_str(json).context("Failed to parse palette catalog JSON")?;
        let entries = raw
            .into_iter()
            .map(|(name, entry)| {
                let text = match entry {
                    PaletteEntry::Colors(colors) => {
                        let colors: Vec<&str> = colors.iter().map(String::as_str).collect();
                        palette_commands(&colors)
                    }
                    PaletteEntry::Script(text) => text,
                };
                (name, text)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read palette catalog '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

impl PaletteCatalog for JsonPalettes {
    fn lookup(&self, name: &str) -> Result<&str> {
        lookup_in(&self.entries, name)
    }

    fn names(&self) -> Vec<String> {
        sorted_names(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dark2() {
        let catalog = BuiltinPalettes::new();
        let text = catalog.lookup("dark2").unwrap();
        assert!(text.starts_with("set style line 1 lt 1 lc rgb '#1B9E77'\n"));
        assert!(text.contains("set palette maxcolors 8\n"));
        assert!(text.contains("7 '#666666')"));
    }

    #[test]
    fn test_unknown_palette_fails() {
        let catalog = BuiltinPalettes::new();
        let err = catalog.lookup("no-such-palette").unwrap_err();
        assert_eq!(err.to_string(), "Unknown palette 'no-such-palette'");
    }

    #[test]
    fn test_builtin_names() {
        let names = BuiltinPalettes::new().names();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"viridis".to_string()));
    }

    #[test]
    fn test_json_catalog() {
        let catalog = JsonPalettes::from_json_str(
            r##"{ "duo": ["#000000", "#ffffff"], "raw": "set palette gray\n" }"##,
        )
        .unwrap();
        assert_eq!(
            catalog.lookup("duo").unwrap(),
            "set style line 1 lt 1 lc rgb '#000000'\n\
             set style line 2 lt 1 lc rgb '#ffffff'\n\
             set palette maxcolors 2\n\
             set palette defined (0 '#000000', 1 '#ffffff')\n"
        );
        assert_eq!(catalog.lookup("raw").unwrap(), "set palette gray\n");
        assert!(catalog.lookup("dark2").is_err());
    }

    #[test]
    fn test_json_catalog_rejects_bad_input() {
        assert!(JsonPalettes::from_json_str("[1, 2]").is_err());
        assert!(JsonPalettes::from_json_file("/nonexistent/palettes.json").is_err());
    }
}
