//! Layout authoring rules
//!
//! An immutable registry mapping layout names to authoring guidance for the
//! generation collaborator, plus the naming conventions that mark dynamic
//! layouts and anchor shapes. Loaded once from TOML at startup and passed
//! explicitly into the introspector; never read from global state.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing a rules file
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Naming conventions that drive template classification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Layouts whose name starts with this prefix are dynamic
    pub dynamic_prefix: String,
    /// Non-placeholder shapes whose name starts with this prefix are anchors
    pub anchor_prefix: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            dynamic_prefix: "Dynamic_".to_string(),
            anchor_prefix: "Guide_".to_string(),
        }
    }
}

/// Authoring guidance for one layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRule {
    #[serde(default)]
    pub description: String,
    /// Slot or anchor name -> writing instruction; ordered for stable output
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

/// The full rules registry
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRules {
    #[serde(default)]
    pub conventions: Conventions,
    #[serde(default)]
    pub layouts: BTreeMap<String, LayoutRule>,
}

/// Built-in registry for the stock template family
const DEFAULT_RULES: &str = r#"
[layouts.Title_Slide]
description = "Cover slide"
[layouts.Title_Slide.rules]
Title = "Keep under 20 characters, punchy"
Subtitle = "Include the date and presenter"

[layouts.Content_List]
description = "Agenda and bullet summaries"
[layouts.Content_List.rules]
Content = "Short bullet-style lines"

[layouts.Dynamic_Split]
description = "Side-by-side comparison (chart/text mix)"
[layouts.Dynamic_Split.rules]
Guide_Left = "Best suited for a chart"
Guide_Right = "Key takeaways as text"

[layouts.Dynamic_Full]
description = "Large data visualisation"
[layouts.Dynamic_Full.rules]
Guide_Main = "A dense table or a large chart"
"#;

impl TemplateRules {
    /// Load rules from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load rules from a TOML string
    pub fn from_str(content: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(content)?)
    }

    /// Guidance for a layout; layouts absent from the registry get an empty
    /// rule so introspection never fails on an unknown layout name.
    pub fn for_layout(&self, name: &str) -> LayoutRule {
        self.layouts.get(name).cloned().unwrap_or_default()
    }
}

impl Default for TemplateRules {
    fn default() -> Self {
        Self::from_str(DEFAULT_RULES).expect("built-in rules should be valid TOML")
    }
}
