//! Cascading style configuration.
//!
//! A render call resolves its style in three stages, each a pure merge over a
//! JSON-object tree: built-in style ← optional TOML file ← keyword overrides.
//! The merged tree is then deserialized into [`StyleConfig`], whose sections
//! are all required, so a missing or renamed key fails at merge time rather
//! than at draw time. The built-in trees are parsed once and only ever
//! cloned, never mutated.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;

const WHITE_STYLE_TOML: &str = include_str!("../../assets/style_white.toml");
const COLORFUL_STYLE_TOML: &str = include_str!("../../assets/style_colorful.toml");

static WHITE_STYLE: LazyLock<StyleTree> = LazyLock::new(|| {
    StyleTree::from_toml_str(WHITE_STYLE_TOML).expect("embedded white style is valid TOML")
});
static COLORFUL_STYLE: LazyLock<StyleTree> = LazyLock::new(|| {
    StyleTree::from_toml_str(COLORFUL_STYLE_TOML).expect("embedded colorful style is valid TOML")
});

/// Registered built-in style names.
pub fn builtin_style_names() -> &'static [&'static str] {
    &["colorful", "white"]
}

fn builtin_style_tree(style: &str) -> Result<StyleTree> {
    match style {
        "white" => Ok(WHITE_STYLE.clone()),
        "colorful" => Ok(COLORFUL_STYLE.clone()),
        other => Err(Error::UnknownStyle {
            style: other.to_string(),
            available: builtin_style_names().join(", "),
        }),
    }
}

/// A nested key-value configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTree(Value);

impl Default for StyleTree {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl StyleTree {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a TOML document into a tree.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let parsed: toml::Value = toml::from_str(text).map_err(|err| Error::InvalidStyleConfig {
            message: err.to_string(),
        })?;
        let value = serde_json::to_value(parsed).map_err(|err| Error::InvalidStyleConfig {
            message: err.to_string(),
        })?;
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_object().is_none_or(Map::is_empty)
    }

    /// Returns a new tree with `overrides` merged on top of `self`.
    ///
    /// Object-vs-object pairs recurse, preserving sibling keys the override
    /// does not mention; any other pairing replaces the base value wholesale.
    /// `self` is never mutated.
    pub fn merged(&self, overrides: &StyleTree) -> StyleTree {
        let mut out = self.0.clone();
        deep_merge_value(&mut out, &overrides.0);
        StyleTree(out)
    }

    /// Sets a leaf value by dotted path, creating intermediate objects.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Keyword-level overrides, the last cascade stage.
///
/// Covers the small enumerated subset callers may pass directly: canvas
/// resolution and canvas size minimums. Palette overrides bypass gradient
/// generation and therefore live on the render options, not in the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    pub dpi: Option<u32>,
    /// `(width, height)` canvas minimums in px.
    pub figsize: Option<(f64, f64)>,
}

impl StyleOverrides {
    pub fn as_tree(&self) -> StyleTree {
        let mut tree = StyleTree::empty_object();
        if let Some(dpi) = self.dpi {
            tree.set_value("figure.dpi", Value::from(dpi));
        }
        if let Some((width, height)) = self.figsize {
            tree.set_value("figure.width", Value::from(width));
            tree.set_value("figure.height", Value::from(height));
        }
        tree
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureConfig {
    /// Canvas width minimum, px. The canvas grows to fit content but never
    /// shrinks below this.
    pub width: f64,
    /// Canvas height minimum, px.
    pub height: f64,
    /// Raster resolution basis; export scales pixmaps by `dpi / 96`.
    pub dpi: u32,
    pub title_font_size: f64,
    pub title_font_weight: String,
    /// Gap between the title baseline block and the first box, px.
    pub title_pad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Wrap width for main box titles, display columns.
    pub main_title_width: usize,
    /// Wrap width for main box body text, display columns.
    pub main_text_width: usize,
    /// Wrap width for exclusion box text, display columns.
    pub exclusion_text_width: usize,
    pub main_box_width: f64,
    pub exclusion_box_width: f64,
    /// Minimum vertical gap between consecutive main boxes, px.
    pub base_gap: f64,
    /// Horizontal gap between the main column and exclusion boxes, px.
    pub side_gap: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    /// Horizontal padding outside the outermost boxes, px.
    pub x_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxGeometryConfig {
    /// Inset between a box edge and its text block, px. Counts twice in the
    /// box height.
    pub text_padding: f64,
    pub title_line_height: f64,
    pub body_line_height: f64,
    /// Gap between the title block and the body block, px.
    pub title_body_gap: f64,
    pub min_main_height: f64,
    pub min_exclusion_height: f64,
    /// Vertical clearance kept above and below an exclusion box inside its
    /// transition gap, px.
    pub clearance: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextConfig {
    pub font_size_title: f64,
    pub font_size_main: f64,
    pub font_size_exclusion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    pub box_stroke_width: f64,
    pub connector_stroke_width: f64,
    pub arrow_head_scale: f64,
    pub junction_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorConfig {
    /// When false, named color strings in step records are rejected.
    pub allow_named: bool,
    pub main_start: String,
    pub main_end: String,
    pub exclusion_start: String,
    pub exclusion_end: String,
}

/// Fully resolved style configuration. All six sections must survive the
/// cascade; a partial override can never remove an untouched section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    pub figure: FigureConfig,
    pub layout: LayoutConfig,
    pub box_geometry: BoxGeometryConfig,
    pub text: TextConfig,
    pub lines: LineConfig,
    pub colors: ColorConfig,
}

impl StyleConfig {
    /// Validates a merged tree against the schema.
    pub fn from_tree(tree: &StyleTree) -> Result<Self> {
        serde_json::from_value(tree.as_value().clone()).map_err(|err| Error::InvalidStyleConfig {
            message: err.to_string(),
        })
    }
}

/// Resolves the full style cascade: built-in style, optional TOML override
/// file, keyword overrides. Each stage produces a fresh tree.
pub fn load_style_config(
    style: &str,
    custom_config_path: Option<&Path>,
    overrides: &StyleOverrides,
) -> Result<StyleConfig> {
    let mut tree = builtin_style_tree(style)?;
    tracing::debug!(style, "resolved built-in style");

    if let Some(path) = custom_config_path {
        if !path.exists() {
            return Err(Error::StyleFileMissing {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|err| Error::InvalidStyleConfig {
            message: format!("{}: {err}", path.display()),
        })?;
        let file_tree = StyleTree::from_toml_str(&text)?;
        tree = tree.merged(&file_tree);
        tracing::debug!(path = %path.display(), "merged style config file");
    }

    let kw_tree = overrides.as_tree();
    if !kw_tree.is_empty() {
        tree = tree.merged(&kw_tree);
        tracing::debug!("merged keyword overrides");
    }

    StyleConfig::from_tree(&tree)
}
