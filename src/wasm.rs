//! WASM bindings for texbox
//!
//! This module provides JavaScript-accessible functions for laying out
//! LaTeX math markup.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{Formula, HAlign, LayoutBox, LayoutOptions, MathStyle};

/// Layout options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct LayoutRequest {
    /// Markup to lay out
    pub latex: String,
    /// Font size in points
    #[serde(default = "default_size")]
    pub size: f64,
    /// Start in text style instead of display style
    #[serde(default)]
    pub inline: bool,
    /// Text width in points; enables alignment
    #[serde(default)]
    pub width: Option<f64>,
    /// `"left"`, `"center"` or `"right"`
    #[serde(default)]
    pub align: Option<String>,
    /// Break lines with this spacing (requires `width`)
    #[serde(default)]
    pub interline: Option<f64>,
    /// Keep the valid prefix of broken markup instead of failing
    #[serde(default)]
    pub partial: bool,
    /// Include the full box tree in the result
    #[serde(default)]
    pub include_tree: bool,
}

#[cfg(feature = "wasm")]
fn default_size() -> f64 {
    20.0
}

/// Layout result with metrics
#[cfg(feature = "wasm")]
#[derive(Serialize)]
pub struct LayoutResult {
    pub success: bool,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub colored: bool,
    /// Error message if parsing or configuration failed
    pub error: Option<String>,
    pub tree: Option<LayoutBox>,
}

#[cfg(feature = "wasm")]
impl LayoutResult {
    fn failure(error: String) -> Self {
        LayoutResult {
            success: false,
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            colored: false,
            error: Some(error),
            tree: None,
        }
    }
}

/// Initialize panic hook and logging for the browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Warn);
}

#[cfg(feature = "wasm")]
fn parse_align(align: Option<&str>) -> HAlign {
    match align {
        Some("left") => HAlign::Left,
        Some("right") => HAlign::Right,
        _ => HAlign::Center,
    }
}

#[cfg(feature = "wasm")]
fn layout_request(request: &LayoutRequest) -> LayoutResult {
    let formula = if request.partial {
        Formula::partial(&request.latex)
    } else {
        match Formula::parse(&request.latex) {
            Ok(formula) => formula,
            Err(e) => return LayoutResult::failure(e.to_string()),
        }
    };

    let mut options = LayoutOptions::display(request.size);
    if request.inline {
        options = options.with_style(MathStyle::Text);
    }
    if let Some(width) = request.width {
        options = options.with_width(width, parse_align(request.align.as_deref()));
    }
    if let Some(interline) = request.interline {
        options = options.with_interline(interline);
    }

    match formula.create_icon(&options) {
        Ok(icon) => LayoutResult {
            success: true,
            width: icon.width(),
            height: icon.height(),
            depth: icon.depth(),
            colored: icon.is_colored(),
            error: None,
            tree: request.include_tree.then(|| icon.root.clone()),
        },
        Err(e) => LayoutResult::failure(e.to_string()),
    }
}

/// Lay out markup and return its metrics
///
/// # Arguments
/// * `options` - a `LayoutRequest` object
///
/// # Returns
/// A `LayoutResult` object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "layoutLatex")]
pub fn layout_latex_wasm(options: JsValue) -> JsValue {
    let result = match serde_wasm_bindgen::from_value::<LayoutRequest>(options) {
        Ok(request) => layout_request(&request),
        Err(e) => LayoutResult::failure(format!("Invalid options: {}", e)),
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Check markup without laying it out
///
/// # Returns
/// `null` if the markup parses, the error message otherwise
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> Option<String> {
    Formula::parse(input).err().map(|e| e.to_string())
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
