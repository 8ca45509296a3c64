//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's config file, key by key; a config file only needs
//! the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [labels]
//! modal_title_suffix = "查看更多&價目"
//! not_found = "找不到此項目資料。"
//! # ... every UI string, see `commission-folio gen-config`
//!
//! [contact]
//! recipient = "hello@example.com"
//! subject_prefix = "IGU 委託/詢問"
//!
//! [floating]
//! threshold = 260.0         # scrollY before floating buttons appear
//! gap = 56.0                # distance between the two buttons
//! base = 16.0               # bottom padding
//! footer_gap = 12.0         # clearance kept above the footer
//!
//! [carousel]
//! interval_ms = 3500
//! swipe_threshold = 40.0
//! preload_delay_ms = 1000
//!
//! [reveal]
//! base_delay_ms = 120
//! step_ms = 90
//!
//! [toast]
//! duration_ms = 1400
//!
//! [preferences]
//! file = "preferences.json"
//! theme_key = "theme"
//! status_key = "commissionStatus"
//!
//! [[status.entries]]
//! key = "open"
//! text = "委託開放中"
//! sub = "可排到：2026 / 01"
//!
//! [colors.light]
//! background = "#fffaf5"
//! # ...
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// UI strings shown by the gallery, modal and notices.
    pub labels: Labels,
    /// Contact form composition.
    pub contact: ContactConfig,
    /// Floating back-to-top / quick-commission placement.
    pub floating: FloatingConfig,
    /// Carousel autoplay and swipe.
    pub carousel: CarouselConfig,
    /// Status-bar animation timing.
    pub reveal: RevealConfig,
    /// Transient notice display.
    pub toast: ToastConfig,
    /// Persisted preference keys and file.
    pub preferences: PreferencesConfig,
    /// Commission status cycle.
    pub status: StatusConfig,
    /// Color schemes for the light and dark themes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status.entries.is_empty() {
            return Err(ConfigError::Validation(
                "status.entries must not be empty".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be non-zero".into(),
            ));
        }
        if !self.contact.recipient.contains('@') {
            return Err(ConfigError::Validation(
                "contact.recipient must be an email address".into(),
            ));
        }
        let f = &self.floating;
        if [f.threshold, f.gap, f.base, f.footer_gap]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Validation(
                "floating values must be finite and non-negative".into(),
            ));
        }
        if self.preferences.theme_key.is_empty() || self.preferences.status_key.is_empty() {
            return Err(ConfigError::Validation(
                "preferences keys must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// UI strings. Defaults are the site's Traditional Chinese copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub modal_title_suffix: String,
    pub not_found: String,
    pub samples_heading: String,
    pub samples_tag: String,
    pub price_heading: String,
    pub price_tag: String,
    pub price_columns: [String; 3],
    pub price_empty: String,
    pub process_heading: String,
    pub process_tag: String,
    pub process_columns: [String; 2],
    pub notes_heading: String,
    pub notes_tag: String,
    pub zoom_close: String,
    pub zoom_backdrop: String,
    pub zoom_default_alt: String,
    pub all_chip: String,
    pub search_placeholder: String,
    pub quick_commission: String,
    pub quick_commission_aria: String,
    pub quick_commission_href: String,
    /// Dot button label; `{n}` is replaced by the 1-based slide number.
    pub carousel_dot: String,
    pub copied: String,
    pub email_copied: String,
    pub copy_failed: String,
    pub status_updated: String,
    /// Toggle glyph while the dark theme is active.
    pub theme_glyph_dark: String,
    /// Toggle glyph while the light theme is active.
    pub theme_glyph_light: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            modal_title_suffix: "查看更多&價目".into(),
            not_found: "找不到此項目資料。".into(),
            samples_heading: "此項目範例圖".into(),
            samples_tag: "Samples".into(),
            price_heading: "此項目報價".into(),
            price_tag: "Price".into(),
            price_columns: ["項目".into(), "內容說明".into(), "價格（TWD）".into()],
            price_empty: "尚未設定此項目報價".into(),
            process_heading: "委託流程".into(),
            process_tag: "Process".into(),
            process_columns: ["步驟".into(), "說明".into()],
            notes_heading: "補充說明".into(),
            notes_tag: "Details".into(),
            zoom_close: "關閉".into(),
            zoom_backdrop: "關閉放大".into(),
            zoom_default_alt: "作品".into(),
            all_chip: "全部".into(),
            search_placeholder: "搜尋…".into(),
            quick_commission: "✦ 快速委託".into(),
            quick_commission_aria: "快速委託".into(),
            quick_commission_href: "contact.html#commission".into(),
            carousel_dot: "切到第 {n} 張".into(),
            copied: "已複製 ✅".into(),
            email_copied: "Email 已複製 ✅".into(),
            copy_failed: "複製失敗（瀏覽器限制）".into(),
            status_updated: "狀態已更新".into(),
            theme_glyph_dark: "☀️".into(),
            theme_glyph_light: "🌙".into(),
        }
    }
}

/// Contact form composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Address the composed message is sent to.
    pub recipient: String,
    /// First line of the composed body.
    pub heading: String,
    /// Subject is `[prefix] type - name`.
    pub subject_prefix: String,
    /// Substituted for blank name/email/message fields.
    pub blank: String,
    /// Substituted for a blank inquiry type.
    pub default_type: String,
    /// Web-mail compose endpoint.
    pub compose_url: String,
    /// Shown after the body was copied to the clipboard.
    pub copied_notice: String,
    /// Shown when the clipboard write failed.
    pub manual_copy_notice: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".into(),
            heading: "【IGU 聯絡表單】".into(),
            subject_prefix: "IGU 委託/詢問".into(),
            blank: "（未填）".into(),
            default_type: "一般問題".into(),
            compose_url: "https://mail.google.com/mail/".into(),
            copied_notice: "內容已複製，請在 Gmail 直接貼上（Ctrl + V）".into(),
            manual_copy_notice: "請手動複製內容後貼到 Gmail".into(),
        }
    }
}

/// Floating button placement, in CSS pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloatingConfig {
    pub threshold: f64,
    pub gap: f64,
    pub base: f64,
    pub footer_gap: f64,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            threshold: 260.0,
            gap: 56.0,
            base: 16.0,
            footer_gap: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    pub swipe_threshold: f64,
    /// Delay before the second slide's image is fetched.
    pub preload_delay_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3500,
            swipe_threshold: 40.0,
            preload_delay_ms: 1000,
        }
    }
}

/// Staggered status-bar fill: bar `i` starts at `base_delay_ms + i * step_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub base_delay_ms: u64,
    pub step_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 120,
            step_ms: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 1400 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferencesConfig {
    /// Preference file, relative to the config directory.
    pub file: String,
    pub theme_key: String,
    pub status_key: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            file: "preferences.json".into(),
            theme_key: "theme".into(),
            status_key: "commissionStatus".into(),
        }
    }
}

/// One commission status: stored key plus pill text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusEntry {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub sub: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// Cycle order; the first entry is the fallback for unknown stored values.
    pub entries: Vec<StatusEntry>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        let entry = |key: &str, text: &str, sub: &str| StatusEntry {
            key: key.into(),
            text: text.into(),
            sub: sub.into(),
        };
        Self {
            entries: vec![
                entry("open", "委託開放中", "可排到：2026 / 01"),
                entry("busy", "排程較滿", "可排到：2026 / 02"),
                entry("closed", "暫停接單", "可先排隊／等候名單"),
            ],
        }
    }
}

/// Color configuration for the light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Captions, chip text, secondary copy.
    pub text_muted: String,
    pub border: String,
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fffaf5".into(),
            text: "#2b2b2b".into(),
            text_muted: "#7a6f66".into(),
            border: "#eadfd6".into(),
            accent: "#d9825b".into(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#16141a".into(),
            text: "#efe9e4".into(),
            text_muted: "#a39b94".into(),
            border: "#34303a".into(),
            accent: "#f0a27d".into(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(dir = %root.display(), "config loaded");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# commission-folio configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# UI strings
# ---------------------------------------------------------------------------
[labels]
modal_title_suffix = "查看更多&價目"
not_found = "找不到此項目資料。"
samples_heading = "此項目範例圖"
samples_tag = "Samples"
price_heading = "此項目報價"
price_tag = "Price"
price_columns = ["項目", "內容說明", "價格（TWD）"]
price_empty = "尚未設定此項目報價"
process_heading = "委託流程"
process_tag = "Process"
process_columns = ["步驟", "說明"]
notes_heading = "補充說明"
notes_tag = "Details"
zoom_close = "關閉"
zoom_backdrop = "關閉放大"
zoom_default_alt = "作品"
all_chip = "全部"
search_placeholder = "搜尋…"
quick_commission = "✦ 快速委託"
quick_commission_aria = "快速委託"
quick_commission_href = "contact.html#commission"
# {n} is replaced by the 1-based slide number.
carousel_dot = "切到第 {n} 張"
copied = "已複製 ✅"
email_copied = "Email 已複製 ✅"
copy_failed = "複製失敗（瀏覽器限制）"
status_updated = "狀態已更新"
theme_glyph_dark = "☀️"
theme_glyph_light = "🌙"

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
recipient = "hello@example.com"
heading = "【IGU 聯絡表單】"
# Subject is "[prefix] type - name".
subject_prefix = "IGU 委託/詢問"
blank = "（未填）"
default_type = "一般問題"
compose_url = "https://mail.google.com/mail/"
copied_notice = "內容已複製，請在 Gmail 直接貼上（Ctrl + V）"
manual_copy_notice = "請手動複製內容後貼到 Gmail"

# ---------------------------------------------------------------------------
# Floating back-to-top / quick-commission buttons (CSS px)
# ---------------------------------------------------------------------------
[floating]
threshold = 260.0
gap = 56.0
base = 16.0
footer_gap = 12.0

# ---------------------------------------------------------------------------
# Carousel
# ---------------------------------------------------------------------------
[carousel]
interval_ms = 3500
# Horizontal pointer travel (px) that counts as a swipe.
swipe_threshold = 40.0
preload_delay_ms = 1000

# ---------------------------------------------------------------------------
# Status bars: bar i starts filling at base_delay_ms + i * step_ms
# ---------------------------------------------------------------------------
[reveal]
base_delay_ms = 120
step_ms = 90

[toast]
duration_ms = 1400

# ---------------------------------------------------------------------------
# Persisted preferences
# ---------------------------------------------------------------------------
[preferences]
# Relative to the config directory.
file = "preferences.json"
theme_key = "theme"
status_key = "commissionStatus"

# ---------------------------------------------------------------------------
# Commission status cycle. The first entry is used for unknown stored values.
# ---------------------------------------------------------------------------
[[status.entries]]
key = "open"
text = "委託開放中"
sub = "可排到：2026 / 01"

[[status.entries]]
key = "busy"
text = "排程較滿"
sub = "可排到：2026 / 02"

[[status.entries]]
key = "closed"
text = "暫停接單"
sub = "可先排隊／等候名單"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors.light]
background = "#fffaf5"
text = "#2b2b2b"
text_muted = "#7a6f66"
border = "#eadfd6"
accent = "#d9825b"

[colors.dark]
background = "#16141a"
text = "#efe9e4"
text_muted = "#a39b94"
border = "#34303a"
accent = "#f0a27d"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark values apply under `:root.dark`, the class the theme toggle sets.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
}}

:root.dark {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-text-muted: {dark_text_muted};
    --color-border: {dark_border};
    --color-accent: {dark_accent};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
    )
}
