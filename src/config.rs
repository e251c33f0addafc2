use serde::Deserialize;
use std::path::PathBuf;

use crate::mail::DEFAULT_BASE_URL;
use crate::settings::DEFAULT_INTERVAL_SECS;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub export: ExportConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL; `/json` is appended
    pub base_url: String,
    /// Inbox identifier
    pub namespace: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Start with auto-refresh enabled
    pub auto_refresh: bool,
    /// Poll interval in seconds (5..=3600)
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported messages go (default: download dir)
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Date column width in characters
    pub date_width: usize,
    /// From column width in characters
    pub from_width: usize,
    /// Tag column width in characters
    pub tag_width: usize,
    /// Detail modal size as a percentage of the screen
    pub detail_width_pct: u16,
    pub detail_height_pct: u16,
}

/// Semantic theme configuration using Capstan Cloud colors as defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    // Base colors
    pub bg: String,
    pub bg_panel: String,
    pub fg: String,
    pub fg_muted: String,
    pub fg_subtle: String,

    // Border colors
    pub border: String,
    pub border_subtle: String,
    pub border_active: String,

    // Accent colors
    pub primary: String,
    pub secondary: String,

    // Semantic colors
    pub success: String,
    pub error: String,

    // UI-specific mappings
    pub selected_bg: String,
    pub unread: String,
    pub url: String,
    pub tag: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace: String::new(),
            api_key: String::new(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: false,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            date_width: 14,
            from_width: 24,
            tag_width: 12,
            detail_width_pct: 80,
            detail_height_pct: 80,
        }
    }
}

/// Capstan Cloud theme - warm earth tones with gold accents
impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            // Base colors
            bg: "#1a1917".to_string(),
            bg_panel: "#262422".to_string(),
            fg: "#f7f7f5".to_string(),
            fg_muted: "#8c8985".to_string(),
            fg_subtle: "#b8b5b0".to_string(),

            // Border colors
            border: "#524f4c".to_string(),
            border_subtle: "#393634".to_string(),
            border_active: "#d4a366".to_string(), // primary

            // Accent colors
            primary: "#d4a366".to_string(),
            secondary: "#8fa5ae".to_string(), // blue

            // Semantic colors
            success: "#52c41a".to_string(),
            error: "#ff4d4f".to_string(),

            // UI-specific mappings
            selected_bg: "#393634".to_string(),
            unread: "#d4a366".to_string(),      // primary (gold)
            url: "#8fa5ae".to_string(),         // secondary (blue)
            tag: "#b48ead".to_string(),         // magenta
        }
    }
}

/// Environment variables that override `[api]`, first match wins
const ENV_API_KEY: [&str; 2] = ["TESTMAIL_API_KEY", "VITE_API_KEY"];
const ENV_BASE_URL: [&str; 2] = ["TESTMAIL_BASE_URL", "VITE_BASE_URL"];
const ENV_NAMESPACE: [&str; 2] = ["TESTMAIL_NAMESPACE", "VITE_NAMESPACE"];

impl Config {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("inboxtui/config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/inboxtui/config.toml"))
    }

    /// Load the config file (if any), then apply environment overrides
    pub fn load() -> Self {
        let config_path = Self::path();

        let mut config = Self::default();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(parsed) => config = parsed,
                    Err(e) => {
                        log::warn!("config parse error in {}: {}", config_path.display(), e);
                        eprintln!("Config parse error: {}", e);
                    }
                },
                Err(e) => {
                    log::warn!("config read error: {}", e);
                    eprintln!("Config read error: {}", e);
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Override API settings from the environment. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |keys: [&str; 2]| {
            keys.into_iter()
                .find_map(|k| lookup(k).filter(|v| !v.is_empty()))
        };
        if let Some(v) = first(ENV_API_KEY) {
            self.api.api_key = v;
        }
        if let Some(v) = first(ENV_BASE_URL) {
            self.api.base_url = v;
        }
        if let Some(v) = first(ENV_NAMESPACE) {
            self.api.namespace = v;
        }
    }
}

impl ExportConfig {
    /// Export directory with `~` expanded
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl ThemeConfig {
    // Convenience methods for common colors
    pub fn bg(&self) -> ratatui::style::Color {
        parse_color(&self.bg)
    }
    pub fn bg_panel(&self) -> ratatui::style::Color {
        parse_color(&self.bg_panel)
    }
    pub fn fg(&self) -> ratatui::style::Color {
        parse_color(&self.fg)
    }
    pub fn fg_muted(&self) -> ratatui::style::Color {
        parse_color(&self.fg_muted)
    }
    pub fn fg_subtle(&self) -> ratatui::style::Color {
        parse_color(&self.fg_subtle)
    }
    pub fn border(&self) -> ratatui::style::Color {
        parse_color(&self.border)
    }
    pub fn border_subtle(&self) -> ratatui::style::Color {
        parse_color(&self.border_subtle)
    }
    pub fn border_active(&self) -> ratatui::style::Color {
        parse_color(&self.border_active)
    }
    pub fn primary(&self) -> ratatui::style::Color {
        parse_color(&self.primary)
    }
    pub fn secondary(&self) -> ratatui::style::Color {
        parse_color(&self.secondary)
    }
    pub fn success(&self) -> ratatui::style::Color {
        parse_color(&self.success)
    }
    pub fn error(&self) -> ratatui::style::Color {
        parse_color(&self.error)
    }
    pub fn selected_bg(&self) -> ratatui::style::Color {
        parse_color(&self.selected_bg)
    }
    pub fn unread(&self) -> ratatui::style::Color {
        parse_color(&self.unread)
    }
    pub fn url(&self) -> ratatui::style::Color {
        parse_color(&self.url)
    }
    pub fn tag(&self) -> ratatui::style::Color {
        parse_color(&self.tag)
    }
}

/// Parse color string to ratatui Color
pub fn parse_color(s: &str) -> ratatui::style::Color {
    use ratatui::style::Color;

    // Try hex first (#RRGGBB)
    if s.starts_with('#') && s.len() == 7 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&s[1..3], 16),
            u8::from_str_radix(&s[3..5], 16),
            u8::from_str_radix(&s[5..7], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }

    // Named colors
    match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            namespace = "abc12"

            [refresh]
            auto_refresh = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api.namespace, "abc12");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.layout.date_width, 14);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.api.api_key = "from-file".into();
        let env: HashMap<&str, &str> = [
            ("VITE_API_KEY", "vite-key"),
            ("TESTMAIL_API_KEY", "testmail-key"),
            ("VITE_NAMESPACE", "ns"),
            ("TESTMAIL_BASE_URL", ""),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.api_key, "testmail-key");
        assert_eq!(config.api.namespace, "ns");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_export_dir_explicit() {
        let export = ExportConfig {
            dir: Some("/tmp/exports".into()),
        };
        assert_eq!(export.resolved_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#d4a366"), Color::Rgb(0xd4, 0xa3, 0x66));
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("#zzzzzz"), Color::White);
    }
}
