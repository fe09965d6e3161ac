//! User configuration: service endpoint, refresh tick and key bindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/deal-feed/config.toml` (default `~/.config/deal-feed/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::client::DEFAULT_BASE_URL;

pub const DEFAULT_TICK_MS: u64 = 250;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    CurrentTab,
    NextTab,
    OpenBrandDeals,
    Back,
    Reload,
    ToggleHelp,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::CurrentTab,
        Action::NextTab,
        Action::OpenBrandDeals,
        Action::Back,
        Action::Reload,
        Action::ToggleHelp,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Top => "Jump to Top",
            Action::Bottom => "Jump to Bottom",
            Action::CurrentTab => "Current Window",
            Action::NextTab => "Next Window",
            Action::OpenBrandDeals => "All Brand Deals",
            Action::Back => "Back",
            Action::Reload => "Reload",
            Action::ToggleHelp => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::CurrentTab => "current_tab",
            Action::NextTab => "next_tab",
            Action::OpenBrandDeals => "open_brand_deals",
            Action::Back => "back",
            Action::Reload => "reload",
            Action::ToggleHelp => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// `(code, config-file name, on-screen label)`.
type NamedKey = (KeyCode, &'static str, &'static str);

const NAMED_KEYS: &[NamedKey] = &[
    (KeyCode::Char(' '), "Space", "Space"),
    (KeyCode::Up, "Up", "↑"),
    (KeyCode::Down, "Down", "↓"),
    (KeyCode::Left, "Left", "←"),
    (KeyCode::Right, "Right", "→"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Backspace, "Backspace", "Bksp"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PageUp", "PgUp"),
    (KeyCode::PageDown, "PageDown", "PgDn"),
];

/// Extra spellings accepted when reading the config file.
const KEY_ALIASES: &[(&str, KeyCode)] = &[
    ("return", KeyCode::Enter),
    ("escape", KeyCode::Esc),
    ("bksp", KeyCode::Backspace),
    ("pgup", KeyCode::PageUp),
    ("pgdn", KeyCode::PageDown),
];

/// One key plus the CTRL/ALT modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// SHIFT is ignored: it is already folded into the character.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Label for the help popup and status bar, e.g. `↓` or `Ctrl+r`.
    pub fn display(&self) -> String {
        self.render(|&(_, _, label)| label)
    }

    /// Config-file spelling, e.g. `PageDown` or `Ctrl+r`.
    fn to_config_string(&self) -> String {
        self.render(|&(_, name, _)| name)
    }

    fn render(&self, pick: impl Fn(&NamedKey) -> &'static str) -> String {
        let mut out = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            out.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            out.push_str("Alt+");
        }
        match NAMED_KEYS.iter().find(|entry| entry.0 == self.code) {
            Some(entry) => out.push_str(pick(entry)),
            None => match self.code {
                KeyCode::Char(c) => out.push(c),
                KeyCode::F(n) => out.push_str(&format!("F{n}")),
                other => out.push_str(&format!("{other:?}")),
            },
        }
        out
    }

    /// Inverse of [`KeyBind::to_config_string`].  Modifier and key names are
    /// case-insensitive; single characters are not (`g` and `G` differ).
    fn parse(s: &str) -> Option<Self> {
        let (prefix, key) = s.rsplit_once('+').unwrap_or(("", s));

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                _ => return None,
            };
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => named_key(&key.to_ascii_lowercase())?,
        };
        Some(Self::new(code, modifiers))
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    if let Some((code, _, _)) = NAMED_KEYS.iter().find(|(_, n, _)| n.eq_ignore_ascii_case(name)) {
        return Some(*code);
    }
    if let Some((_, code)) = KEY_ALIASES.iter().find(|(alias, _)| *alias == name) {
        return Some(*code);
    }
    let n: u8 = name.strip_prefix('f')?.parse().ok()?;
    Some(KeyCode::F(n))
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Root of the deal catalog service.
    pub base_url: String,
    /// Redraw tick; drives countdowns and window rollover.
    pub tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            base_url: DEFAULT_BASE_URL.to_string(),
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::{Backspace, Char, Down, End, Esc, Home, Left, Right, Up};
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Action::ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(Action::ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Action::Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Action::Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), n)]);
        m.insert(Action::CurrentTab, vec![KeyBind::new(Left, n), KeyBind::new(Char('1'), n)]);
        m.insert(Action::NextTab, vec![KeyBind::new(Right, n), KeyBind::new(Char('2'), n)]);
        m.insert(Action::OpenBrandDeals, vec![KeyBind::new(Char('b'), n)]);
        m.insert(Action::Back, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]);
        m.insert(Action::Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Action::ToggleHelp, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Resolve a key event to an action.  The most specific binding wins,
    /// so `Ctrl+r` beats a plain `r` bound elsewhere.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |bind| (action, bind)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    fn binds_for(&self, action: Action) -> &[KeyBind] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every binding of `action`, e.g. `↑/k`.
    pub fn display_bindings(&self, action: Action) -> String {
        let binds = self.binds_for(action);
        if binds.is_empty() {
            return "unbound".into();
        }
        binds.iter().map(KeyBind::display).collect::<Vec<_>>().join("/")
    }

    /// First binding only.
    pub fn short_binding(&self, action: Action) -> String {
        self.binds_for(action)
            .first()
            .map_or_else(|| "?".into(), KeyBind::display)
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}/{}: tabs | {}: brand deals | {}: help | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::CurrentTab),
            self.short_binding(Action::NextTab),
            self.short_binding(Action::OpenBrandDeals),
            self.short_binding(Action::ToggleHelp),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), %err, "could not read config");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "base_url" => {
                    let url = value.trim_matches('"');
                    if !url.is_empty() {
                        config.base_url = url.to_string();
                    }
                    continue;
                }
                "tick_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        // Countdowns show seconds, so never tick slower than 1 s.
                        config.tick_ms = v.clamp(50, 1000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# deal-feed configuration".to_string(),
            String::new(),
            "# Service".to_string(),
            format!("base_url = \"{}\"", self.base_url),
            format!("tick_ms = {}", self.tick_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Backspace,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/deal-feed/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("deal-feed").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_cover_every_action() {
        let config = AppConfig::default();
        for &action in Action::ALL {
            assert_ne!(config.display_bindings(action), "unbound", "{action:?}");
        }
    }

    #[test]
    fn matches_default_keys() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(key(KeyCode::Char('j'))), Some(Action::ScrollDown));
        assert_eq!(config.match_key(key(KeyCode::Right)), Some(Action::NextTab));
        assert_eq!(config.match_key(key(KeyCode::Char('G'))), Some(Action::Bottom));
        assert_eq!(config.match_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn parses_settings_and_bindings() {
        let config = AppConfig::parse_config(
            "# comment\n\
             base_url = \"http://localhost:9000\"\n\
             tick_ms = 5000\n\
             reload = Ctrl+r, F5\n\
             quit = Esc\n\
             nonsense = q\n",
        );
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.tick_ms, 1000);
        assert_eq!(
            config.bindings[&Action::Reload],
            vec![
                KeyBind::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::F(5), KeyModifiers::NONE),
            ]
        );
        assert_eq!(
            config.bindings[&Action::Quit],
            vec![KeyBind::new(KeyCode::Esc, KeyModifiers::NONE)]
        );
        // Untouched actions keep their defaults.
        assert_eq!(config.short_binding(Action::ScrollUp), "↑");
    }

    #[test]
    fn serialised_config_parses_back_to_same_bindings() {
        let mut config = AppConfig::default();
        config.base_url = "http://example.test".into();
        config.tick_ms = 500;
        let reparsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(reparsed.base_url, config.base_url);
        assert_eq!(reparsed.tick_ms, 500);
        for &action in Action::ALL {
            assert_eq!(reparsed.bindings[&action], config.bindings[&action], "{action:?}");
        }
    }

    #[test]
    fn rejects_unknown_modifiers() {
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("wat"), None);
        assert_eq!(
            KeyBind::parse("Space"),
            Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE))
        );
    }
}
