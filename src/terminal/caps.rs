//! Terminal identification and capability heuristics.
//!
//! Everything here is read from environment variables and is best effort:
//! a `false` means "not known to work", and the renderer always has an
//! ASCII / indexed-color path to fall back on.

use crate::style::ColorDepth;

/// Variable that forces Unicode glyph sets on (`1`/`true`) or off (`0`/`false`).
pub const UNICODE_OVERRIDE_VAR: &str = "TESSEL_UNICODE";

/// Known terminal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerminalKind {
    /// Could not be identified.
    #[default]
    Unknown,
    /// xterm or an xterm-compatible emulator.
    Xterm,
    /// DEC VT100.
    Vt100,
    /// Legacy Windows console host.
    WindowsConsole,
    /// Windows Terminal.
    WindowsTerminal,
    /// PowerShell console.
    PowerShell,
    /// `cmd.exe`.
    Cmd,
    /// GNOME Terminal.
    Gnome,
    /// KDE Konsole.
    Konsole,
    /// iTerm2 on macOS.
    ITerm2,
    /// Running inside tmux.
    Tmux,
    /// Running inside GNU Screen.
    Screen,
}

impl TerminalKind {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xterm => "XTerm",
            Self::Vt100 => "VT100",
            Self::WindowsConsole => "Windows Console",
            Self::WindowsTerminal => "Windows Terminal",
            Self::PowerShell => "PowerShell",
            Self::Cmd => "Command Prompt",
            Self::Gnome => "GNOME Terminal",
            Self::Konsole => "Konsole",
            Self::ITerm2 => "iTerm2",
            Self::Tmux => "tmux",
            Self::Screen => "GNU Screen",
            Self::Unknown => "Unknown",
        }
    }

    /// Classify from environment lookups.
    ///
    /// A multiplexer marker wins over the terminal program, which wins over
    /// `TERM` substrings.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if cfg!(windows) {
            return Self::from_windows_env(&lookup);
        }

        if lookup("TMUX").is_some() {
            return Self::Tmux;
        }

        match lookup("TERM_PROGRAM").as_deref() {
            Some("iTerm.app") => return Self::ITerm2,
            Some("gnome-terminal") => return Self::Gnome,
            _ => {}
        }

        let term = lookup("TERM").unwrap_or_default();
        [
            ("xterm", Self::Xterm),
            ("screen", Self::Screen),
            ("konsole", Self::Konsole),
            ("vt100", Self::Vt100),
        ]
        .into_iter()
        .find_map(|(needle, kind)| term.contains(needle).then_some(kind))
        .unwrap_or(Self::Unknown)
    }

    fn from_windows_env(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        if lookup("WT_SESSION").is_some() {
            return Self::WindowsTerminal;
        }
        if lookup("TERM_PROGRAM").is_some_and(|p| p.contains("vscode")) {
            return Self::Xterm;
        }
        if lookup("PROMPT").is_some_and(|p| p.contains("PS")) {
            return Self::PowerShell;
        }
        Self::WindowsConsole
    }

    /// Whether this terminal is known to understand mouse reporting.
    pub const fn supports_mouse(self) -> bool {
        matches!(
            self,
            Self::Xterm
                | Self::WindowsTerminal
                | Self::Gnome
                | Self::Konsole
                | Self::ITerm2
                | Self::Tmux
        )
    }
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the attached terminal is believed to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Detected terminal family.
    pub kind: TerminalKind,
    /// Box-drawing and other non-ASCII glyphs render correctly.
    pub unicode: bool,
    /// 24-bit color sequences are understood.
    pub truecolor: bool,
    /// Mouse reporting is available.
    pub mouse: bool,
    /// How RGB colors should be encoded.
    pub color_depth: ColorDepth,
}

impl Default for Capabilities {
    /// The conservative baseline: ASCII glyphs and 16 colors.
    fn default() -> Self {
        Self {
            kind: TerminalKind::Unknown,
            unicode: false,
            truecolor: false,
            mouse: false,
            color_depth: ColorDepth::Ansi16,
        }
    }
}

impl Capabilities {
    /// Detect from the process environment.
    pub fn detect() -> Self {
        Self::from_env(|name| std::env::var(name).ok())
    }

    /// Detect from an arbitrary variable lookup.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let kind = TerminalKind::from_env(&lookup);
        let unicode = detect_unicode(&lookup);
        let truecolor = detect_truecolor(kind, &lookup);

        let color_depth = if truecolor {
            ColorDepth::TrueColor
        } else if lookup("TERM").is_some_and(|t| t.contains("256color")) {
            ColorDepth::Ansi256
        } else {
            ColorDepth::Ansi16
        };

        let caps = Self { kind, unicode, truecolor, mouse: kind.supports_mouse(), color_depth };
        tracing::debug!(
            kind = kind.name(),
            unicode,
            truecolor,
            mouse = caps.mouse,
            "terminal capabilities detected"
        );
        caps
    }
}

fn detect_unicode(lookup: &impl Fn(&str) -> Option<String>) -> bool {
    match lookup(UNICODE_OVERRIDE_VAR).as_deref().map(str::trim) {
        Some("1" | "true") => return true,
        Some("0" | "false") => return false,
        _ => {}
    }

    // LC_ALL takes precedence over LANG
    lookup("LC_ALL")
        .filter(|v| !v.is_empty())
        .or_else(|| lookup("LANG"))
        .is_some_and(|locale| {
            let locale = locale.to_ascii_lowercase();
            locale.contains("utf-8") || locale.contains("utf8")
        })
}

fn detect_truecolor(kind: TerminalKind, lookup: &impl Fn(&str) -> Option<String>) -> bool {
    let colorterm = lookup("COLORTERM");
    let announced = matches!(colorterm.as_deref(), Some("truecolor" | "24bit"));

    match kind {
        TerminalKind::WindowsTerminal
        | TerminalKind::ITerm2
        | TerminalKind::Gnome
        | TerminalKind::Konsole => true,
        _ => announced,
    }
}
