//! Spinner animation state.
//!
//! Spinners never advance on their own: the application loop calls
//! [`WidgetTree::tick`](super::WidgetTree::tick) once per iteration and each
//! running spinner moves one frame.

/// Animation styles. Each has a Unicode and an ASCII frame set of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpinnerStyle {
    /// Braille dots / rotating bar.
    #[default]
    Dots,
    /// Rotating line.
    Line,
    /// Quarter-filled circle.
    Circle,
    /// Arrow sweeping around.
    Arrow,
    /// Dot bouncing inside brackets.
    Bounce,
    /// Clock face.
    Clock,
    /// Growing row of dots.
    DotsSimple,
}

const DOTS: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const DOTS_ASCII: [&str; 8] = ["|", "/", "-", "\\", "|", "/", "-", "\\"];
const LINE: [&str; 4] = ["─", "╲", "│", "╱"];
const LINE_ASCII: [&str; 4] = ["-", "\\", "|", "/"];
const CIRCLE: [&str; 4] = ["◐", "◓", "◑", "◒"];
const CIRCLE_ASCII: [&str; 4] = ["O", "o", ".", "o"];
const ARROW: [&str; 4] = ["←", "↑", "→", "↓"];
const ARROW_ASCII: [&str; 4] = ["<", "^", ">", "v"];
const BOUNCE: [&str; 6] = ["[    ]", "[ ●  ]", "[  ● ]", "[   ●]", "[  ● ]", "[ ●  ]"];
const BOUNCE_ASCII: [&str; 6] = ["[    ]", "[ .  ]", "[  . ]", "[   .]", "[  . ]", "[ .  ]"];
const CLOCK: [&str; 4] = ["🕛", "🕒", "🕕", "🕘"];
const CLOCK_ASCII: [&str; 4] = ["|", "/", "-", "\\"];
const DOTS_SIMPLE: [&str; 3] = ["·  ", "·· ", "···"];
const DOTS_SIMPLE_ASCII: [&str; 3] = [".  ", ".. ", "..."];

impl SpinnerStyle {
    /// Frame table for this style.
    pub const fn frames(self, unicode: bool) -> &'static [&'static str] {
        match (self, unicode) {
            (Self::Dots, true) => &DOTS,
            (Self::Dots, false) => &DOTS_ASCII,
            (Self::Line, true) => &LINE,
            (Self::Line, false) => &LINE_ASCII,
            (Self::Circle, true) => &CIRCLE,
            (Self::Circle, false) => &CIRCLE_ASCII,
            (Self::Arrow, true) => &ARROW,
            (Self::Arrow, false) => &ARROW_ASCII,
            (Self::Bounce, true) => &BOUNCE,
            (Self::Bounce, false) => &BOUNCE_ASCII,
            (Self::Clock, true) => &CLOCK,
            (Self::Clock, false) => &CLOCK_ASCII,
            (Self::DotsSimple, true) => &DOTS_SIMPLE,
            (Self::DotsSimple, false) => &DOTS_SIMPLE_ASCII,
        }
    }

    /// Number of frames in either set.
    pub const fn frame_count(self) -> usize {
        self.frames(false).len()
    }
}

/// A spinner's style, current frame, and whether it is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spinner {
    style: SpinnerStyle,
    frame: usize,
    running: bool,
}

impl Spinner {
    /// A stopped spinner on its first frame.
    pub const fn new(style: SpinnerStyle) -> Self {
        Self { style, frame: 0, running: false }
    }

    /// Current style.
    pub const fn style(&self) -> SpinnerStyle {
        self.style
    }

    /// Switch style and rewind to the first frame.
    pub fn set_style(&mut self, style: SpinnerStyle) {
        self.style = style;
        self.frame = 0;
    }

    /// Index of the current frame.
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Whether `tick` advances the animation.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Rewind and start animating.
    pub fn start(&mut self) {
        self.frame = 0;
        self.running = true;
    }

    /// Stop animating. The current frame stays on screen.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one frame if running. Returns whether the frame changed.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frame = (self.frame + 1) % self.style.frame_count();
        true
    }

    /// Glyphs to draw for the current frame.
    pub fn current(&self, unicode: bool) -> &'static str {
        let frames = self.style.frames(unicode);
        frames[self.frame % frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SpinnerStyle; 7] = [
        SpinnerStyle::Dots,
        SpinnerStyle::Line,
        SpinnerStyle::Circle,
        SpinnerStyle::Arrow,
        SpinnerStyle::Bounce,
        SpinnerStyle::Clock,
        SpinnerStyle::DotsSimple,
    ];

    #[test]
    fn test_frame_sets_match_in_length() {
        for style in ALL {
            assert_eq!(style.frames(true).len(), style.frames(false).len(), "{style:?}");
            assert!(style.frames(false).iter().all(|f| f.is_ascii()));
        }
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut spinner = Spinner::new(SpinnerStyle::Line);
        assert!(!spinner.tick());
        assert_eq!(spinner.frame(), 0);

        spinner.start();
        for expected in [1, 2, 3, 0, 1] {
            assert!(spinner.tick());
            assert_eq!(spinner.frame(), expected);
        }

        spinner.stop();
        assert!(!spinner.tick());
        assert_eq!(spinner.frame(), 1);
        assert_eq!(spinner.current(false), "\\");
    }

    #[test]
    fn test_start_rewinds() {
        let mut spinner = Spinner::new(SpinnerStyle::DotsSimple);
        spinner.start();
        spinner.tick();
        spinner.tick();
        assert_eq!(spinner.current(false), "...");
        spinner.start();
        assert_eq!(spinner.frame(), 0);
    }
}
