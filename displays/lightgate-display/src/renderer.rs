//! View renderer
//!
//! Turns a timer [`View`] into screen lines. Rendering is pure text work
//! and cheap enough to run on every controller tick; the resulting screen
//! is only marked dirty when its content changed.

use core::fmt::Write;

use heapless::String;
use lightgate_core::run::SplitTime;
use lightgate_core::traits::View;

use crate::format::format_seconds;
use crate::screen::{Screen, TextLine, LINE_LEN};

/// Split rows that fit under the TIMES header
const TIMES_ROWS: usize = 5;

/// Width of one entry when splits are shown in two columns
const COLUMN_WIDTH: usize = 10;

/// Builds screens from views and remembers the last one
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Render `view`; the returned screen is dirty only if it changed
    pub fn render(&mut self, view: &View<'_>) -> &Screen {
        let next = build(view);
        if next != self.screen {
            self.screen = next;
            self.screen.mark_dirty();
        }
        &self.screen
    }

    /// The screen has been handed to the display
    pub fn mark_clean(&mut self) {
        self.screen.mark_clean();
    }
}

fn build(view: &View<'_>) -> Screen {
    let mut screen = Screen::new();
    match view {
        View::Ready => {
            screen.push(TextLine::large(view.state().title()).with_rule());
            screen.push(TextLine::small("Waiting for start"));
        }
        View::Setup { beam_clear } => {
            screen.push(TextLine::large("SETUP").with_rule());
            screen.push(TextLine::small("The LED shows whether"));
            screen.push(TextLine::small("the gate is aligned."));
            screen.push(TextLine::small(if *beam_clear {
                "Beam: clear"
            } else {
                "Beam: BLOCKED"
            }));
        }
        View::Measuring { elapsed_ms } => {
            screen.push(TextLine::large(view.state().title()).with_rule());
            screen.push(TextLine::large(&format_seconds(*elapsed_ms)));
        }
        View::Times { splits, overflowed } => {
            screen.push(TextLine::small(view.state().title()).with_rule());

            let mut rows = TIMES_ROWS;
            if *overflowed > 0 {
                let mut note: String<LINE_LEN> = String::new();
                let _ = write!(note, "+{} lost", overflowed);
                screen.push(TextLine::small(&note));
                rows -= 1;
            }

            if splits.is_empty() {
                screen.push(TextLine::small("No crossings"));
            } else if splits.len() <= rows {
                for (i, split) in splits.iter().enumerate() {
                    screen.push(TextLine::small(&entry(i + 1, *split)));
                }
            } else {
                push_two_columns(&mut screen, splits);
            }
        }
    }
    screen
}

/// Column-major: the left column holds the first half
fn push_two_columns(screen: &mut Screen, splits: &[SplitTime]) {
    let rows = splits.len().div_ceil(2);
    for row in 0..rows {
        let mut line: String<LINE_LEN> = String::new();
        let left = entry(row + 1, splits[row]);
        match splits.get(row + rows) {
            Some(right) => {
                let _ = write!(
                    line,
                    "{:<width$} {}",
                    left.as_str(),
                    entry(row + rows + 1, *right).as_str(),
                    width = COLUMN_WIDTH
                );
            }
            None => {
                let _ = line.push_str(&left);
            }
        }
        screen.push(TextLine::small(&line));
    }
}

/// `"1.  0.500"`
fn entry(ordinal: usize, split: SplitTime) -> String<LINE_LEN> {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}. {:>6}",
        ordinal,
        format_seconds(split.as_millis()).as_str()
    );
    out
}
