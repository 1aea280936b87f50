//! Presentation of the focused act.
//!
//! [`present`] is the only place colors and texts are derived. It is called
//! after every tick and every gesture, and depends on nothing but the session
//! view, the palette and the current time.

mod menu;
mod title;

pub use menu::{Menu, MenuEntry, MENU_TITLE};
pub use title::{fit_title, BitmapFonts, FittedTitle, Font, FontMetrics};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::format::{clock_label_at, format_duration};
use crate::session::SessionView;

/// Hex colors for the three display conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_normal_bg")]
    pub normal_bg: String,
    #[serde(default = "default_paused_bg")]
    pub paused_bg: String,
    #[serde(default = "default_overrun_bg")]
    pub overrun_bg: String,
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_overrun_fg")]
    pub overrun_fg: String,
    /// Secondary text, and the clock shown for untimed acts.
    #[serde(default = "default_muted_fg")]
    pub muted_fg: String,
}

fn default_normal_bg() -> String {
    "#CCEEFF".into()
}
fn default_paused_bg() -> String {
    "#FFF5BC".into()
}
fn default_overrun_bg() -> String {
    "#FFCCCC".into()
}
fn default_fg() -> String {
    "#000000".into()
}
fn default_overrun_fg() -> String {
    "#F00000".into()
}
fn default_muted_fg() -> String {
    "#222222".into()
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal_bg: default_normal_bg(),
            paused_bg: default_paused_bg(),
            overrun_bg: default_overrun_bg(),
            fg: default_fg(),
            overrun_fg: default_overrun_fg(),
            muted_fg: default_muted_fg(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Normal,
    /// Paused after the act had started.
    Paused,
    /// Expected time exceeded; wins over paused.
    Overrun,
}

/// Icon of the single control-row button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Pause,
    Play,
}

/// A declarative layout request: header, countdown, secondary line, control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub condition: Condition,
    /// Ritual name above the title.
    pub subtitle: String,
    pub title: FittedTitle,
    pub header_bg: String,
    pub header_fg: String,
    /// Countdown, or the clock for untimed acts.
    pub primary: String,
    pub primary_fg: String,
    /// Finish-at time, or elapsed time for untimed acts.
    pub secondary: String,
    pub secondary_fg: String,
    pub control: Control,
}

pub fn present<Tz: TimeZone>(view: &SessionView<'_>, palette: &Palette, now: &DateTime<Tz>) -> Frame {
    let timer = view.timer;
    let started = view.act.time.started.is_some();

    let condition = if timer.is_expired() {
        Condition::Overrun
    } else if timer.is_paused() && started {
        Condition::Paused
    } else {
        Condition::Normal
    };
    let header_bg = match condition {
        Condition::Normal => &palette.normal_bg,
        Condition::Paused => &palette.paused_bg,
        Condition::Overrun => &palette.overrun_bg,
    };

    let (primary, primary_fg, secondary) = if view.act.is_timed() {
        let remaining = view.instance.time.expected as i64 - view.instance.time.actual as i64;
        let fg = if condition == Condition::Overrun {
            &palette.overrun_fg
        } else {
            &palette.fg
        };
        (
            format_duration(timer.counter()),
            fg,
            clock_label_at(now, remaining),
        )
    } else {
        (
            clock_label_at(now, 0),
            &palette.muted_fg,
            format_duration(timer.counter()),
        )
    };

    Frame {
        condition,
        subtitle: view.instance.name.clone(),
        title: view.title.clone(),
        header_bg: header_bg.clone(),
        header_fg: palette.fg.clone(),
        primary,
        primary_fg: primary_fg.clone(),
        secondary,
        secondary_fg: palette.muted_fg.clone(),
        control: if timer.is_paused() {
            Control::Play
        } else {
            Control::Pause
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Swipe;
    use crate::ritual::{ActSpec, LeafAct, RitualCatalog, RitualTemplate};
    use crate::session::{Session, SessionSettings};
    use chrono::{Local, Utc};

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 7, 0, 0).unwrap()
    }

    fn session(acts: &[(&str, u64)]) -> Session {
        let mut catalog = RitualCatalog::new();
        catalog.insert_template(
            "m",
            RitualTemplate {
                name: "Morning".into(),
                acts: acts
                    .iter()
                    .map(|(n, d)| ActSpec::Leaf(LeafAct::new(*n, *d)))
                    .collect(),
            },
        );
        let mut session = Session::new(catalog, SessionSettings::default());
        session.launch("m", Local::now()).unwrap();
        session
    }

    fn frame(session: &Session) -> Frame {
        present(&session.view().unwrap(), &Palette::default(), &clock())
    }

    #[test]
    fn timed_act_shows_countdown_and_finish_time() {
        let s = session(&[("Stretch", 120), ("Tea", 60)]);
        let f = frame(&s);
        assert_eq!(f.condition, Condition::Normal);
        assert_eq!(f.subtitle, "Morning");
        assert_eq!(f.title.text, "Stretch");
        assert_eq!(f.primary, "01:59");
        // 180 expected - 1 actual seconds from 7:00.
        assert_eq!(f.secondary, "7:02 am");
        assert_eq!(f.header_bg, Palette::default().normal_bg);
        assert_eq!(f.control, Control::Pause);
    }

    #[test]
    fn untimed_act_shows_clock_and_elapsed() {
        let s = session(&[("Wake", 0)]);
        let f = frame(&s);
        assert_eq!(f.primary, "7:00 am");
        assert_eq!(f.secondary, "00:01");
        assert_eq!(f.primary_fg, Palette::default().muted_fg);
    }

    #[test]
    fn paused_after_start_uses_paused_colors() {
        let mut s = session(&[("Stretch", 120)]);
        s.toggle_pause(Local::now());
        let f = frame(&s);
        assert_eq!(f.condition, Condition::Paused);
        assert_eq!(f.header_bg, Palette::default().paused_bg);
        assert_eq!(f.control, Control::Play);
    }

    #[test]
    fn overrun_wins_over_pause() {
        let mut s = session(&[("Quick", 1)]);
        assert!(s.timer().is_expired());
        s.tick(Local::now());
        s.toggle_pause(Local::now());
        let f = frame(&s);
        assert_eq!(f.condition, Condition::Overrun);
        assert_eq!(f.header_bg, Palette::default().overrun_bg);
        assert_eq!(f.primary_fg, Palette::default().overrun_fg);
        assert_eq!(f.primary, "00:01");
    }

    #[test]
    fn presentation_is_deterministic() {
        let mut s = session(&[("a", 10), ("b", 10)]);
        s.swipe(Swipe::Left, Local::now());
        assert_eq!(frame(&s), frame(&s));
    }
}
