//! Interactive terminal front end for the device loop.
//!
//! Each stdin line is one input: a gesture word, `drag X Y B`, or a menu
//! choice. Frames are printed as they are drawn.

use std::io::{BufRead, Write};

use clap::Args;
use rituals_core::display::{Condition, Control};
use rituals_core::{
    Command, Config, Device, DragEvent, Frame, Haptics, JsonStore, Menu, Renderer, Swipe,
    SystemClock,
};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Args)]
pub struct RunArgs {
    /// Template id to launch right away
    pub id: Option<String>,
}

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn draw(&mut self, frame: &Frame) {
        let condition = match frame.condition {
            Condition::Normal => "",
            Condition::Paused => " (paused)",
            Condition::Overrun => " (over)",
        };
        let control = match frame.control {
            Control::Pause => "[||]",
            Control::Play => "[>]",
        };
        println!("{}{condition}", frame.subtitle);
        println!("  {}", frame.title.text.replace('\n', "\n  "));
        println!("  {}   {}   {control}", frame.primary, frame.secondary);
    }

    fn clear(&mut self) {
        println!();
    }

    fn message(&mut self, text: &str) {
        println!("{text}");
    }

    fn menu(&mut self, menu: &Menu) {
        println!("== {} ==", menu.title);
        for (i, entry) in menu.entries.iter().enumerate() {
            println!("{:>2}. {}", i + 1, entry.label);
        }
    }
}

struct BellHaptics;

impl Haptics for BellHaptics {
    fn buzz(&mut self) {
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

/// Parse one line of terminal input.
fn parse_command(line: &str, menu: &Menu) -> Option<Command> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let command = match first.to_ascii_lowercase().as_str() {
        "left" | "l" | "next" => Command::Swipe(Swipe::Left),
        "right" | "r" | "back" => Command::Swipe(Swipe::Right),
        "up" | "u" | "skip" => Command::Swipe(Swipe::Up),
        "down" | "d" | "info" => Command::Swipe(Swipe::Down),
        "pause" | "p" | "play" => Command::TogglePause,
        "button" | "b" | "menu" => Command::Button,
        "quit" | "q" | "exit" => Command::Quit,
        "drag" => {
            let x = words.next()?.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            let b = matches!(words.next()?, "1" | "true" | "down");
            Command::Drag(DragEvent::new(x, y, b))
        }
        _ => Command::Launch(menu.select(line)?.id.clone()),
    };
    Some(command)
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = JsonStore::open(&config)?;
    let mut device = Device::new(&config, store, TerminalRenderer, BellHaptics, SystemClock)?;
    let menu = device.session().menu();
    if menu.entries.is_empty() {
        return Err("no rituals found; run `rituals-cli ritual init` first".into());
    }

    let (tx, rx) = mpsc::channel(16);
    if let Some(id) = args.id {
        tx.blocking_send(Command::Launch(id))?;
    }
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line, &menu) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("unrecognized input: {line}"),
            }
        }
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    device = runtime.block_on(device.run(rx));

    // Leaving mid-ritual behaves like the hardware button.
    if device.session().is_ticking() {
        if let Err(e) = device.dispatch(Command::Button) {
            warn!(error = %e, "failed to suspend on exit");
        }
    }
    Ok(())
}
