use log::debug;
use std::io::{self, BufRead, Write};

use crate::board::cozy::{color_char, parse_move, parse_square};
use crate::board::GameStatus;
use crate::config::SessionConfig;
use crate::error::PositionError;
use crate::scheduler::SessionHandle;
use crate::session::{ClickOutcome, OpponentOutcome};
use crate::view::grid2d::{self, Grid};
use crate::view::scene3d::Scene;
use crate::view::ViewMode;

/// Line-oriented front end: each command maps to one UI event.
pub struct Console {
    handle: SessionHandle,
}

impl Console {
    pub fn new(cfg: &SessionConfig) -> Result<Self, PositionError> {
        Ok(Self { handle: SessionHandle::from_config(cfg)? })
    }

    fn cmd_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "commands: <from><to>[q|r|b|n], move <from> <to>, click <sq>, pick <x> <y> <z>,")?;
        writeln!(out, "          view [2d|3d], board, scene, dests, fen, status, new [fen], quit")
    }

    fn cmd_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let text = self.handle.with(|s| match s.view() {
            ViewMode::TwoD => Grid::from_position(s.position()).render_text(s.selection()),
            ViewMode::ThreeD => {
                let scene = Scene::from_position(s.position(), s.selection());
                let mut t = String::new();
                for e in &scene.pieces {
                    t.push_str(&format!("{} {} [{:.1}, {:.1}, {:.1}] x{:.1}\n", e.key, e.square, e.position[0], e.position[1], e.position[2], e.scale));
                }
                t
            }
        });
        write!(out, "{text}")?;
        let (stm, thinking) = self.handle.with(|s| (s.side_to_move(), s.is_pending()));
        writeln!(out, "{} to move{}", color_char(stm), if thinking { " (opponent thinking...)" } else { "" })
    }

    fn cmd_scene<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let json = self.handle.with(|s| Scene::from_position(s.position(), s.selection()).to_json());
        match json {
            Ok(j) => writeln!(out, "{j}"),
            Err(e) => writeln!(out, "scene error: {e}"),
        }
    }

    fn cmd_dests<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let ds = self.handle.with(|s| grid2d::dests(s.position()));
        for (from, tos) in ds {
            let tos: Vec<String> = tos.iter().map(|t| t.to_string()).collect();
            writeln!(out, "{from}: {}", tos.join(" "))?;
        }
        Ok(())
    }

    fn cmd_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let status = self.handle.with(|s| s.status());
        match status {
            GameStatus::Ongoing => writeln!(out, "ongoing"),
            GameStatus::Checkmate { winner } => writeln!(out, "checkmate, {} wins", color_char(winner)),
            GameStatus::Stalemate => writeln!(out, "stalemate"),
            GameStatus::Draw => writeln!(out, "draw"),
        }
    }

    fn cmd_view<W: Write>(&mut self, args: &str, out: &mut W) -> io::Result<()> {
        let next = if args.trim().is_empty() {
            Ok(self.handle.with(|s| s.view().toggled()))
        } else {
            args.parse::<ViewMode>()
        };
        match next {
            Ok(v) => { self.handle.with_mut(|s| s.set_view(v)); self.cmd_board(out) }
            Err(e) => writeln!(out, "{e}"),
        }
    }

    fn cmd_new<W: Write>(&mut self, args: &str, out: &mut W) -> io::Result<()> {
        let fen = args.trim();
        match self.handle.new_game(if fen.is_empty() { None } else { Some(fen) }) {
            Ok(()) => { self.cmd_board(out)?; self.after_player(out, false) }
            Err(e) => writeln!(out, "{e}"),
        }
    }

    fn cmd_click<W: Write>(&mut self, sq: &str, out: &mut W) -> io::Result<()> {
        let sq = match parse_square(sq) { Ok(s) => s, Err(e) => return writeln!(out, "{e}") };
        match self.handle.click(sq) {
            ClickOutcome::Selected { origin, dests } => {
                let ds: Vec<String> = dests.iter().map(|d| d.to_string()).collect();
                writeln!(out, "selected {origin}: {}", ds.join(" "))?;
            }
            ClickOutcome::Deselected => writeln!(out, "deselected")?,
            ClickOutcome::Moved(lm) => { writeln!(out, "you play {lm}")?; return self.after_player(out, true); }
            ClickOutcome::Rejected(e) => writeln!(out, "rejected: {e}")?,
            ClickOutcome::Ignored => {}
        }
        self.cmd_board(out)
    }

    fn cmd_pick<W: Write>(&mut self, args: &str, out: &mut W) -> io::Result<()> {
        let coords: Vec<f32> = args.split_whitespace().filter_map(|t| t.parse().ok()).collect();
        if coords.len() != 3 { return writeln!(out, "pick needs x y z"); }
        let sq = self.handle.with(|s| Scene::from_position(s.position(), s.selection()).pick([coords[0], coords[1], coords[2]]));
        match sq {
            Some(sq) => self.cmd_click(&sq.to_string(), out),
            None => writeln!(out, "off the board"),
        }
    }

    fn cmd_move<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<()> {
        let req = match parse_move(text) { Ok(r) => r, Err(e) => return writeln!(out, "{e}") };
        match self.handle.player_move(req) {
            Ok(lm) => { writeln!(out, "you play {lm}")?; self.after_player(out, true) }
            Err(e) => writeln!(out, "rejected: {e}"),
        }
    }

    /// Waits out the opponent's reply (if one is due) and reports it.
    fn after_player<W: Write>(&mut self, out: &mut W, scheduled: bool) -> io::Result<()> {
        if !scheduled && !self.handle.kick_opponent() { return Ok(()); }
        writeln!(out, "opponent thinking...")?;
        out.flush()?;
        match self.handle.wait_opponent() {
            Some(OpponentOutcome::Moved(lm)) => writeln!(out, "opponent plays {lm}")?,
            Some(OpponentOutcome::NoLegalMoves(_)) => writeln!(out, "opponent has no legal moves")?,
            Some(OpponentOutcome::GameOver(_)) => {}
            Some(OpponentOutcome::Cancelled) | Some(OpponentOutcome::NotOpponentsTurn) | None => {}
        }
        if self.handle.with(|s| s.is_over()) { self.cmd_status(out)?; }
        self.cmd_board(out)
    }

    /// Returns false when the loop should stop.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() { return Ok(true); }
        debug!("console: {line}");
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "quit" | "exit" => return Ok(false),
            "help" => self.cmd_help(out)?,
            "board" => self.cmd_board(out)?,
            "scene" => self.cmd_scene(out)?,
            "dests" => self.cmd_dests(out)?,
            "fen" => { let fen = self.handle.with(|s| s.fen()); writeln!(out, "{fen}")?; }
            "status" => self.cmd_status(out)?,
            "view" => self.cmd_view(rest, out)?,
            "new" => self.cmd_new(rest, out)?,
            "click" => self.cmd_click(rest, out)?,
            "pick" => self.cmd_pick(rest, out)?,
            "move" => self.cmd_move(rest, out)?,
            _ => self.cmd_move(line, out)?,
        }
        Ok(true)
    }

    /// Opens the game (letting the opponent start when the player is black) and reads commands.
    pub fn run_loop<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        self.cmd_board(out)?;
        self.after_player(out, false)?;
        for line in input.lines() {
            let line = match line { Ok(s) => s, Err(_) => break };
            if !self.handle_line(&line, out)? { break; }
            out.flush()?;
        }
        Ok(())
    }
}
