//! Interactive exploration session over the mansion tree.
//!
//! The state machine (`Explorer`) is pure and synchronous; the REPL
//! (`run_session`) layers line-oriented stdin/stdout on top of it and is
//! generic over its reader/writer so tests can drive it with buffers.

use std::io::{BufRead, Write};

use colored::Colorize;
use generational_arena::Index;
use tracing::instrument;

use crate::arena::{Room, RoomArena};
use crate::errors::{QuestError, QuestResult};

/// One move the player can ask for: `e` left, `d` right, `s` quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Quit,
}

impl Move {
    /// Parses the first non-whitespace character of a line, case-insensitive.
    pub fn parse(input: &str) -> Option<Move> {
        match input.trim_start().chars().next()?.to_ascii_lowercase() {
            'e' => Some(Move::Left),
            'd' => Some(Move::Right),
            's' => Some(Move::Quit),
            _ => None,
        }
    }
}

/// Where one session stands. `Exited` and `Finished` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Standing in a non-leaf room, waiting for a move
    AtRoom(Index),
    /// The player quit
    Exited,
    /// A leaf room was reached
    Finished(Index),
}

/// What a single step did, for rendering feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved into the room at this index
    Moved(Index),
    /// The requested direction has no room behind it; state unchanged
    Blocked(Move),
    /// Unrecognized input; state unchanged
    Invalid,
    /// The player quit
    Quit,
}

/// Drives one exploration session from the root to a terminal state.
///
/// Holds a shared borrow of the arena for its whole lifetime, so room
/// indices can never go stale mid-session.
#[derive(Debug)]
pub struct Explorer<'a> {
    rooms: &'a RoomArena,
    state: SessionState,
}

impl<'a> Explorer<'a> {
    /// Starts a session at `root`. Fails if the index is not a live room.
    pub fn new(rooms: &'a RoomArena, root: Index) -> QuestResult<Self> {
        if rooms.room(root).is_none() {
            return Err(QuestError::RoomNotFound);
        }
        let mut explorer = Self {
            rooms,
            state: SessionState::AtRoom(root),
        };
        explorer.settle();
        Ok(explorer)
    }

    /// A leaf ends the session the moment it is entered, before any input.
    fn settle(&mut self) {
        if let SessionState::AtRoom(idx) = self.state {
            if self.rooms.is_leaf(idx) {
                self.state = SessionState::Finished(idx);
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, SessionState::AtRoom(_))
    }

    /// The room the player stands in, None once the player has quit.
    pub fn current(&self) -> Option<&Room> {
        match self.state {
            SessionState::AtRoom(idx) | SessionState::Finished(idx) => self.rooms.room(idx),
            SessionState::Exited => None,
        }
    }

    /// Moves whose target exists, plus quit. Empty once terminal.
    pub fn available_moves(&self) -> Vec<Move> {
        let SessionState::AtRoom(idx) = self.state else {
            return Vec::new();
        };
        let Some(room) = self.rooms.room(idx) else {
            return Vec::new();
        };
        let mut moves = Vec::with_capacity(3);
        if room.left.is_some() {
            moves.push(Move::Left);
        }
        if room.right.is_some() {
            moves.push(Move::Right);
        }
        moves.push(Move::Quit);
        moves
    }

    /// Applies one line of input. Blocked directions and unrecognized input
    /// are self-transitions, not errors.
    #[instrument(level = "debug", skip(self))]
    pub fn step(&mut self, input: &str) -> Step {
        let SessionState::AtRoom(current) = self.state else {
            return Step::Invalid;
        };
        // Live while we hold the arena borrow
        let Some(room) = self.rooms.room(current) else {
            return Step::Invalid;
        };

        match Move::parse(input) {
            None => Step::Invalid,
            Some(Move::Quit) => {
                self.state = SessionState::Exited;
                Step::Quit
            }
            Some(Move::Left) => self.walk(room.left, Move::Left),
            Some(Move::Right) => self.walk(room.right, Move::Right),
        }
    }

    fn walk(&mut self, next: Option<Index>, mv: Move) -> Step {
        match next {
            Some(next_idx) => {
                self.state = SessionState::AtRoom(next_idx);
                self.settle();
                tracing::debug!(?mv, ?next_idx, "moved");
                Step::Moved(next_idx)
            }
            None => Step::Blocked(mv),
        }
    }
}

/// Runs one interactive session and returns the terminal state.
///
/// Reads one line per prompt from `input`; EOF counts as quitting.
#[instrument(level = "debug", skip_all)]
pub fn run_session<R: BufRead, W: Write>(
    rooms: &RoomArena,
    root: Index,
    input: R,
    out: &mut W,
) -> QuestResult<SessionState> {
    let mut explorer = Explorer::new(rooms, root)?;
    let mut lines = input.lines();

    loop {
        let Some(room) = explorer.current() else { break };
        writeln!(out)?;
        writeln!(out, "Você está na sala: {}", room.name.bold())?;

        if let SessionState::Finished(_) = explorer.state() {
            writeln!(out, "Não há mais caminhos a seguir. Fim da exploração!")?;
            break;
        }

        write_options(rooms, room, out)?;

        let Some(line) = lines.next() else {
            // EOF: same outcome as an explicit quit
            writeln!(out)?;
            writeln!(out, "Você decidiu sair da mansão. Até a próxima investigação!")?;
            explorer.step("s");
            break;
        };

        match explorer.step(&line?) {
            Step::Moved(_) => {}
            Step::Blocked(mv) => {
                let msg = match mv {
                    Move::Left => "Caminho à esquerda inexistente!",
                    _ => "Caminho à direita inexistente!",
                };
                writeln!(out, "{}", msg.yellow())?;
            }
            Step::Invalid => {
                writeln!(out, "{}", "Opção inválida! Tente novamente.".yellow())?;
            }
            Step::Quit => {
                writeln!(out, "Você decidiu sair da mansão. Até a próxima investigação!")?;
                break;
            }
        }
    }

    Ok(explorer.state())
}

/// Prints only the directions whose room exists, plus quit, then the prompt.
fn write_options<W: Write>(rooms: &RoomArena, room: &Room, out: &mut W) -> QuestResult<()> {
    writeln!(out)?;
    writeln!(out, "Escolha o caminho:")?;
    if let Some(left) = room.left.and_then(|idx| rooms.room(idx)) {
        writeln!(out, "  (e) Ir para a esquerda → {}", left.name)?;
    }
    if let Some(right) = room.right.and_then(|idx| rooms.room(idx)) {
        writeln!(out, "  (d) Ir para a direita → {}", right.name)?;
    }
    writeln!(out, "  (s) Sair da exploração")?;
    write!(out, "{} ", "Opção:".cyan())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::builder::build_mansion;

    #[rstest]
    #[case("e", Some(Move::Left))]
    #[case("E", Some(Move::Left))]
    #[case("  d", Some(Move::Right))]
    #[case("D\n", Some(Move::Right))]
    #[case("s", Some(Move::Quit))]
    #[case("S", Some(Move::Quit))]
    #[case("x", None)]
    #[case("", None)]
    #[case("7", None)]
    fn given_input_line_when_parsing_then_move_matches(
        #[case] input: &str,
        #[case] expected: Option<Move>,
    ) {
        assert_eq!(Move::parse(input), expected);
    }

    #[test]
    fn given_leaf_root_when_starting_session_then_it_finishes_immediately() {
        let mut rooms = RoomArena::new();
        let lone = rooms.create_room("Sótão");
        let explorer = Explorer::new(&rooms, lone).unwrap();
        assert_eq!(explorer.state(), SessionState::Finished(lone));
        assert!(explorer.is_terminal());
        assert!(explorer.available_moves().is_empty());
    }

    #[test]
    fn given_released_root_when_starting_session_then_it_fails() {
        let mut rooms = RoomArena::new();
        let root = build_mansion(&mut rooms);
        rooms.release(root);
        assert!(Explorer::new(&rooms, root).is_err());
    }

    #[test]
    fn given_nonleaf_room_when_input_is_invalid_then_state_and_moves_unchanged() {
        let mut rooms = RoomArena::new();
        let root = build_mansion(&mut rooms);
        let mut explorer = Explorer::new(&rooms, root).unwrap();

        let before_state = explorer.state();
        let before_moves = explorer.available_moves();
        assert_eq!(explorer.step("?"), Step::Invalid);
        assert_eq!(explorer.state(), before_state);
        assert_eq!(explorer.available_moves(), before_moves);
    }
}
