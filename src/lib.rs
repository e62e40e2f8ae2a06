pub mod arena;
pub mod builder;
pub mod cli;
pub mod errors;
pub mod exitcode;
pub mod explorer;
pub mod util;

use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::instrument;

use crate::arena::RoomArena;
use crate::builder::build_mansion;
use crate::errors::QuestResult;
use crate::explorer::{run_session, SessionState};

/// Builds the mansion, runs one interactive session, and releases the tree.
///
/// Generic over the reader/writer so tests can run full games against
/// in-memory buffers; `main` passes locked stdin/stdout.
#[instrument(level = "debug", skip_all)]
pub fn play(input: impl BufRead, out: &mut impl Write) -> QuestResult<SessionState> {
    let mut rooms = RoomArena::new();
    let root = build_mansion(&mut rooms);

    writeln!(out, "{}", "=============================================".cyan())?;
    writeln!(out, "{}", "Bem-vindo(a) ao Detective Quest!".cyan().bold())?;
    writeln!(out, "Explore a mansão e descubra o mistério oculto.")?;
    writeln!(out, "{}", "=============================================".cyan())?;

    let outcome = run_session(&rooms, root, input, out)?;

    let released = rooms.release(root);
    tracing::debug!(released, remaining = rooms.len(), "mansion torn down");

    writeln!(out)?;
    writeln!(out, "Exploração encerrada. Obrigado por jogar!")?;
    Ok(outcome)
}
