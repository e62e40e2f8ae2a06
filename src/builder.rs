use generational_arena::Index;
use tracing::instrument;

use crate::arena::RoomArena;

/// The seven room names of the mansion, in creation order.
pub const ROOM_NAMES: [&str; 7] = [
    "Hall de Entrada",
    "Biblioteca",
    "Cozinha",
    "Sala de Jantar",
    "Jardim",
    "Sótão",
    "Porão",
];

/// Builds the fixed mansion map and returns the root index.
///
/// The topology never varies:
///
/// ```text
///                 [Hall de Entrada]
///                   /            \
///         [Biblioteca]          [Cozinha]
///           /      \             /      \
///    [Sótão]  [Sala de Jantar] [Jardim] [Porão]
/// ```
#[instrument(level = "debug", skip(rooms))]
pub fn build_mansion(rooms: &mut RoomArena) -> Index {
    let [hall, biblioteca, cozinha, sala_jantar, jardim, sotao, porao] =
        ROOM_NAMES.map(|name| rooms.create_room(name));

    rooms.connect(Some(hall), Some(biblioteca), Some(cozinha));
    rooms.connect(Some(biblioteca), Some(sotao), Some(sala_jantar));
    rooms.connect(Some(cozinha), Some(jardim), Some(porao));

    tracing::debug!(rooms = rooms.len(), "mansion built");
    hall
}
