use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// A room in the mansion, i.e. one node of the binary tree.
///
/// The name is fixed at creation; the child links are wired once by the
/// builder and stay read-only during exploration.
#[derive(Debug, Clone)]
pub struct Room {
    /// Display name of the room
    pub name: String,
    /// Index of the left child room, None if no path leads left
    pub left: Option<Index>,
    /// Index of the right child room, None if no path leads right
    pub right: Option<Index>,
}

impl Room {
    /// A room with no children is a leaf and terminal for exploration.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arena-based storage for the mansion's room tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// One arena holds one complete mansion; the live-node count doubles as the
/// allocation counter for release accounting.
#[derive(Debug)]
pub struct RoomArena {
    /// Arena storage for all rooms
    arena: Arena<Room>,
    /// Index of the root room, None before the mansion is built
    root: Option<Index>,
}

impl Default for RoomArena {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Allocates a new room with the given name and no children.
    ///
    /// The first room created in an empty arena becomes the root. Allocation
    /// failure is not recoverable: the global allocator aborts the process.
    #[instrument(level = "trace", skip(self))]
    pub fn create_room(&mut self, name: &str) -> Index {
        let idx = self.arena.insert(Room {
            name: name.to_string(),
            left: None,
            right: None,
        });
        if self.root.is_none() {
            self.root = Some(idx);
        }
        idx
    }

    /// Wires the parent's left/right links to the given (possibly absent)
    /// children. No-op if the parent is absent or stale.
    ///
    /// Does not validate against cycles or re-parenting; the builder is
    /// responsible for wiring a valid tree exactly once.
    #[instrument(level = "trace", skip(self))]
    pub fn connect(&mut self, parent: Option<Index>, left: Option<Index>, right: Option<Index>) {
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.left = left;
                parent.right = right;
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn room(&self, idx: Index) -> Option<&Room> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// True when the room exists and has no children.
    #[instrument(level = "trace", skip(self))]
    pub fn is_leaf(&self, idx: Index) -> bool {
        self.room(idx).is_some_and(Room::is_leaf)
    }

    /// Number of live rooms. This is the allocation counter release
    /// accounting is checked against.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, root: Index) -> PostOrderIterator {
        PostOrderIterator::new(self, root)
    }

    /// Releases every room reachable from `root` in post-order, children
    /// before parent, and returns the number of rooms released.
    ///
    /// Stale indices are skipped, so releasing an already-released subtree
    /// frees nothing instead of corrupting the arena.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, root: Index) -> usize {
        let order: Vec<Index> = self.iter_postorder(root).map(|(idx, _)| idx).collect();
        let mut released = 0;
        for idx in order {
            if self.arena.remove(idx).is_some() {
                released += 1;
            }
        }
        if self.root == Some(root) {
            self.root = None;
        }
        tracing::debug!(released, remaining = self.arena.len(), "released subtree");
        released
    }

    /// Longest root-to-leaf path length, counted in rooms.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        if let Some(room) = self.room(idx) {
            1 + [room.left, room.right]
                .into_iter()
                .flatten()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the names of all leaf rooms, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, idx: Index, leaves: &mut Vec<String>) {
        if let Some(room) = self.room(idx) {
            if room.is_leaf() {
                leaves.push(room.name.clone());
            } else {
                for child in [room.left, room.right].into_iter().flatten() {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }
}

/// Post-order walk over one subtree: left, right, then the room itself.
pub struct PostOrderIterator<'a> {
    arena: &'a RoomArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a RoomArena, root: Index) -> Self {
        Self {
            arena,
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a Room);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(room) = self.arena.room(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    // Right is pushed first so left is released first
                    for child in [room.right, room.left].into_iter().flatten() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, room));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_arena_when_creating_room_then_it_becomes_root() {
        let mut rooms = RoomArena::new();
        let idx = rooms.create_room("Hall de Entrada");
        assert_eq!(rooms.root(), Some(idx));
        assert_eq!(rooms.len(), 1);
        assert!(rooms.is_leaf(idx));
    }

    #[test]
    fn given_absent_parent_when_connecting_then_nothing_changes() {
        let mut rooms = RoomArena::new();
        let child = rooms.create_room("Biblioteca");
        rooms.connect(None, Some(child), None);
        assert!(rooms.is_leaf(child));
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn given_wired_parent_when_connecting_then_children_are_linked() {
        let mut rooms = RoomArena::new();
        let parent = rooms.create_room("Hall de Entrada");
        let left = rooms.create_room("Biblioteca");
        let right = rooms.create_room("Cozinha");
        rooms.connect(Some(parent), Some(left), Some(right));

        let room = rooms.room(parent).unwrap();
        assert_eq!(room.left, Some(left));
        assert_eq!(room.right, Some(right));
        assert!(!rooms.is_leaf(parent));
    }

    #[test]
    fn given_released_subtree_when_releasing_again_then_nothing_is_freed() {
        let mut rooms = RoomArena::new();
        let root = rooms.create_room("Hall de Entrada");
        let left = rooms.create_room("Biblioteca");
        rooms.connect(Some(root), Some(left), None);

        assert_eq!(rooms.release(root), 2);
        assert_eq!(rooms.release(root), 0);
        assert!(rooms.is_empty());
    }
}
