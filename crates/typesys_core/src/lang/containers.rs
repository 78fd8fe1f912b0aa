//! Container kinds accepted by `container-type type=...`.

use super::registry::{self, VocabInfo, vocab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    LinkedList,
    StringList,
    Vector,
    Stack,
    Queue,
    Set,
    Map,
    MultiMap,
    Hash,
    MultiHash,
    Pair,
}

pub const CONTAINERS: &[VocabInfo<ContainerKind>] = &[
    vocab(ContainerKind::List, "list", "Random-access list."),
    vocab(ContainerKind::LinkedList, "linked-list", "Doubly linked list."),
    vocab(ContainerKind::StringList, "string-list", "List of strings."),
    vocab(ContainerKind::Vector, "vector", "Contiguous vector."),
    vocab(ContainerKind::Stack, "stack", "LIFO stack."),
    vocab(ContainerKind::Queue, "queue", "FIFO queue."),
    vocab(ContainerKind::Set, "set", "Hashed set."),
    vocab(ContainerKind::Map, "map", "Ordered map."),
    vocab(ContainerKind::MultiMap, "multi-map", "Ordered map with repeated keys."),
    vocab(ContainerKind::Hash, "hash", "Hashed map."),
    vocab(ContainerKind::MultiHash, "multi-hash", "Hashed map with repeated keys."),
    vocab(ContainerKind::Pair, "pair", "Two-element tuple."),
];

pub fn from_str(s: &str) -> Option<ContainerKind> {
    registry::lookup(CONTAINERS, s)
}

pub fn as_str(kind: ContainerKind) -> &'static str {
    registry::spelling(CONTAINERS, kind)
}
