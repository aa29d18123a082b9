use std::fmt;

use thiserror::Error;

/// Adding a vertex failed because the key is already taken.
///
/// The payload that was supposed to be stored is handed back to the caller.
#[derive(Debug, Error, PartialEq)]
#[error("vertex with key {key:?} already exists")]
pub struct DuplicateKeyError<K: fmt::Debug, V = ()> {
    pub key: K,
    pub payload: V,
}

impl<K: fmt::Debug, V> DuplicateKeyError<K, V> {
    pub fn new(key: K, payload: V) -> Self {
        Self { key, payload }
    }

    /// Drops the payload, keeping only the key.
    pub fn into_key(self) -> DuplicateKeyError<K> {
        DuplicateKeyError {
            key: self.key,
            payload: (),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("vertex with key {0:?} does not exist")]
pub struct UnknownVertexError<K: fmt::Debug>(pub K);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("adding edge failed: {kind} (key {key:?})")]
pub struct AddEdgeError<K: fmt::Debug> {
    pub key: K,
    pub kind: AddEdgeErrorKind,
}

impl<K: fmt::Debug> AddEdgeError<K> {
    pub fn new(key: K, kind: AddEdgeErrorKind) -> Self {
        Self { key, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddEdgeErrorKind {
    SourceAbsent,
    TargetAbsent,
}

impl fmt::Display for AddEdgeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AddEdgeErrorKind::SourceAbsent => "source does not exist",
            AddEdgeErrorKind::TargetAbsent => "target does not exist",
        };
        f.write_str(reason)
    }
}

impl<K: fmt::Debug> From<AddEdgeError<K>> for UnknownVertexError<K> {
    fn from(error: AddEdgeError<K>) -> Self {
        UnknownVertexError(error.key)
    }
}
