// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type.

use thiserror::Error;

/// Configuration errors surfaced while resolving element-derived bounds.
///
/// Everything else that can go wrong during a gesture (an event for another
/// touch, an unmeasurable offset parent, a move that snaps to nothing) is
/// expected and silently skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DraggableError {
    /// A bounds selector matched nothing.
    #[error("bounds selector `{0}` did not match any element")]
    BoundsSelectorNotFound(String),
    /// A bounds selector matched a node that is not an element.
    #[error("bounds selector `{0}` matched a node that is not an element")]
    BoundsNotElement(String),
    /// `parent` bounds on a node with no parent.
    #[error("`parent` bounds requested but the dragged node has no parent")]
    NoParent,
    /// `body` bounds in a document without a body.
    #[error("`body` bounds requested but the document has no body")]
    NoBody,
}
