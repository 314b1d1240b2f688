//! Error types for the reactive layer

use crate::runtime::NodeId;

/// Errors raised by reactive reads and writes
///
/// These indicate a construction bug (reading a page model before it loaded,
/// binding a field lens to an unset cell) and are meant to be propagated, not
/// recovered from.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReactiveError {
	/// The node was read or written through before it ever held a value
	#[error("reactive node {node} has no value yet")]
	NotReady {
		/// Node that was accessed
		node: NodeId,
	},
}
