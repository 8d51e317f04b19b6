use thiserror::Error;

/// A call that did not complete at the transport level.
///
/// Distinct from a logical `false` returned by a completed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
	/// The remote process died.
	#[error("dead object")]
	DeadObject,

	/// The transaction could not be delivered or answered.
	#[error("transaction failed: {0}")]
	FailedTransaction(String),

	/// Raw transport status code.
	#[error("transport status {0}")]
	Status(i32),
}

/// Result of a call crossing the transport.
pub type TransportResult<T> = Result<T, TransportError>;
