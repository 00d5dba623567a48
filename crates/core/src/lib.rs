//! Run AzerothCore GM commands locally or on a fleet of game-server hosts.
//!
//! # Layers
//!
//! - [`request_like`]: caller input ([`RequestLike`]) to an ordered batch
//! - [`executor`]: one request against the local SOAP port ([`LocalExecutor`])
//! - [`batch`]: sequential batches with a fail-fast or best-effort policy
//! - [`dispatch`]: batches sent to a remote host as a job ([`RemoteDispatcher`])
//! - [`canned`]: named GM operations built on the dispatcher
//!
//! # Example
//!
//! ```ignore
//! use acsoap::{ConnectionDefaults, LocalExecutor, normalize, run_batch};
//!
//! let executor = LocalExecutor::new(ConnectionDefaults::default())?;
//! let requests = normalize(vec![".server info", ".gm list"].into(), None, None, None).await?;
//! for outcome in run_batch(&executor, &requests, true).await? {
//!     println!("{}", outcome.message);
//! }
//! ```

pub mod batch;
pub mod canned;
pub mod dispatch;
mod error;
pub mod executor;
pub mod request_like;
pub mod testing;

pub use acsoap_protocol::{ConnectionDefaults, ProtocolOutcome, ProtocolRequest};
pub use acsoap_runtime::{BlobStore, BlobUri, HostResolver, JobHandle, JobRunner};
pub use batch::{BatchOutput, OutputSink, run_batch, run_batch_into};
pub use canned::{CannedCommands, GmAccount, OnlinePlayers, ServerStatus, count_online_players};
pub use dispatch::{DispatchMode, DispatchOptions, DispatchResult, PollOptions, RemoteDispatcher};
pub use error::{Error, Result};
pub use executor::{Execute, LocalExecutor};
pub use request_like::{RequestLike, normalize};
