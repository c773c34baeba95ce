//! Framed JSON command dispatch.
//!
//! This module turns frames from the host into commands, runs them against
//! the [`Session`](crate::session::Session), and frames the replies.
//!
//! ## Protocol
//!
//! Each request frame carries a JSON object naming a method and its
//! arguments:
//!
//! ```json
//! {"method":"read_items","args":["plant/boiler/temp1","bad/path"]}
//! ```
//!
//! Each response frame carries either the result value or an error string.
//! Batch methods report per-item failures inline:
//!
//! ```json
//! [71.5,"error: BadNodeIdUnknown"]
//! ```

mod arguments;
mod batch;
mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::batch::{ITEM_ERROR_PREFIX, run_batch};
pub use self::errors::{DispatchError, ServeError};
pub use self::handler::DispatchLoop;
pub use self::request::Command;
pub use self::response::{Reply, ResponseWriter};
pub use self::router::{Method, MethodRouter};
