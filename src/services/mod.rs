//! Services behind the console.
//!
//! - `gateway`: seams to the remote user collection
//! - `http_gateway`: REST implementation of those seams
//! - `list_controller`: paging, search, editing and deletion state
//! - `search`: the client-side search predicate
//! - `session`: the bearer-token session and its storage

pub mod gateway;
pub mod http_gateway;
pub mod list_controller;
pub mod search;
pub mod session;

pub use gateway::{AuthGateway, GatewayError, GatewayResult, RecordGateway};
#[cfg(test)]
pub use gateway::{MockAuthGateway, MockRecordGateway};
pub use http_gateway::{HttpOptions, HttpRecordGateway};
pub use list_controller::{ListController, PageDelta, ReadModel};
pub use session::{
    KeyringTokenStore, MemoryTokenStore, Session, SessionError, SessionGuard, TokenSource,
    TokenStore,
};
