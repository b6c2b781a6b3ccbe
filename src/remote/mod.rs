//! Remote control over the local network.

mod server;

pub use server::{
    connection_url, update_status, RemoteServer, RemoteStatus, SharedState, REMOTE_PORT,
};
