//! Shared plumbing for the workspace: logging setup and small wire types.

pub mod types;

pub mod utils {
    pub mod logging;
}
