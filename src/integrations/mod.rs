//! External service integrations.

pub mod cep_client {
    pub use crate::cep_client::*;
}
