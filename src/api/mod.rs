//! Interaction with the MOCO API.
//!
//! The `Moco` trait is implemented by `MocoClient`, which talks HTTP to MOCO, and by `TestMoco`,
//! which holds everything in memory so the program can be run top-to-bottom without an account.

mod moco_client;
mod moco_test_client;

pub(crate) use moco_client::MocoClient;
pub(crate) use moco_test_client::TestMoco;
#[cfg(test)]
pub(crate) use moco_test_client::SEED_CATALOG;

use crate::error::Res;
use crate::model::{Activity, Catalog};
use crate::Config;

/// When this environment variable is set and non-empty, `Mode::from_env` returns `Mode::Test`.
const TEST_MODE_ENV: &str = "TIMEW_MOCO_IN_TEST_MODE";

/// Whether we are talking to MOCO or to the in-memory `TestMoco`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Mode {
    #[default]
    Moco,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Moco,
        }
    }
}

/// The two MOCO operations this program needs.
#[async_trait::async_trait]
pub(crate) trait Moco {
    /// The projects, with their tasks, that the user is assigned to.
    async fn assigned_projects(&mut self, active_only: bool) -> Res<Catalog>;

    /// Creates all `activities` in a single bulk request.
    async fn create_activities(&mut self, activities: &[Activity]) -> Res<()>;
}

/// Creates the `Moco` implementation for `mode`.
pub(crate) fn moco(config: &Config, mode: Mode) -> Res<Box<dyn Moco + Send>> {
    match mode {
        Mode::Moco => Ok(Box::new(MocoClient::new(
            config.domain()?,
            config.api_key()?,
        )?)),
        Mode::Test => Ok(Box::new(TestMoco::default())),
    }
}
