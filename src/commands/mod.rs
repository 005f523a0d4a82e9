pub mod explain;
pub mod init;

pub use explain::{handle_explain, ExplainConfig};
pub use init::init_config;
