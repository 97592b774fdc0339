mod init;
mod search;

pub use init::cmd_init_config;
pub use search::cmd_search;
