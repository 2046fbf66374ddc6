//! CLI command implementations

pub mod directory;
pub mod list;
pub mod pay;
pub mod resolve;
pub mod status;

use openpay_lib::directory::FileAliasDirectory;
use openpay_lib::OpenpayConfig;

/// Open the directory file named by the configuration
pub fn open_directory(config: &OpenpayConfig) -> FileAliasDirectory {
    FileAliasDirectory::new(&config.directory_path)
}
