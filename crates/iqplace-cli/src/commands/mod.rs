pub mod init;
pub mod quiz;
pub mod summary;
pub mod validate;
