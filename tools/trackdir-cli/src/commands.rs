pub mod apply;
pub mod info;
pub mod init;
pub mod validate;
