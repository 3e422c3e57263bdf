pub mod generate;
pub mod init;
pub mod inspect;
pub mod trace;
