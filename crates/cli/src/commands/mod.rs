pub mod analyse;
pub mod best;
pub mod explore;
pub mod init;
pub mod run;
pub mod status;
