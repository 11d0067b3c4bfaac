pub mod check;
pub mod init;
pub mod list;
pub mod pull;
pub mod shot;
