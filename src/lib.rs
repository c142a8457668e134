pub mod config;
pub mod game;
pub mod games;
pub mod protocol;
pub mod storage;
