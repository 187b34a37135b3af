pub mod board;
pub mod card;
pub mod connection;
pub mod exchange;
pub mod group;
pub mod image;
pub mod scene;
pub mod tab;
