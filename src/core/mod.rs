pub mod assets;
pub mod audio;
pub mod canvas;
pub mod coordinator;
pub mod events;
pub mod player;
pub mod timeline;
