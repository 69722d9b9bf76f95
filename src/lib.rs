//! Skyterrain library - noise terrain, day/night sky and cloud shell

pub mod camera;
pub mod cli;
pub mod clouds;
pub mod color;
pub mod input;
pub mod mesh;
pub mod params;
pub mod perlin;
pub mod rendering;
pub mod scene;
pub mod sky;
pub mod terrain;
pub mod texture;
