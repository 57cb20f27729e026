pub mod camera;
pub mod capture;
pub mod combat;
pub mod enemies;
pub mod level;
pub mod menu;
pub mod movement;
pub mod victory;
