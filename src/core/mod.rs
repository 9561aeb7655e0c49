pub mod download;
pub mod inspect;
pub mod instructions;
pub mod menu;
pub mod synth;
pub mod tools;
