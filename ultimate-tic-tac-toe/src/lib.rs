pub mod agents;
pub mod bitmagic;
pub mod board;
pub mod consts;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod rng;
pub mod search;
pub mod tree;
pub mod types;
pub mod util;
