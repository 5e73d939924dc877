pub mod bootstrap;
pub mod migrate;
