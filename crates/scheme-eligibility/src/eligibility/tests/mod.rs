mod common;
mod strategies;
