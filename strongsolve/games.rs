//! Ready-made [`Game`](crate::game::Game) implementations.

pub mod subtraction;
