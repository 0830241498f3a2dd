//! Join operators.

pub mod nested_loop;

pub use nested_loop::{
    nested_loop_with_sharding, nested_loop_without_sharding, sharded_nested_loop,
    unsharded_nested_loop,
};
