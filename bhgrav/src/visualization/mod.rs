pub mod tree_dump;
