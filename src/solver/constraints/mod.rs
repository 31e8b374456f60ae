pub mod all_different;
pub mod bool_sum;
pub mod boolean_or;
pub mod element;
pub mod equal;
pub mod reified;
