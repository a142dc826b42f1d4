pub mod screening_result;
pub mod shape;
