pub mod quality_dto;
pub mod screening_dto;
