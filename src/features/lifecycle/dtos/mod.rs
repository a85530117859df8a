pub mod lifecycle_dto;

pub use lifecycle_dto::{IssueTypeMetaDto, LifecycleMetaDto, StatusMetaDto};
