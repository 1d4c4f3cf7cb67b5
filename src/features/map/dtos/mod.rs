mod map_marker_dto;
mod search_dto;

pub use map_marker_dto::{
    CreateMapMarkerDto, CreateMarkerResult, MapMarkerResponseDto, NumericInput,
};
pub use search_dto::{SearchQueryParams, SearchResponseDto};
