use utoipa::{Modify, OpenApi};

use crate::features::map::{dtos as map_dtos, handlers as map_handlers, models as map_models};
use crate::shared::types::{ActionResult, ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Map (public)
        map_handlers::list_markers,
        map_handlers::create_marker,
        map_handlers::search_places,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Map
            map_models::Coordinate,
            map_models::SearchResult,
            map_dtos::NumericInput,
            map_dtos::CreateMapMarkerDto,
            map_dtos::MapMarkerResponseDto,
            map_dtos::SearchResponseDto,
            ApiResponse<Vec<map_dtos::MapMarkerResponseDto>>,
            ApiResponse<map_dtos::SearchResponseDto>,
            ActionResult<map_dtos::MapMarkerResponseDto>,
        )
    ),
    tags(
        (name = "map", description = "Saved map locations and place search (public)"),
    ),
    info(
        title = "VibeTJ Map API",
        version = "0.1.0",
        description = "API documentation for the VibeTJ map lab",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
