//! OpenAPI documentation configuration
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification
//! for the REST API: all bike, community, and health endpoints, their
//! wire schemas, and the bearer-token security scheme. Swagger UI serves
//! the document in development mode only.

use crate::routes::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::services::bike::{BikeRead, BikeWrite, GeoPosition};
use crate::services::community::{CommunityRead, CommunityWrite};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer-token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CBS API",
        description = "HTTP interface for community bike sharing.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer_token" = [])),
    paths(
        crate::routes::bikes::create_bike,
        crate::routes::bikes::list_bikes,
        crate::routes::bikes::get_bike,
        crate::routes::bikes::update_bike,
        crate::routes::bikes::delete_bike,
        crate::routes::bikes::rent_bike,
        crate::routes::bikes::release_bike,
        crate::routes::communities::create_community,
        crate::routes::communities::list_communities,
        crate::routes::communities::get_community,
        crate::routes::health::health_check,
        crate::routes::health::readiness_check,
        crate::routes::health::liveness_check,
    ),
    components(schemas(
        BikeWrite,
        BikeRead,
        GeoPosition,
        CommunityWrite,
        CommunityRead,
        HealthResponse,
        HealthChecks,
        CheckStatus,
    )),
    tags(
        (name = "bikes", description = "Operations on the bike resource"),
        (name = "communities", description = "Operations on communities"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_registers_bike_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/bikes"));
        assert!(paths.contains_key("/api/v1/bikes/{id}"));
        assert!(paths.contains_key("/api/v1/bikes/{id}/rental"));
        assert!(paths.contains_key("/api/v1/communities"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn openapi_document_declares_bearer_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components should be present");
        assert!(components.security_schemes.contains_key("bearer_token"));
    }

    #[test]
    fn openapi_document_registers_wire_schemas() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components should be present");
        assert!(components.schemas.contains_key("BikeWrite"));
        assert!(components.schemas.contains_key("BikeRead"));
        assert!(components.schemas.contains_key("GeoPosition"));
    }
}
