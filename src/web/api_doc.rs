use utoipa::OpenApi;

use super::api::passes::{ApiResponse, Message, RequestEcho};
use crate::predict::PassPrediction;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::passes::iss_pass),
    components(schemas(ApiResponse, Message, RequestEcho, PassPrediction)),
    info(
        title = "ISS Pass API",
        description = "Naive estimates of upcoming ISS passes over a ground location",
        version = "0.1.0"
    ),
    tags(
        (name = "passes", description = "Pass estimation")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_pass_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/iss-pass"));
        let schemas = doc.components.unwrap().schemas;
        assert!(schemas.contains_key("ApiResponse"));
        assert!(schemas.contains_key("PassPrediction"));
    }
}
