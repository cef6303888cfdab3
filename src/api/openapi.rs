//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, items, loans, patrons};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Liber API",
        version = "1.0.0",
        description = "Small library lending system REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Items
        items::list_items,
        items::get_item,
        items::search_item,
        items::create_item,
        // Patrons
        patrons::create_patron,
        patrons::get_patron,
        patrons::get_patron_loans,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::loan_status,
    ),
    components(
        schemas(
            // Items
            crate::models::item::Item,
            crate::models::item::NewItem,
            // Patrons
            crate::models::patron::Patron,
            crate::models::patron::NewPatron,
            // Loans
            loans::LoanRequest,
            loans::LoanResponse,
            loans::LoanStatusResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Catalog item management"),
        (name = "patrons", description = "Patron management"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
