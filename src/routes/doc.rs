use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        dashboard::{DashboardStats, RecentOrder, StatusCount},
        masters::MasterData,
        notes::AddNoteRequest,
        orders::{
            CreateOrderRequest, OrderDetail, OrderList, UpdateOrderRequest,
            UpdatePriorityRequest, UpdateStatusRequest,
        },
        public::PublicOrder,
    },
    models::{Note, OrderSummary, Priority, Status, User},
    response::{ApiResponse, Meta},
    routes::{auth, dashboard, health, orders, public},
    timeline::{Timeline, TimelineStage},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        orders::list_orders,
        orders::search_orders,
        orders::get_master_data,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::update_status,
        orders::update_priority,
        orders::delete_order,
        orders::add_note,
        orders::delete_note,
        dashboard::stats,
        public::track_order
    ),
    components(
        schemas(
            User,
            Status,
            Priority,
            OrderSummary,
            Note,
            MasterData,
            CreateOrderRequest,
            UpdateOrderRequest,
            UpdateStatusRequest,
            UpdatePriorityRequest,
            AddNoteRequest,
            OrderList,
            OrderDetail,
            PublicOrder,
            Timeline,
            TimelineStage,
            DashboardStats,
            StatusCount,
            RecentOrder,
            Meta,
            ApiResponse<OrderSummary>,
            ApiResponse<OrderList>,
            ApiResponse<OrderDetail>,
            ApiResponse<MasterData>,
            ApiResponse<PublicOrder>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Staff authentication"),
        (name = "Orders", description = "Service order management"),
        (name = "Notes", description = "Order note log"),
        (name = "Dashboard", description = "Workshop overview"),
        (name = "Public", description = "Anonymous order tracking"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
