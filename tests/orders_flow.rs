use axum_workshop_api::{
    db::{DbPool, create_pool},
    dto::notes::AddNoteRequest,
    dto::orders::{CreateOrderRequest, OrderListQuery, UpdateOrderRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::{master_service, note_service, order_service},
};
use chrono::NaiveDate;
use uuid::Uuid;

// Integration flow: admin creates an order, hits the duplicate guard, edits
// fields, moves it through statuses, works the note log, and the customer
// looks it up anonymously.
#[tokio::test]
async fn order_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let pool = setup_pool(&database_url).await?;
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };

    // Registry seeded by migrations: four stages in canonical order.
    let masters = master_service::get_master_data(&pool).await?.data.unwrap();
    assert_eq!(masters.statuses.len(), 4);
    assert_eq!(masters.statuses[0].name, "En Diagnóstico");
    assert_eq!(masters.statuses[3].name, "Pieza lista para entrega");
    assert_eq!(masters.priorities[0].name, "Alta");

    // Create with registry defaults.
    let created = order_service::create_order(&pool, &admin, request("UJ-2026-100"))
        .await?
        .data
        .unwrap();
    assert_eq!(created.status_name, "En Diagnóstico");
    assert_eq!(created.priority_name, "Media");
    assert!(!created.time_since_created.is_empty());

    // Duplicate order number is a conflict and leaves the first record alone.
    let duplicate = order_service::create_order(&pool, &admin, request("UJ-2026-100")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    let detail = order_service::get_order(&pool, &admin, created.id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.order.client_name, "María Rodríguez");

    // Estimated delivery before reception is rejected with a field violation.
    let mut bad = request("UJ-2026-101");
    bad.received_date = Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
    bad.estimated_delivery = Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    match order_service::create_order(&pool, &admin, bad).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains_key("estimated_delivery"))
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // Field edit leaves status and order number alone.
    let updated = order_service::update_order_fields(
        &pool,
        &admin,
        created.id,
        UpdateOrderRequest {
            client_name: Some("María R. de la Torre".into()),
            client_phone: None,
            client_email: None,
            device_type: None,
            device_brand: None,
            device_model: None,
            serial_number: None,
            description: Some("Limpieza adicional del brazalete".into()),
            estimated_delivery: Some(NaiveDate::from_ymd_opt(2027, 1, 20).unwrap()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.client_name, "María R. de la Torre");
    assert_eq!(updated.order_number, "UJ-2026-100");
    assert_eq!(updated.status_name, "En Diagnóstico");

    // Any-to-any status transition through the registry.
    let en_servicio = masters
        .statuses
        .iter()
        .find(|s| s.name == "En servicio")
        .unwrap();
    let moved = order_service::update_status(&pool, &admin, created.id, en_servicio.id)
        .await?
        .data
        .unwrap();
    assert_eq!(moved.status_name, "En servicio");

    // A status id outside the registry is refused.
    let bogus = order_service::update_status(&pool, &admin, created.id, Uuid::new_v4()).await;
    assert!(matches!(bogus, Err(AppError::Validation(_))));

    // Priority transition.
    let alta = masters.priorities.iter().find(|p| p.name == "Alta").unwrap();
    let urgent = order_service::update_priority(&pool, &admin, created.id, alta.id)
        .await?
        .data
        .unwrap();
    assert_eq!(urgent.priority_name, "Alta");

    // Note log: append, reject empty, delete exactly once.
    let note = note_service::add_note(
        &pool,
        &admin,
        created.id,
        AddNoteRequest {
            description: "Pieza requiere batería especial".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!note.created_at_display.is_empty());

    let second = note_service::add_note(
        &pool,
        &admin,
        created.id,
        AddNoteRequest {
            description: "Cliente aprueba presupuesto".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let empty = note_service::add_note(
        &pool,
        &admin,
        created.id,
        AddNoteRequest {
            description: "   ".into(),
        },
    )
    .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    // Newest first.
    let notes = note_service::fetch_notes(&pool, created.id).await?;
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, second.id);

    note_service::delete_note(&pool, &admin, created.id, note.id).await?;
    let remaining = note_service::fetch_notes(&pool, created.id).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    let gone = note_service::delete_note(&pool, &admin, created.id, note.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    // Anonymous lookup: reduced field set plus the derived timeline.
    let public = order_service::lookup_public(&pool, "UJ-2026-100")
        .await?
        .data
        .unwrap();
    assert_eq!(public.status_name, "En servicio");
    assert_eq!(public.timeline.stages.len(), 4);
    assert!(public.timeline.progress_percent > 0.0);
    assert!(public.timeline.stages[2].completed);
    assert!(!public.timeline.stages[3].completed);
    let missing = order_service::lookup_public(&pool, "UJ-0000-000").await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Non-admin tokens cannot mutate.
    let stranger = AuthUser {
        user_id: Uuid::new_v4(),
        role: "viewer".into(),
    };
    let refused = order_service::delete_order(&pool, &stranger, created.id).await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    // Delete cascades to the note log.
    order_service::delete_order(&pool, &admin, created.id).await?;
    let after = order_service::get_order(&pool, &admin, created.id).await;
    assert!(matches!(after, Err(AppError::NotFound)));
    assert!(note_service::fetch_notes(&pool, created.id).await?.is_empty());

    Ok(())
}

// Server-side search plus the in-memory list filters over a seeded set.
#[tokio::test]
async fn search_and_list_filters() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let pool = setup_pool(&database_url).await?;
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    let masters = master_service::get_master_data(&pool).await?.data.unwrap();
    let alta = masters.priorities.iter().find(|p| p.name == "Alta").unwrap();

    for (number, client, brand) in [
        ("UJ-2026-201", "Roberto Sánchez", "Cartier"),
        ("UJ-2026-202", "Laura Fernández", "Bulgari"),
        ("UJ-2026-203", "Andrés López", "Cartier"),
    ] {
        let mut req = request(number);
        req.client_name = client.into();
        req.device_brand = Some(brand.into());
        order_service::create_order(&pool, &admin, req).await?;
    }
    let listed = order_service::search_orders(&pool, &admin, "UJ-2026-201")
        .await?
        .data
        .unwrap();
    order_service::update_priority(&pool, &admin, listed.items[0].id, alta.id).await?;

    // Case-insensitive substring search against the database.
    let found = order_service::search_orders(&pool, &admin, "cartier")
        .await?
        .data
        .unwrap();
    assert_eq!(found.items.len(), 2);

    // Conjunctive in-memory filters on the list endpoint.
    let filtered = order_service::list_orders(
        &pool,
        &admin,
        OrderListQuery {
            search: Some("cartier".into()),
            status_id: None,
            priority_id: Some(alta.id),
            sort_by: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].order_number, "UJ-2026-201");

    Ok(())
}

async fn setup_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean mutable tables between runs; the registry seed stays.
    sqlx::query("TRUNCATE TABLE notes, orders, audit_logs, users CASCADE")
        .execute(&pool)
        .await?;

    Ok(pool)
}

fn request(order_number: &str) -> CreateOrderRequest {
    CreateOrderRequest {
        order_number: order_number.into(),
        client_name: "María Rodríguez".into(),
        client_phone: Some("+52 123 456 7890".into()),
        client_email: Some("maria@ejemplo.com".into()),
        device_type: "Reloj de pulsera".into(),
        device_brand: Some("Rolex".into()),
        device_model: Some("Datejust 41".into()),
        serial_number: Some("R-78901234".into()),
        description: Some("Cambio de batería y limpieza general".into()),
        status_id: None,
        priority_id: None,
        received_date: None,
        estimated_delivery: None,
    }
}
