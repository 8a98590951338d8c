use anyhow::Result;
use tracing::{info, warn};

use auth_cell::services::UsersService;
use service_catalog_cell::models::CreateServiceRequest;
use service_catalog_cell::services::CatalogService;
use shared_config::AppConfig;
use shared_utils::jwt::create_token;
use staff_cell::models::CreateStaffRequest;
use staff_cell::services::StaffService;

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo123";
const DEMO_NAME: &str = "Demo User";

/// Seeds the demo account and its catalog on startup. Safe to run on every
/// boot: existing rows are matched by email or name and left alone.
pub async fn run(config: &AppConfig) {
    if let Err(e) = seed_demo_data(config).await {
        warn!("Demo data seeding failed: {}", e);
    }
}

async fn seed_demo_data(config: &AppConfig) -> Result<()> {
    let users = UsersService::new(config);

    let user = match users.find_by_email(DEMO_EMAIL).await? {
        Some(user) => {
            info!("Demo user already exists");
            user
        }
        None => {
            info!("Seeding demo user: {}", DEMO_EMAIL);
            users
                .create_user(DEMO_EMAIL, DEMO_PASSWORD, DEMO_NAME, "admin")
                .await?
        }
    };

    let user_id = user.id.to_string();
    let token = create_token(
        &user_id,
        &user.email,
        &user.role,
        &config.supabase_jwt_secret,
        1,
    )
    .map_err(anyhow::Error::msg)?;

    seed_demo_services(config, &user_id, &token).await?;
    seed_demo_staff(config, &user_id, &token).await?;

    Ok(())
}

async fn seed_demo_services(config: &AppConfig, user_id: &str, token: &str) -> Result<()> {
    let catalog = CatalogService::new(config);

    let demo_services = [
        ("General Consultation", 30, "General"),
        ("Specialist Consultation", 60, "Specialist"),
        ("Quick Check-up", 15, "General"),
    ];

    let existing = catalog.find_all(user_id, token).await?;
    let existing_names: Vec<&str> = existing.iter().map(|s| s.name.as_str()).collect();

    for (name, duration, staff_type) in demo_services {
        if !existing_names.contains(&name) {
            info!("Seeding service: {}", name);
            catalog
                .create(
                    CreateServiceRequest {
                        name: name.to_string(),
                        duration,
                        required_staff_type: staff_type.to_string(),
                    },
                    user_id,
                    token,
                )
                .await?;
        }
    }

    Ok(())
}

async fn seed_demo_staff(config: &AppConfig, user_id: &str, token: &str) -> Result<()> {
    let staff_service = StaffService::new(config);

    let demo_staff = [
        ("Dr. John Doe", "General", 5),
        ("Dr. Jane Smith", "Specialist", 3),
        ("Nurse Alice", "General", 8),
    ];

    let existing = staff_service.find_all(user_id, token).await?;
    let existing_names: Vec<&str> = existing.iter().map(|s| s.name.as_str()).collect();

    for (name, service_type, daily_capacity) in demo_staff {
        if !existing_names.contains(&name) {
            info!("Seeding staff: {}", name);
            staff_service
                .create(
                    CreateStaffRequest {
                        name: name.to_string(),
                        service_type: service_type.to_string(),
                        daily_capacity: Some(daily_capacity),
                        availability_status: None,
                    },
                    user_id,
                    token,
                )
                .await?;
        }
    }

    Ok(())
}
