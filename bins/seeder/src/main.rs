//! Database seeder for Strata development and testing.
//!
//! Seeds a super admin, a society admin, one residential society with a
//! building and two flats, and their maintenance head rows.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use strata_db::entities::{buildings, flat_maintenances, flats, societies, users};

/// Super admin ID (consistent for all seeds)
const SUPER_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Society admin ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test society ID (consistent for all seeds)
const SOCIETY_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Test building ID (consistent for all seeds)
const BUILDING_ID: &str = "00000000-0000-0000-0000-000000000020";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = strata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding society...");
    seed_society(&db).await;

    println!("Seeding building and flats...");
    seed_building_and_flats(&db).await;

    println!("Seeding complete!");
}

fn super_admin_id() -> Uuid {
    Uuid::parse_str(SUPER_ADMIN_ID).unwrap()
}

fn admin_id() -> Uuid {
    Uuid::parse_str(ADMIN_ID).unwrap()
}

fn society_id() -> Uuid {
    Uuid::parse_str(SOCIETY_ID).unwrap()
}

fn building_id() -> Uuid {
    Uuid::parse_str(BUILDING_ID).unwrap()
}

/// Seeds the super admin and a society admin.
async fn seed_users(db: &DatabaseConnection) {
    let now = Utc::now().into();
    let seeds = [
        (super_admin_id(), "Platform Admin", "root@strata.dev", "super_admin"),
        (admin_id(), "Society Admin", "admin@strata.dev", "admin"),
    ];

    for (id, name, email, role) in seeds {
        if users::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            println!("  User {email} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role.to_string()),
            created_by: Set(super_admin_id()),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {email}: {e}");
        } else {
            println!("  Created user: {email}");
        }
    }
}

/// Seeds a residential test society.
async fn seed_society(db: &DatabaseConnection) {
    if societies::Entity::find_by_id(society_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test society already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let society = societies::ActiveModel {
        id: Set(society_id()),
        name: Set("Green Meadows".to_string()),
        address: Set("12 Lake View Road".to_string()),
        city: Set("Pune".to_string()),
        state: Set("Maharashtra".to_string()),
        country: Set("India".to_string()),
        society_type: Set("residential".to_string()),
        end_date: Set(None),
        opening_balance: Set(Decimal::new(250_000, 2)),
        created_by: Set(super_admin_id()),
        created_at: Set(now),
        updated_by: Set(None),
        updated_at: Set(now),
        is_deleted: Set(false),
        deleted_at: Set(None),
        deleted_by: Set(None),
    };

    if let Err(e) = society.insert(db).await {
        eprintln!("Failed to insert society: {e}");
    } else {
        println!("  Created society: Green Meadows");
    }
}

/// Seeds one building with two flats and their maintenance head rows.
async fn seed_building_and_flats(db: &DatabaseConnection) {
    let now = Utc::now().into();

    if buildings::Entity::find_by_id(building_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_none()
    {
        let building = buildings::ActiveModel {
            id: Set(building_id()),
            society_id: Set(society_id()),
            name: Set("Tower A".to_string()),
            total_floors: Set(8),
            created_by: Set(admin_id()),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        if let Err(e) = building.insert(db).await {
            eprintln!("Failed to insert building: {e}");
            return;
        }
        println!("  Created building: Tower A");
    } else {
        println!("  Test building already exists, skipping...");
    }

    for (flat_number, floor) in [("A-101", 1), ("A-302", 3)] {
        let flat_id = Uuid::new_v4();
        let flat = flats::ActiveModel {
            id: Set(flat_id),
            building_id: Set(building_id()),
            flat_number: Set(flat_number.to_string()),
            floor_number: Set(floor),
            square_foot: Set(Some(Decimal::new(95_000, 2))),
            is_occupied: Set(false),
            created_by: Set(admin_id()),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        if let Err(e) = flat.insert(db).await {
            eprintln!("Failed to insert flat {flat_number}: {e}");
            continue;
        }

        let maintenance = flat_maintenances::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(society_id()),
            flat_id: Set(Some(flat_id)),
            housing_unit_id: Set(None),
            amount_type: Set(None),
            created_by: Set(admin_id()),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        if let Err(e) = maintenance.insert(db).await {
            eprintln!("Failed to insert maintenance row for {flat_number}: {e}");
        } else {
            println!("  Created flat {flat_number} with maintenance record");
        }
    }
}
