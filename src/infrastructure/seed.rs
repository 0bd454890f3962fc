use crate::config::AppConfig;
use crate::entities::{StringList, categories, prelude::*, users};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

pub async fn seed_initial_data(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    info!("🌱 Seeding catalog data...");

    let seed_categories = vec![
        (
            config.default_category.as_str(),
            "Free starter content",
            false,
        ),
        ("Action", "Action-packed movies", false),
        ("Drama", "Dramatic content", false),
        ("Thriller", "Suspense and thrillers", true),
        ("Sci-Fi", "Science Fiction", true),
        ("Crime", "Crime and mystery", true),
        ("History", "Historical content", false),
        ("Mystery", "Mystery and detective", true),
    ];

    let mut category_names = Vec::new();
    for (name, description, is_premium) in seed_categories {
        category_names.push(name.to_string());

        let exists = Categories::find()
            .filter(categories::Column::Name.eq(name))
            .one(db)
            .await?;

        if exists.is_none() {
            let model = categories::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                name: Set(name.to_string()),
                description: Set(description.to_string()),
                thumbnail: Set(String::new()),
                is_premium: Set(is_premium),
                created_at: Set(Utc::now()),
            };
            model.insert(db).await?;
        }
    }

    // The protected admin is subscribed to every seeded category; that is
    // how admins see all content, there is no separate bypass.
    let existing_admin = Users::find()
        .filter(users::Column::Email.eq(&config.admin_email))
        .one(db)
        .await?;

    if existing_admin.is_none() {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(config.admin_password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();

        let admin = users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set("Admin User".to_string()),
            email: Set(config.admin_email.clone()),
            phone: Set(String::new()),
            password_hash: Set(password_hash),
            role: Set(users::UserRole::Admin),
            subscription: Set(users::SubscriptionTier::Premium),
            subscribed_categories: Set(StringList(category_names)),
            is_active: Set(true),
            reset_password_token: Set(None),
            reset_password_expires: Set(None),
            created_at: Set(Utc::now()),
        };
        admin.insert(db).await?;
        info!("👑 Seeded admin account {}", config.admin_email);
    }

    info!("✅ Seeding completed.");
    Ok(())
}
