pub mod categories;
pub mod movies;
pub mod users;

// Re-export all handlers
pub use categories::{create_category, delete_category, update_category};
pub use movies::{
    bulk_movies, bulk_upload_csv, create_movie, delete_movie, sample_csv, update_movie,
};
pub use users::{delete_user, list_users, toggle_status, update_status, update_subscription};
