pub mod audit;
pub mod cart;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
pub mod wishlist;

use sea_orm::{
    sea_query::Index, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Schema, Set,
};
use std::sync::Arc;

use crate::entities::{
    audit::Entity as Audit, cart::Entity as Cart, category::Entity as Category,
    order::Entity as Order, order_item::Entity as OrderItem, product::Entity as Product,
    user::Entity as User, wishlist::Entity as Wishlist,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());

    let create_user_table = schema.create_table_from_entity(User);
    let create_category_table = schema.create_table_from_entity(Category);
    let create_product_table = schema.create_table_from_entity(Product);
    let create_cart_table = schema.create_table_from_entity(Cart);
    let create_order_table = schema.create_table_from_entity(Order);
    let create_order_item_table = schema.create_table_from_entity(OrderItem);
    let create_wishlist_table = schema.create_table_from_entity(Wishlist);
    let create_audit_table = schema.create_table_from_entity(Audit);

    db.execute(db.get_database_backend().build(&create_user_table))
        .await
        .expect("Failed to create users schema");
    db.execute(db.get_database_backend().build(&create_category_table))
        .await
        .expect("Failed to create categories schema");
    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create products schema");
    db.execute(db.get_database_backend().build(&create_cart_table))
        .await
        .expect("Failed to create cart schema");
    db.execute(db.get_database_backend().build(&create_order_table))
        .await
        .expect("Failed to create orders schema");
    db.execute(db.get_database_backend().build(&create_order_item_table))
        .await
        .expect("Failed to create order items schema");
    db.execute(db.get_database_backend().build(&create_wishlist_table))
        .await
        .expect("Failed to create wishlist schema");
    db.execute(db.get_database_backend().build(&create_audit_table))
        .await
        .expect("Failed to create audit schema");

    let wishlist_pair_unique = Index::create()
        .name("idx_wishlist_user_product")
        .table(Wishlist)
        .col(wishlist::Column::UserId)
        .col(wishlist::Column::ProductId)
        .unique()
        .to_owned();
    db.execute(db.get_database_backend().build(&wishlist_pair_unique))
        .await
        .expect("Failed to create wishlist unique index");
}

/// Makes sure an owner account exists, so a fresh deployment is administrable.
pub async fn seed_owner(db: Arc<DatabaseConnection>) {
    let email =
        std::env::var("OWNER_EMAIL").unwrap_or_else(|_| "owner@surgistore.local".to_string());
    let password = std::env::var("OWNER_PASSWORD").unwrap_or_else(|_| "ChangeMe15".to_string());

    let existing = User::find()
        .filter(user::Column::Role.eq(user::Role::Owner))
        .one(&*db)
        .await
        .expect("Failed to look up owner account");

    if existing.is_some() {
        return;
    }

    let password_hash = user::hash_password(&password).expect("Failed to hash owner password");

    let new_owner = user::ActiveModel {
        email: Set(email.clone()),
        password: Set(password_hash),
        full_name: Set("Store owner".to_string()),
        role: Set(user::Role::Owner),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    User::insert(new_owner)
        .exec(&*db)
        .await
        .expect("Failed to seed owner account");

    tracing::info!(email = %email, "Seeded owner account");
}
