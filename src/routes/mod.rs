use crate::state::AppState;
use axum::Router;

pub mod archive;
pub mod brand;
pub mod client;
pub mod company;
pub mod employee;
pub mod franchise;
pub mod inventory;
pub mod lent;
pub mod order;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod sales;
pub mod utility;
pub mod visit;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(utility::router())
        .merge(employee::router())
        .merge(client::router())
        .merge(brand::router())
        .merge(product::router())
        .merge(purchase::router())
        .merge(order::router())
        .merge(sales::router())
        .merge(payment::router())
        .merge(visit::router())
        .merge(franchise::router())
        .merge(inventory::router())
        .merge(lent::router())
        .merge(company::router())
        .merge(archive::router())
}
