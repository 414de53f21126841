//! # HTTP Handlers
//!
//! One module per resource. Handlers stay thin: extract, call the store,
//! wrap the result in the envelope.
//!
//! ```text
//! GET    /health                    system::health
//! GET    /api                       system::index
//! GET    /api/dashboard             system::dashboard
//!
//! GET    /api/{products|customers|sales}            list
//! POST   /api/{products|customers|sales}            create   (201)
//! GET    /api/{products|customers|sales}/next-id    next identifier
//! GET    /api/{products|customers|sales}/:id        get / show
//! PUT    /api/{products|customers|sales}/:id        partial update
//! DELETE /api/{products|customers|sales}/:id        delete
//! ```

pub mod customers;
pub mod products;
pub mod sales;
pub mod system;
