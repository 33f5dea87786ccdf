//! Agency Site - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    agency_site::run().await;
}
