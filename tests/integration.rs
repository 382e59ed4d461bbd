use luxor::{ControllerSession, LuxorClient};

/// Run with: cargo test --test integration -- --ignored
/// Requires a controller on the LAN; set LUXOR_HOST to its address.
#[tokio::test]
#[ignore]
async fn identify_and_refresh() {
    let host = std::env::var("LUXOR_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());
    let client = LuxorClient::new(host).expect("client should build");

    let mut session = ControllerSession::connect(client, "")
        .await
        .expect("connect failed");
    println!(
        "controller {} ({})",
        session.identity().name,
        session.family().as_luxor_str()
    );

    let snapshot = session.refresh().await.expect("refresh failed");
    assert!(!snapshot.groups.is_empty(), "controller should report groups");

    for light in session.lights() {
        println!(
            "[{}] {} | {:?} | on: {} | brightness: {}",
            light.group_number,
            light.name,
            light.capability,
            light.is_on(&session),
            light.brightness(&session),
        );
    }
}
