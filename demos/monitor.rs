use std::env;

use luxor::{ControllerSession, LuxorClient, DEFAULT_POLL_INTERVAL};

#[tokio::main]
async fn main() -> luxor::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(host) = args.get(1) else {
        eprintln!("usage: monitor <host> [name-prefix]");
        std::process::exit(2);
    };
    let prefix = args.get(2).cloned().unwrap_or_default();

    let client = LuxorClient::new(host.as_str())?;
    println!("Connecting to {host}...");
    let mut session = ControllerSession::connect(client, prefix).await?;
    println!(
        "Connected to {} ({}). Polling every {}s...",
        session.identity().name,
        session.family().as_luxor_str(),
        DEFAULT_POLL_INTERVAL.as_secs(),
    );

    loop {
        match session.refresh().await {
            Ok(snapshot) => println!("Snapshot at {}", snapshot.fetched_at),
            Err(e) => eprintln!("Update failed: {e}"),
        }
        for light in session.lights() {
            let color = light
                .hs_color(&session)
                .map(|(h, s)| format!(" | hue: {h} sat: {s}"))
                .unwrap_or_default();
            println!(
                "[{}] {} | {} | brightness: {}{}",
                light.group_number,
                light.name,
                if light.is_on(&session) { "on" } else { "off" },
                light.brightness(&session),
                color,
            );
        }
        for button in session.theme_buttons() {
            println!("theme {}: {}", button.theme_index, button.name);
        }
        tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
    }
}
