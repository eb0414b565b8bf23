//! Loopback demo: runs a full publish/inbound cycle against the mock
//! transport and prints the wire payloads, no broker required.
//!
//! ```sh
//! cargo run --example loopback
//! ```

use anyhow::Result;
use sensor_bridge::{
    config::{Config, MqttConfig},
    hal::MockTransport,
    TelemetryBridge,
};

fn main() -> Result<()> {
    let config = Config::default().with_mqtt(
        MqttConfig::default()
            .with_client_id("demo-node")
            .with_user("alice"),
    );

    let mut bridge = TelemetryBridge::new(MockTransport::new(), config);
    bridge.on_command(|name, value| println!("  command  {name} = {value:?}"));
    bridge.on_config(|name, value| println!("  config   {name} = {value:?}"));

    bridge.connect()?;
    println!("subscribed:");
    for (topic, qos) in &bridge.transport().subscriptions {
        println!("  {topic} ({qos:?})");
    }

    // Three telemetry cycles with drifting readings
    bridge.diagnostics_mut().set_rssi(-67);
    for cycle in 0..3 {
        let temperature = 21.5 + f64::from(cycle) * 0.25;
        let mut readings = bridge
            .schema()
            .readings(&[temperature, 40.0, 87.0])?;
        bridge.publish_readings(&mut readings)?;
    }

    println!("published to /v1/alice/data:");
    for payload in bridge.transport().published_to("/v1/alice/data") {
        println!("  {}", String::from_utf8_lossy(payload));
    }

    // Feed some inbound traffic back through decode and routing
    bridge
        .transport_mut()
        .queue_message("/v1/alice/cmd", br#"{"name":"relay","value":true}"#.to_vec());
    bridge.transport_mut().queue_message(
        "/v1/alice/config",
        br#"{"name":"interval","value":30}"#.to_vec(),
    );
    bridge
        .transport_mut()
        .queue_message("/v1/alice/cmd", b"not json".to_vec());

    println!("inbound:");
    let outcome = bridge.poll();
    println!(
        "  handled {} message(s), {} failure(s)",
        outcome.handled,
        outcome.failures.len()
    );
    for failure in &outcome.failures {
        println!("  dropped: {failure}");
    }

    Ok(())
}
