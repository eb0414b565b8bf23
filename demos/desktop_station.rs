//! Desktop station demo: connects to a local broker and publishes
//! simulated sensor readings on an interval.
//!
//! # Usage
//!
//! Start a broker (e.g. `mosquitto -v`), then:
//!
//! ```sh
//! cargo run --example desktop_station --features mqtt
//! ```
//!
//! Watch the telemetry:
//!
//! ```sh
//! mosquitto_sub -t '/v1/alice/data'
//! ```
//!
//! Send a command or a config update:
//!
//! ```sh
//! mosquitto_pub -t '/v1/alice/cmd' -m '{"name":"relay","value":true}'
//! mosquitto_pub -t '/v1/alice/config' -m '{"name":"interval","value":30}'
//! ```

use anyhow::Result;
use sensor_bridge::services::{MqttRuntimeConfig, MqttStation};
use sensor_bridge::BoundedReading;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sensor_bridge=debug,info")),
        )
        .init();

    let config = MqttRuntimeConfig::new("localhost", 1883)
        .client_id("demo-node")
        .credentials("alice", "s3cret")
        .publish_interval_ms(2000);

    let mut station = MqttStation::new(config);
    station.on_command(|name, value| println!("command  {name} = {value:?}"));
    station.on_config(|name, value| println!("config   {name} = {value:?}"));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut tick: u32 = 0;
        station
            .run(move |diag| {
                tick += 1;
                // Simulated sensors: a slow sine on temperature, a drifting
                // humidity, a draining battery.
                let t = f64::from(tick);
                diag.set_rssi(-60 - (tick % 15) as i32);
                vec![
                    BoundedReading::new(21.0 + (t / 10.0).sin() * 2.0, -40.0, 85.0, 0.0),
                    BoundedReading::new(40.0 + (t / 7.0).cos() * 5.0, 0.0, 100.0, 0.0),
                    BoundedReading::new(100.0 - t / 20.0, 0.0, 100.0, 0.0),
                ]
            })
            .await
    })?;

    Ok(())
}
