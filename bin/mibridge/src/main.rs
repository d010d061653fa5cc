use std::sync::Arc;
use std::time::Duration;

use homekit::{AccessoryCache, Bridge};
use mibridge::config::Config;
use mibridge::dispatch::{handle_request, publish_accessories};
use mibridge::platform::{CloudDiscovery, Platform};
use mibridge::Result;
use transport::{connect_mqtt, Topic};

use futures_util::stream::StreamExt;
use log::{error, info};
use paho_mqtt::{AsyncClient as MqClient, QOS_1};
use tokio::signal::unix::{signal, SignalKind};
use tokio::{task, time};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    info!("mibridge version {VERSION}");

    let config = Config::load().await?;

    let cache = AccessoryCache::new(&config.accessory_cache);
    let bridge = Arc::new(Bridge::restore(cache).await?);

    let discovery = CloudDiscovery::new(&config.platform)?;
    let mut platform = Platform::new(discovery, bridge.clone(), &config.platform);
    platform.discover().await;

    let mqtt_client = connect_mqtt(
        config.mqtt_address,
        config.mqtt_user,
        config.mqtt_pass,
        "mibridge",
    )
    .await?;
    info!("connected mqtt");

    publish_accessories(&mqtt_client, &bridge).await?;

    let requests_handle = task::spawn(subscribe_requests(mqtt_client, bridge));

    tokio::select! {
        result = requests_handle => result??,
        result = wait_for_sigterm() => {
            result?;
            info!("got SIGTERM, exiting...");
        }
    };

    Ok(())
}

async fn wait_for_sigterm() -> Result<()> {
    let mut sig = signal(SignalKind::terminate())?;
    sig.recv().await;
    Ok(())
}

async fn subscribe_requests(mut mqtt: MqClient, bridge: Arc<Bridge>) -> Result<()> {
    let mut stream = mqtt.get_stream(None);

    mqtt.subscribe(Topic::Request.to_string(), QOS_1).await?;
    info!("Subscribed to topic: {}", Topic::Request);

    while let Some(msg_opt) = stream.next().await {
        if let Some(msg) = msg_opt {
            let mqtt = mqtt.clone();
            let bridge = bridge.clone();

            task::spawn(async move { handle_request(msg, &mqtt, &bridge).await });
        } else {
            error!("Lost MQTT connection. Attempting reconnect.");
            while let Err(err) = mqtt.reconnect().await {
                error!("Error MQTT reconnecting: {}", err);
                time::sleep(Duration::from_millis(1000)).await;
            }
        }
    }

    Ok(())
}
