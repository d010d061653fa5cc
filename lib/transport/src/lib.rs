mod request;
pub use request::{Action, Request};

mod response;
pub use response::{RequestResult, Response};

mod topic;
pub use topic::Topic;

use std::time::Duration;

use log::debug;
use paho_mqtt::{AsyncClient, ConnectOptionsBuilder, CreateOptionsBuilder, MQTT_VERSION_5};

/// Connects with MQTT v5, response topics travel as message properties.
pub async fn connect_mqtt(
    address: String,
    username: String,
    password: String,
    client_id: &str,
) -> Result<AsyncClient, paho_mqtt::Error> {
    let create_opts = CreateOptionsBuilder::new()
        .server_uri(&address)
        .client_id(client_id)
        .mqtt_version(MQTT_VERSION_5)
        .finalize();

    let client = AsyncClient::new(create_opts)?;

    let conn_opts = ConnectOptionsBuilder::new_v5()
        .keep_alive_interval(Duration::from_secs(30))
        .clean_start(false)
        .user_name(username)
        .password(password)
        .finalize();

    client.connect(conn_opts).await?;
    debug!("connected to {} as {}", address, client_id);

    Ok(client)
}
