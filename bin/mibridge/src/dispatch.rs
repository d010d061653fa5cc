use homekit::Bridge;
use log::{debug, error, info};
use paho_mqtt::{AsyncClient as MqClient, Message, MessageBuilder, PropertyCode, QOS_1};
use transport::{Action, Request, RequestResult, Response, Topic};

use crate::Result;

pub async fn handle_request(msg: Message, mqtt: &MqClient, bridge: &Bridge) {
    let request: Request = match serde_json::from_slice(msg.payload()) {
        Ok(request) => request,
        Err(err) => {
            error!("unable to parse request: {}", err);
            error!("{}", msg.payload_str());
            return;
        }
    };

    let response_topic = msg
        .properties()
        .get_string(PropertyCode::ResponseTopic)
        .unwrap_or_else(|| Topic::Response(request.request_id.to_string()).to_string());

    let response = Response {
        request_id: request.request_id,
        result: perform(request, bridge).await,
    };

    debug!("publish to {}: {:?}", response_topic, response);

    let payload = match serde_json::to_vec(&response) {
        Ok(payload) => payload,
        Err(err) => {
            error!("Error serializing response: {err}");
            return;
        }
    };

    let message = MessageBuilder::new()
        .topic(&response_topic)
        .payload(payload)
        .qos(QOS_1)
        .finalize();

    if let Err(err) = mqtt.publish(message).await {
        error!("Error sending response to {}: {}", response_topic, err);
    }
}

async fn perform(request: Request, bridge: &Bridge) -> RequestResult {
    let Request {
        accessory,
        service,
        characteristic,
        action,
        ..
    } = request;

    let result = match action {
        Action::Get => bridge
            .get(accessory, service, characteristic)
            .await
            .map(RequestResult::Value),
        Action::Set(value) => bridge
            .set(accessory, service, characteristic, value)
            .await
            .map(|()| RequestResult::Success),
    };

    match result {
        Ok(result) => result,
        Err(err) => {
            error!("{accessory} {service}.{characteristic}: {err}");
            RequestResult::Failure(err.to_string())
        }
    }
}

/// Publishes the registered accessories as a retained message.
pub async fn publish_accessories(mqtt: &MqClient, bridge: &Bridge) -> Result<()> {
    let accessories = bridge.accessories().await;
    let payload = serde_json::to_vec(&accessories)?;

    let message = MessageBuilder::new()
        .topic(Topic::Accessories.to_string())
        .payload(payload)
        .qos(QOS_1)
        .retained(true)
        .finalize();

    mqtt.publish(message).await?;
    info!("published {} accessories", accessories.len());

    Ok(())
}
