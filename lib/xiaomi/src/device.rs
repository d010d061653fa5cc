use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use crypto::{parse_token, Token};
use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{
    net::UdpSocket,
    sync::Mutex,
    time::{self, Duration, Instant},
};

use crate::cloud::DeviceRecord;
use crate::discover::{handshake, PORT, RECV_TIMEOUT};
use crate::message::Message;
use crate::miot::{Category, GetProperty, ModelSpec, Property, PropertyResult, SetProperty};
use crate::{DeviceControl, Error, Result};

mod response;
pub use response::{DeviceError, Response};

const ATTEMPTS: usize = 3;
const ID_SKIP_ON_TIMEOUT: u32 = 100;

pub struct Device {
    did: String,
    model: String,
    spec: &'static ModelSpec,
    transport: Mutex<Transport>,
}

impl Device {
    pub fn new(did: &str, model: &str, ip: &str, token: &str) -> Result<Device> {
        let ip: IpAddr = ip
            .parse()
            .map_err(|_| Error::InvalidAddress(ip.to_string()))?;
        let token = parse_token::<16>(token)?;

        Self::with_addr(did, model, SocketAddr::new(ip, PORT), token)
    }

    pub fn from_record(record: &DeviceRecord) -> Result<Device> {
        Self::new(&record.did, &record.model, &record.localip, &record.token)
    }

    pub fn with_addr(did: &str, model: &str, addr: SocketAddr, token: Token<16>) -> Result<Device> {
        let category =
            Category::from_model(model).ok_or_else(|| Error::UnsupportedModel(model.to_string()))?;

        Ok(Device {
            did: did.to_string(),
            model: model.to_string(),
            spec: category.spec(),
            transport: Mutex::new(Transport::new(addr, token)),
        })
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    async fn set_recv_timeout(&self, timeout: Duration) {
        self.transport.lock().await.recv_timeout = timeout;
    }

    /// Performs the miio handshake so the first request does not have to.
    pub async fn init(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;
        transport.session().await?;
        Ok(())
    }

    pub async fn send<P: Serialize + Send + Sync>(&self, method: &str, params: P) -> Result<Value> {
        let params = serde_json::to_value(params)?;
        let mut transport = self.transport.lock().await;
        transport.send(method, params).await
    }

    pub async fn get(&self, property: Property) -> Result<Value> {
        let params = [GetProperty {
            did: &self.did,
            siid: property.siid,
            piid: property.piid,
        }];

        let result = self.send("get_properties", params).await?;
        let results: Vec<PropertyResult> = serde_json::from_value(result)?;

        let result = find_result(results, property)?;
        result.value.ok_or(Error::MissingProperty(property.name))
    }

    pub async fn set(&self, property: Property, value: Value) -> Result<()> {
        let params = [SetProperty {
            did: &self.did,
            siid: property.siid,
            piid: property.piid,
            value,
        }];

        let result = self.send("set_properties", params).await?;
        let results: Vec<PropertyResult> = serde_json::from_value(result)?;

        find_result(results, property)?;
        Ok(())
    }

    async fn get_optional(&self, property: Option<Property>, name: &'static str) -> Result<Value> {
        match property {
            Some(property) => self.get(property).await,
            None => Err(Error::UnsupportedProperty(name)),
        }
    }
}

fn find_result(results: Vec<PropertyResult>, property: Property) -> Result<PropertyResult> {
    let result = results
        .into_iter()
        .find(|r| r.siid == property.siid && r.piid == property.piid)
        .ok_or(Error::MissingProperty(property.name))?;

    if result.code != 0 {
        return Err(Error::PropertyCode(property.name, result.code));
    }

    Ok(result)
}

fn as_bool(name: &'static str, value: Value) -> Result<bool> {
    match (value.as_bool(), value.as_u64()) {
        (Some(value), _) => Ok(value),
        (_, Some(0)) => Ok(false),
        (_, Some(1)) => Ok(true),
        _ => Err(Error::UnexpectedValue(name, value)),
    }
}

fn as_f64(name: &'static str, value: Value) -> Result<f64> {
    match value.as_f64() {
        Some(number) => Ok(number),
        None => Err(Error::UnexpectedValue(name, value)),
    }
}

fn as_u8(name: &'static str, value: Value) -> Result<u8> {
    match value.as_u64().and_then(|number| u8::try_from(number).ok()) {
        Some(number) => Ok(number),
        None => Err(Error::UnexpectedValue(name, value)),
    }
}

#[async_trait]
impl DeviceControl for Device {
    async fn power(&self) -> Result<bool> {
        as_bool("power", self.get(self.spec.power).await?)
    }

    async fn set_power(&self, on: bool) -> Result<()> {
        self.set(self.spec.power, json!(on)).await
    }

    async fn mode(&self) -> Result<String> {
        let value = self.get_optional(self.spec.mode, "mode").await?;
        let code = as_u8("mode", value)?;

        match self.spec.mode_name(code) {
            Some(name) => Ok(name.to_string()),
            None => Err(Error::UnexpectedValue("mode", json!(code))),
        }
    }

    async fn fan_level(&self) -> Result<u8> {
        as_u8("fan_level", self.get(self.spec.fan_level).await?)
    }

    async fn set_fan_level(&self, level: u8) -> Result<()> {
        self.set(self.spec.fan_level, json!(level)).await
    }

    async fn humidity(&self) -> Result<f64> {
        as_f64("humidity", self.get(self.spec.humidity).await?)
    }

    async fn target_humidity(&self) -> Result<f64> {
        let value = self
            .get_optional(self.spec.target_humidity, "target_humidity")
            .await?;
        as_f64("target_humidity", value)
    }

    async fn set_target_humidity(&self, humidity: u8) -> Result<()> {
        match self.spec.target_humidity {
            Some(property) => self.set(property, json!(humidity)).await,
            None => Err(Error::UnsupportedProperty("target_humidity")),
        }
    }

    async fn temperature(&self) -> Result<f64> {
        as_f64("temperature", self.get(self.spec.temperature).await?)
    }

    async fn pm2_5(&self) -> Result<f64> {
        let value = self.get_optional(self.spec.pm2_5, "pm2_5").await?;
        as_f64("pm2_5", value)
    }

    async fn water_level(&self) -> Result<f64> {
        let value = self
            .get_optional(self.spec.water_level, "water_level")
            .await?;
        as_f64("water_level", value)
    }

    async fn filter_remaining(&self) -> Result<Option<u8>> {
        let property = match self.spec.filter_remaining {
            Some(property) => property,
            None => return Ok(None),
        };

        match self.get(property).await {
            Ok(Value::Null) | Err(Error::MissingProperty(_)) => Ok(None),
            Ok(value) => as_u8(property.name, value).map(Some),
            Err(err) => Err(err),
        }
    }

    async fn controls_locked(&self) -> Result<bool> {
        as_bool("child_lock", self.get(self.spec.child_lock).await?)
    }

    async fn set_controls_locked(&self, locked: bool) -> Result<()> {
        self.set(self.spec.child_lock, json!(locked)).await
    }
}

struct Session {
    device_id: u32,
    ts: u32,
    started: Instant,
}

struct Transport {
    addr: SocketAddr,
    token: Token<16>,
    socket: Option<UdpSocket>,
    session: Option<Session>,
    next_id: u32,
    recv_timeout: Duration,
}

impl Transport {
    fn new(addr: SocketAddr, token: Token<16>) -> Transport {
        Transport {
            addr,
            token,
            socket: None,
            session: None,
            next_id: 1,
            recv_timeout: RECV_TIMEOUT,
        }
    }

    async fn socket(&mut self) -> Result<&UdpSocket> {
        let socket = match self.socket.take() {
            Some(socket) => socket,
            None => {
                let bind: SocketAddr = match self.addr {
                    SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
                    SocketAddr::V6(_) => ([0u16; 8], 0).into(),
                };
                UdpSocket::bind(bind).await?
            }
        };

        Ok(self.socket.insert(socket))
    }

    async fn session(&mut self) -> Result<(u32, u32)> {
        if let Some(ref session) = self.session {
            let ts = session.ts + session.started.elapsed().as_secs() as u32;
            return Ok((session.device_id, ts));
        }

        let addr = self.addr;
        let timeout = self.recv_timeout;
        let header = handshake(self.socket().await?, addr, timeout).await?;

        self.session = Some(Session {
            device_id: header.id,
            ts: header.ts,
            started: Instant::now(),
        });

        Ok((header.id, header.ts))
    }

    async fn send(&mut self, method: &str, params: Value) -> Result<Value> {
        let mut attempt = 1;

        loop {
            match self.exchange(method, &params).await {
                Ok(response) => return response,
                Err(err @ (Error::Timeout(_) | Error::DeviceNotFound(_))) if attempt < ATTEMPTS => {
                    warn!("{} failed on attempt {}/{}: {}", method, attempt, ATTEMPTS, err);

                    // the device may still hold the old id, skip ahead and redo the handshake
                    self.next_id = self.next_id.wrapping_add(ID_SKIP_ON_TIMEOUT);
                    self.session = None;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One request/response round trip. The outer result carries transport
    /// failures, the inner one the device answer.
    async fn exchange(&mut self, method: &str, params: &Value) -> Result<Result<Value>> {
        let (device_id, ts) = self.session().await?;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let request = json!({
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("request {}", request);

        let data = serde_json::to_vec(&request)?;
        let message = Message::encode(&data, self.token, device_id, ts);

        let token = self.token;
        let addr = self.addr;
        let timeout = self.recv_timeout;
        let socket = self.socket().await?;

        socket.send_to(&message.to_bytes(), addr).await?;
        trace!("sent {} bytes to {}", message.len(), addr);

        let mut buffer = [0; 4096];

        loop {
            let (size, _) = time::timeout(timeout, socket.recv_from(&mut buffer)).await??;

            let message = match Message::read_from(&buffer[..size]) {
                Ok(message) => message,
                Err(err) => {
                    trace!("skipping packet: {}", err);
                    continue;
                }
            };

            let data = message.decode(token)?;
            let response: Response = serde_json::from_slice(&data)?;
            debug!("response {}", String::from_utf8_lossy(&data));

            if response.id() != id {
                trace!("skipping response with id {}, waiting for {}", response.id(), id);
                continue;
            }

            return Ok(match response {
                Response::Ok { result, .. } => Ok(result),
                Response::Err { error, .. } => Err(error.into()),
            });
        }
    }
}
