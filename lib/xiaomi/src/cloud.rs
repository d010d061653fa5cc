use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use md5::{Digest, Md5};
use reqwest::{redirect::Policy, Client};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{Error, Result};

mod device_record;
pub use device_record::DeviceRecord;
use device_record::DeviceList;

mod signature;
pub use signature::{nonce, signature, signed_nonce};

const ACCOUNT_URL: &str = "https://account.xiaomi.com/pass";
const STS_CALLBACK: &str = "https://sts.api.io.mi.com/sts";
const SID: &str = "xiaomiio";
const JSON_PREFIX: &str = "&&&START&&&";
const USER_AGENT: &str = "Android-7.1.1-1.0.0-ONEPLUS A3010-136-mibridge APP/xiaomi.smarthome APPV/62830";

struct Session {
    user_id: String,
    ssecurity: String,
    service_token: String,
}

pub struct Cloud {
    client: Client,
    country: String,
    session: Option<Session>,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "_sign")]
    sign: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    desc: Option<String>,
    ssecurity: Option<String>,
    user_id: Option<serde_json::Value>,
    location: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    code: i64,
    #[serde(default)]
    message: String,
    result: Option<T>,
}

impl Cloud {
    pub fn new(country: &str) -> Result<Cloud> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .redirect(Policy::none())
            .build()?;

        Ok(Cloud {
            client,
            country: country.to_lowercase(),
            session: None,
        })
    }

    /// Three step service login: fetch `_sign`, post credentials, follow
    /// the location to receive the service token.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let sign = self.login_sign().await?;
        debug!("got login sign");

        let auth = self.login_auth(username, password, &sign).await?;
        let (ssecurity, user_id, location) = match auth {
            AuthResponse {
                code: 0,
                ssecurity: Some(ssecurity),
                user_id: Some(user_id),
                location: Some(location),
                ..
            } => (ssecurity, user_id, location),
            AuthResponse { code, desc, .. } => {
                let desc = desc.unwrap_or_else(|| "invalid credentials".to_string());
                return Err(Error::Login(format!("{desc} (code {code})")));
            }
        };

        let service_token = self.login_service_token(&location).await?;

        let user_id = match user_id {
            serde_json::Value::String(id) => id,
            id => id.to_string(),
        };

        info!("logged in to xiaomi cloud as {}", user_id);

        self.session = Some(Session {
            user_id,
            ssecurity,
            service_token,
        });

        Ok(())
    }

    async fn login_sign(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{ACCOUNT_URL}/serviceLogin"))
            .query(&[("sid", SID), ("_json", "true")])
            .send()
            .await?
            .text()
            .await?;

        let response: SignResponse = parse_prefixed(&response)?;
        Ok(response.sign)
    }

    async fn login_auth(&self, username: &str, password: &str, sign: &str) -> Result<AuthResponse> {
        let hash = password_hash(password);
        let qs = format!("%3Fsid%3D{SID}%26_json%3Dtrue");

        let form = [
            ("sid", SID),
            ("hash", hash.as_str()),
            ("callback", STS_CALLBACK),
            ("qs", qs.as_str()),
            ("user", username),
            ("_sign", sign),
            ("_json", "true"),
        ];

        let response = self
            .client
            .post(format!("{ACCOUNT_URL}/serviceLoginAuth2"))
            .form(&form)
            .send()
            .await?
            .text()
            .await?;

        parse_prefixed(&response)
    }

    async fn login_service_token(&self, location: &str) -> Result<String> {
        let response = self.client.get(location).send().await?;

        let token = response
            .cookies()
            .find(|cookie| cookie.name() == "serviceToken")
            .map(|cookie| cookie.value().to_string());

        token.ok_or_else(|| Error::Login("no service token".to_string()))
    }

    pub async fn devices(&self) -> Result<Vec<DeviceRecord>> {
        let data = json!({"getVirtualModel": false, "getHuamiDevices": 0});
        let list: DeviceList = self.request("/home/device_list", &data.to_string()).await?;
        let records = list.records();

        debug!("cloud returned {} devices", records.len());
        Ok(records)
    }

    async fn request<T: DeserializeOwned>(&self, path: &str, data: &str) -> Result<T> {
        let session = self.session.as_ref().ok_or(Error::NotLoggedIn)?;

        let nonce = nonce(rand::random(), minutes_since_epoch());
        let signed_nonce = signed_nonce(&session.ssecurity, &nonce)?;
        let signature = signature(path, &signed_nonce, &nonce, &[("data", data)])?;

        let cookie = format!(
            "userId={}; serviceToken={}; locale=en_GB",
            session.user_id, session.service_token
        );

        let response: ApiResponse<T> = self
            .client
            .post(format!("{}{}", api_url(&self.country), path))
            .header("x-xiaomi-protocal-flag-cli", "PROTOCAL-HTTP2")
            .header(reqwest::header::COOKIE, cookie)
            .form(&[
                ("signature", signature.as_str()),
                ("_nonce", nonce.as_str()),
                ("data", data),
            ])
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResponse {
                code: 0,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { code, message, .. } => Err(Error::Cloud(code, message)),
        }
    }
}

pub fn api_url(country: &str) -> String {
    if country == "cn" {
        "https://api.io.mi.com/app".to_string()
    } else {
        format!("https://{country}.api.io.mi.com/app")
    }
}

fn password_hash(password: &str) -> String {
    let digest = Md5::digest(password.as_bytes());
    digest.iter().map(|byte| format!("{byte:02X}")).collect()
}

fn parse_prefixed<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = body.strip_prefix(JSON_PREFIX).unwrap_or(body);
    Ok(serde_json::from_str(body)?)
}

fn minutes_since_epoch() -> u32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() / 60) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(api_url("cn"), "https://api.io.mi.com/app");
        assert_eq!(api_url("de"), "https://de.api.io.mi.com/app");
    }

    #[test]
    fn test_password_hash() {
        assert_eq!(password_hash("password"), "5F4DCC3B5AA765D61D8327DEB882CF99");
    }

    #[test]
    fn test_parse_sign() {
        let body = r#"&&&START&&&{"serviceParam":"{\"checkSafePhone\":false}","qs":"%3Fsid%3Dxiaomiio","code":70016,"_sign":"2&V1_passport&wqS4omyjiKyTNR2pY5ZOnBWbKAs="}"#;
        let response: SignResponse = parse_prefixed(body).unwrap();

        assert_eq!(response.sign, "2&V1_passport&wqS4omyjiKyTNR2pY5ZOnBWbKAs=");
    }

    #[test]
    fn test_parse_auth() {
        let body = r#"&&&START&&&{"qs":"%3Fsid%3Dxiaomiio","ssecurity":"AAECAwQFBgcICQoLDA0ODw==","code":0,"passToken":"x","description":"成功","securityStatus":0,"nonce":123,"userId":1234567,"cUserId":"abc","result":"ok","psecurity":"p","captchaUrl":null,"location":"https://sts.api.io.mi.com/sts?d=x","pwd":1,"desc":"成功"}"#;
        let response: AuthResponse = parse_prefixed(body).unwrap();

        assert_eq!(response.code, 0);
        assert_eq!(response.ssecurity.as_deref(), Some("AAECAwQFBgcICQoLDA0ODw=="));
        assert_eq!(response.user_id, Some(json!(1234567)));
        assert_eq!(
            response.location.as_deref(),
            Some("https://sts.api.io.mi.com/sts?d=x")
        );
    }

    #[test]
    fn test_parse_device_list() {
        let body = r#"{"code":0,"message":"ok","result":{"list":[{"did":"1","name":"Purifier","model":"zhimi.airpurifier.ma4","mac":"AA:BB:CC:DD:EE:FF","localip":"192.168.1.20","token":"00112233445566778899aabbccddeeff","pid":"0"}]}}"#;
        let response: ApiResponse<DeviceList> = serde_json::from_str(body).unwrap();

        assert_eq!(response.code, 0);
        let list = response.result.unwrap().records();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].model, "zhimi.airpurifier.ma4");
    }

    #[tokio::test]
    async fn test_request_requires_login() {
        let cloud = Cloud::new("cn").unwrap();
        assert!(matches!(cloud.devices().await, Err(Error::NotLoggedIn)));
    }
}
