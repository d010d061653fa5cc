use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A device as listed by the cloud.
///
/// Fields the bridge does not read are kept in `extra`, so the record
/// serializes back to what the cloud returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub did: String,
    pub name: String,
    pub model: String,
    pub mac: String,
    pub localip: String,
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeviceList {
    #[serde(default)]
    list: Vec<Value>,
}

impl DeviceList {
    /// Entries that do not parse as a record are skipped.
    pub fn records(self) -> Vec<DeviceRecord> {
        self.list
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    debug!("skipping device entry: {err}");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_unknown_fields() {
        let json = json!({
            "did": "123456789",
            "name": "Mi Air Purifier 3H",
            "model": "zhimi.airpurifier.mb3",
            "mac": "AA:BB:CC:DD:EE:FF",
            "localip": "192.168.1.20",
            "token": "00112233445566778899aabbccddeeff",
            "isOnline": true,
            "rssi": -47
        });

        let record: DeviceRecord = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(record.did, "123456789");
        assert_eq!(record.model, "zhimi.airpurifier.mb3");
        assert_eq!(record.extra["isOnline"], json!(true));

        assert_eq!(serde_json::to_value(&record).unwrap(), json);
    }

    #[test]
    fn test_list_skips_malformed_entries() {
        let list: DeviceList = serde_json::from_value(json!({
            "list": [
                {
                    "did": "1",
                    "name": "Purifier",
                    "model": "zhimi.airpurifier.ma4",
                    "mac": "AA:BB:CC:DD:EE:FF",
                    "localip": "192.168.1.20",
                    "token": "00112233445566778899aabbccddeeff"
                },
                {
                    "did": "2",
                    "name": "Gateway",
                    "model": "lumi.gateway.v3",
                    "mac": "11:22:33:44:55:66",
                    "token": "ffeeddccbbaa99887766554433221100"
                }
            ]
        }))
        .unwrap();

        let records = list.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].did, "1");
    }

    #[test]
    fn test_missing_list() {
        let list: DeviceList = serde_json::from_value(json!({})).unwrap();
        assert!(list.records().is_empty());
    }
}
