use serde::{Deserialize, Serialize};

/// Registration data a broker publishes under `/brokers/ids/<id>`. Only the
/// fields needed for listing are kept.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BrokerInfo {
    #[serde(skip)]
    pub id: u32,
    // null when the broker has no plaintext listener
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: i32,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub rack: Option<String>,
}

impl BrokerInfo {
    pub fn addr(&self) -> String {
        match (&self.host, self.endpoints.first()) {
            (Some(host), _) => format!("{}:{}", host, self.port),
            (None, Some(endpoint)) => endpoint.clone(),
            (None, None) => "unknown".to_string(),
        }
    }
}
