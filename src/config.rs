use nanoserde::{DeJson, DeJsonErr, SerJson};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;

/// Configuration bundle handed to the platform at startup. The values here
/// come from the dev portal; the defaults are the sandbox credentials the
/// demo was registered with.
#[derive(Debug, Clone, DeJson, SerJson)]
pub struct SdkConfig {
    /// The product id for the running application, found on the dev portal
    pub product_id: String,

    /// The sandbox id for the running application, found on the dev portal
    pub sandbox_id: String,

    /// The deployment id for the running application, found on the dev portal
    pub deployment_id: String,

    /// Client id of the service permissions entry, found on the dev portal
    pub client_credentials_id: String,

    /// Client secret for accessing the set of permissions, found on the dev portal
    pub client_credentials_secret: String,

    /// Game name
    pub game_name: String,

    /// Encryption key
    pub encryption_key: String,

    /// Credential name in the dev auth tool
    pub credential_name: String,

    /// Host name in the dev auth tool
    pub dev_auth_host: String,
}

impl Default for SdkConfig {
    fn default() -> SdkConfig {
        SdkConfig {
            product_id: "304afb1f260a40f8b62824653a1261cf".to_owned(),
            sandbox_id: "8b7355eee97f494ea9f014bfceeb9416".to_owned(),
            deployment_id: "3cfbcd6249c240719b3676b0ba5dc63b".to_owned(),
            client_credentials_id: "xyza7891JcianMhD5swapyNVsQa8Bt2K".to_owned(),
            client_credentials_secret: "FpNOeSD6snxB0v5NS5SAfVAhM5WnPRKvW14hXqc37lw".to_owned(),
            game_name: "Halcyon Stub Game".to_owned(),
            encryption_key:
                "1111111111111111111111111111111111111111111111111111111111111111".to_owned(),
            credential_name: "Test Credential".to_owned(),
            dev_auth_host: "localhost:31415".to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    JsonError(DeJsonErr),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Error for ConfigError {}

impl SdkConfig {
    /// Loads a configuration bundle from a JSON file.
    pub fn load(path: &str) -> Result<SdkConfig, ConfigError> {
        let json = fs::read_to_string(path).map_err(|err| ConfigError::IoError(err))?;
        DeJson::deserialize_json(&json).map_err(|err| ConfigError::JsonError(err))
    }
}
