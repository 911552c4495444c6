pub mod fixed;
pub mod machine;

use std::sync::Arc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::IdentityBox;

pub struct IdentityManager {}

impl IdentityManager {
    /// An explicit `device-id` wins over the derived machine fingerprint.
    pub fn get() -> IdentityBox {
        let device_id = Config::get(ConfigKey::DeviceID);
        if !device_id.is_empty() {
            return Arc::new(fixed::FixedIdentity::new(&device_id));
        }

        return Arc::new(machine::MachineIdentity::default());
    }
}
