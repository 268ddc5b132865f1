// Copyright 2024 The Halcyon Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::achievements::Achievements;
use crate::config::SdkConfig;
use crate::platform_adapter::PlatformAdapter;
use crate::stats::Stats;
use crate::types::{AuthenticateOptions, AuthenticateResult};
use log::trace;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// The initialized vendor runtime. Owns the adapter and hands out the typed
/// interface handles; everything the runtime does happens inside `tick()`.
pub struct Platform<A: PlatformAdapter> {
    adapter: Arc<Mutex<A>>,
}

impl<A: PlatformAdapter> Clone for Platform<A> {
    fn clone(&self) -> Self {
        Platform {
            adapter: self.adapter.clone(),
        }
    }
}

#[derive(Debug)]
pub enum PlatformError {
    MissingConfigValue(&'static str),
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Error for PlatformError {}

fn required(name: &'static str, value: &str) -> Result<(), PlatformError> {
    if value.is_empty() {
        return Err(PlatformError::MissingConfigValue(name));
    }
    Ok(())
}

impl<A: PlatformAdapter> Platform<A> {
    pub fn new(adapter: A, config: &SdkConfig) -> Result<Platform<A>, PlatformError> {
        required("product_id", &config.product_id)?;
        required("sandbox_id", &config.sandbox_id)?;
        required("deployment_id", &config.deployment_id)?;
        required("client_credentials_id", &config.client_credentials_id)?;
        required("client_credentials_secret", &config.client_credentials_secret)?;
        required("game_name", &config.game_name)?;
        required("encryption_key", &config.encryption_key)?;

        trace!("platform initialized for product {}", config.product_id);
        Ok(Platform {
            adapter: Arc::new(Mutex::new(adapter)),
        })
    }

    /// Pumps the runtime once. Queued completion callbacks are delivered
    /// exclusively from inside this call.
    pub fn tick(&self) {
        self.adapter.lock().unwrap().tick();
    }

    pub fn authenticate<F>(&self, options: AuthenticateOptions, callback: F)
    where
        F: FnOnce(AuthenticateResult) + Send + 'static,
    {
        self.adapter
            .lock()
            .unwrap()
            .authenticate(options, Box::new(callback));
    }

    pub fn achievements(&self) -> Achievements<A> {
        Achievements::new(self.adapter.clone())
    }

    pub fn stats(&self) -> Stats<A> {
        Stats::new(self.adapter.clone())
    }
}

pub fn str_slice_to_owned(slice: &[&str]) -> Vec<String> {
    slice.iter().map(|id| (*id).to_owned()).collect()
}
