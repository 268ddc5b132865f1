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

use crate::config::SdkConfig;
use crate::platform::Platform;
use crate::platform_adapter::PlatformAdapter;
use crate::session::Session;
use crate::types::{AuthenticateOptions, ResultCode};
use log::trace;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AuthError {
    Rejected(ResultCode),
    EmptyUserId,
    ConnectionLost,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Error for AuthError {}

/// Logs the configured credential in and returns the session. Blocks by
/// ticking the platform until the completion callback arrives; login is the
/// one operation that finishes before the main loop starts.
pub fn login<A: PlatformAdapter>(
    platform: &Platform<A>,
    config: &SdkConfig,
) -> Result<Session, AuthError> {
    let options = AuthenticateOptions {
        credential_name: config.credential_name.clone(),
        dev_auth_host: config.dev_auth_host.clone(),
    };

    let (tx, rx) = oneshot::channel();
    platform.authenticate(options, move |result| {
        let _ = tx.send(result);
    });

    let result = loop {
        platform.tick();
        match rx.try_recv() {
            Ok(result) => break result,
            Err(oneshot::TryRecvError::Empty) => continue,
            Err(oneshot::TryRecvError::Disconnected) => return Err(AuthError::ConnectionLost),
        }
    };

    if !result.result_code.is_success() {
        return Err(AuthError::Rejected(result.result_code));
    }
    if result.user_id.is_empty() {
        return Err(AuthError::EmptyUserId);
    }

    trace!("login complete, user id {}", result.user_id);
    Ok(Session::new(&result.user_id))
}
