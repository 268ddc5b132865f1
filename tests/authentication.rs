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

use halcyon_rs::auth::{self, AuthError};
use halcyon_rs::config::SdkConfig;
use halcyon_rs::mock_platform::{MockFailure, MockPlatform};
use halcyon_rs::platform::Platform;
use halcyon_rs::types::ResultCode;

#[test]
fn test_login() {
    let config = SdkConfig::default();
    let platform =
        Platform::new(MockPlatform::new(), &config).expect("Failed to initialize platform");
    let session = auth::login(&platform, &config).expect("Failed to log in");
    assert!(!session.user_id().is_empty());
}

#[test]
fn test_login_is_stable_for_a_credential() {
    let config = SdkConfig::default();
    let platform =
        Platform::new(MockPlatform::new(), &config).expect("Failed to initialize platform");
    let other =
        Platform::new(MockPlatform::new(), &config).expect("Failed to initialize platform");

    let session = auth::login(&platform, &config).expect("Failed to log in");
    let session2 = auth::login(&other, &config).expect("Failed to log in");
    assert_eq!(session.user_id(), session2.user_id());
}

#[test]
fn test_login_rejects_empty_credential_name() {
    let mut config = SdkConfig::default();
    config.credential_name = String::new();
    let platform =
        Platform::new(MockPlatform::new(), &config).expect("Failed to initialize platform");

    let result = auth::login(&platform, &config);
    assert!(matches!(
        result,
        Err(AuthError::Rejected(ResultCode::InvalidCredentials))
    ));
}

#[test]
fn test_login_service_failure() {
    let config = SdkConfig::default();
    let mut mock = MockPlatform::new();
    mock.fail(MockFailure::Authenticate);
    let platform = Platform::new(mock, &config).expect("Failed to initialize platform");

    let result = auth::login(&platform, &config);
    assert!(matches!(
        result,
        Err(AuthError::Rejected(ResultCode::ServiceFailure))
    ));
}

#[test]
fn test_platform_rejects_incomplete_config() {
    let mut config = SdkConfig::default();
    config.product_id = String::new();
    assert!(Platform::new(MockPlatform::new(), &config).is_err());

    let mut config = SdkConfig::default();
    config.encryption_key = String::new();
    assert!(Platform::new(MockPlatform::new(), &config).is_err());
}
