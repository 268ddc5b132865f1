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

/// An authenticated user. The id is opaque and read-only once login has
/// completed; every later operation names it as acting and target user.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_owned(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
