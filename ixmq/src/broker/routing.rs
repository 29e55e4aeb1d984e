//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Command to destination routing table.

use crate::broker::RoutingError;
use crate::transport::Endpoint;
use std::collections::{HashMap, HashSet};

/// Injective map from command names to registered destinations.
///
/// Each destination address is registered at most once and each command
/// routes to exactly one destination. A registration that would break
/// either rule is rejected as a whole and leaves the table unchanged.
///
/// # Examples
///
/// ```rust
/// use ixmq::broker::RoutingTable;
/// use ixmq::transport::Endpoint;
///
/// let mut routes = RoutingTable::new();
/// let eth = routes
///     .register(Endpoint::connect_remote("tcp://eth:5555"), &["eth_block", "eth_tx"])
///     .unwrap();
///
/// assert_eq!(routes.destination_for("eth_tx"), Some(eth));
/// assert!(routes
///     .register(Endpoint::connect_remote("tcp://other:5555"), &["eth_tx"])
///     .is_err());
/// assert_eq!(routes.destinations().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    destinations: Vec<Endpoint>,
    routes: HashMap<String, usize>,
}

impl RoutingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `destination` for `commands`, returning its index.
    pub fn register<S: AsRef<str>>(
        &mut self,
        destination: Endpoint,
        commands: &[S],
    ) -> Result<usize, RoutingError> {
        if self
            .destinations
            .iter()
            .any(|existing| existing.address() == destination.address())
        {
            return Err(RoutingError::DuplicateDestination {
                destination: destination.address().to_string(),
            });
        }
        if commands.is_empty() {
            return Err(RoutingError::NoCommands {
                destination: destination.address().to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(commands.len());
        for command in commands.iter().map(AsRef::as_ref) {
            if command.trim().is_empty() {
                return Err(RoutingError::InvalidCommand {
                    command: command.to_string(),
                });
            }
            if let Some(&index) = self.routes.get(command) {
                return Err(RoutingError::DuplicateCommand {
                    command: command.to_string(),
                    destination: self.destinations[index].address().to_string(),
                });
            }
            if !seen.insert(command) {
                return Err(RoutingError::DuplicateCommand {
                    command: command.to_string(),
                    destination: destination.address().to_string(),
                });
            }
        }

        let index = self.destinations.len();
        self.routes
            .extend(seen.into_iter().map(|command| (command.to_string(), index)));
        self.destinations.push(destination);
        Ok(index)
    }

    /// Index of the destination serving `command`.
    pub fn destination_for(&self, command: &str) -> Option<usize> {
        self.routes.get(command).copied()
    }

    /// Registered destinations in registration order.
    pub fn destinations(&self) -> &[Endpoint] {
        &self.destinations
    }

    /// Number of routed commands.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(address: &str) -> Endpoint {
        Endpoint::connect_remote(address)
    }

    #[test]
    fn test_register_assigns_indices() {
        let mut routes = RoutingTable::new();
        assert_eq!(routes.register(dest("tcp://a:1"), &["a1", "a2"]).unwrap(), 0);
        assert_eq!(routes.register(dest("tcp://b:1"), &["b1"]).unwrap(), 1);
        assert_eq!(routes.destination_for("a2"), Some(0));
        assert_eq!(routes.destination_for("b1"), Some(1));
        assert_eq!(routes.destination_for("c"), None);
        assert_eq!(routes.len(), 3);
    }

    #[test]
    fn test_duplicate_destination_leaves_table_untouched() {
        let mut routes = RoutingTable::new();
        routes.register(dest("tcp://a:1"), &["a1"]).unwrap();

        let err = routes.register(dest("tcp://a:1"), &["fresh"]).unwrap_err();
        assert!(matches!(err, RoutingError::DuplicateDestination { .. }));
        assert_eq!(routes.destination_for("fresh"), None);
        assert_eq!(routes.destinations().len(), 1);
    }

    #[test]
    fn test_duplicate_command_leaves_table_untouched() {
        let mut routes = RoutingTable::new();
        routes.register(dest("tcp://a:1"), &["shared"]).unwrap();

        let err = routes
            .register(dest("tcp://b:1"), &["fresh", "shared"])
            .unwrap_err();
        match err {
            RoutingError::DuplicateCommand {
                command,
                destination,
            } => {
                assert_eq!(command, "shared");
                assert_eq!(destination, "tcp://a:1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(routes.destination_for("fresh"), None);
        assert_eq!(routes.destination_for("shared"), Some(0));
        assert_eq!(routes.destinations().len(), 1);
    }

    #[test]
    fn test_repeated_command_in_one_registration() {
        let mut routes = RoutingTable::new();
        let err = routes.register(dest("tcp://a:1"), &["x", "x"]).unwrap_err();
        assert!(matches!(err, RoutingError::DuplicateCommand { .. }));
        assert!(routes.is_empty());
    }

    #[test]
    fn test_empty_and_blank_commands() {
        let mut routes = RoutingTable::new();
        let none: [&str; 0] = [];
        assert!(matches!(
            routes.register(dest("tcp://a:1"), &none),
            Err(RoutingError::NoCommands { .. })
        ));
        assert!(matches!(
            routes.register(dest("tcp://a:1"), &["ok", "  "]),
            Err(RoutingError::InvalidCommand { .. })
        ));
        assert!(routes.destinations().is_empty());
    }
}
