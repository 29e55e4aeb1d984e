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

//! Command handlers and the handler table.

use crate::message::{Reply, Request};
use crate::server::ServerError;
use std::collections::HashMap;
use std::fmt;
use tracing::Span;

/// Handles one command.
///
/// Handlers receive the decoded [`Request`], the tracing span opened for the
/// command, and the shared context passed to
/// [`Server::serve`](crate::server::Server::serve). Failures are reported by
/// returning [`Reply::fail`]; a handler never aborts the server.
///
/// Any `Fn(Request, &Span, &C) -> Reply + Send` closure is a handler.
pub trait CommandHandler<C>: Send {
    /// Handles `request` and produces the reply.
    fn handle(&self, request: Request, span: &Span, context: &C) -> Reply;
}

impl<C, F> CommandHandler<C> for F
where
    F: Fn(Request, &Span, &C) -> Reply + Send,
{
    fn handle(&self, request: Request, span: &Span, context: &C) -> Reply {
        self(request, span, context)
    }
}

/// Command name to handler map.
///
/// The table is built before the server starts and moved into it at bind
/// time; handlers cannot be added once serving.
///
/// # Examples
///
/// ```rust
/// use ixmq::message::{Reply, Request};
/// use ixmq::server::HandlerTable;
/// use tracing::Span;
///
/// let mut handlers = HandlerTable::<()>::new();
/// handlers
///     .register("echo", |request: Request, _span: &Span, _ctx: &()| {
///         Reply::ok(request.parameters)
///     })
///     .unwrap();
///
/// assert!(handlers.contains("echo"));
/// assert!(handlers
///     .register("echo", |_: Request, _: &Span, _: &()| Reply::fail("dup"))
///     .is_err());
/// ```
pub struct HandlerTable<C> {
    handlers: HashMap<String, Box<dyn CommandHandler<C>>>,
}

impl<C> HandlerTable<C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a closure under `command`.
    pub fn register<F>(&mut self, command: impl Into<String>, handler: F) -> Result<(), ServerError>
    where
        F: Fn(Request, &Span, &C) -> Reply + Send + 'static,
    {
        self.register_handler(command, handler)
    }

    /// Registers any [`CommandHandler`] under `command`.
    pub fn register_handler<H>(
        &mut self,
        command: impl Into<String>,
        handler: H,
    ) -> Result<(), ServerError>
    where
        H: CommandHandler<C> + 'static,
    {
        let command = command.into();
        if command.is_empty() {
            return Err(ServerError::EmptyCommand);
        }
        if self.handlers.contains_key(&command) {
            return Err(ServerError::DuplicateHandler { command });
        }
        self.handlers.insert(command, Box::new(handler));
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, command: impl Into<String>, handler: F) -> Result<Self, ServerError>
    where
        F: Fn(Request, &Span, &C) -> Reply + Send + 'static,
    {
        self.register(command, handler)?;
        Ok(self)
    }

    /// Returns `true` if `command` has a handler.
    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered command names, unordered.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub(crate) fn get(&self, command: &str) -> Option<&dyn CommandHandler<C>> {
        self.handlers.get(command).map(|handler| handler.as_ref())
    }
}

impl<C> Default for HandlerTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for HandlerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&str> = self.commands().collect();
        commands.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("commands", &commands)
            .finish()
    }
}
