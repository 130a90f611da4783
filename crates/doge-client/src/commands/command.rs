//! Command definitions

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::{Args, Context, Param};
use crate::client::Client;

pub type CommandFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Command callback. `Bound` handlers capture whatever they need; `Unbound`
/// handlers receive the client handle as their first argument.
#[derive(Clone)]
pub enum CommandHandler {
    Bound(Arc<dyn Fn(Context, Args) -> CommandFuture + Send + Sync>),
    Unbound(Arc<dyn Fn(Client, Context, Args) -> CommandFuture + Send + Sync>),
}

/// A chat command: name, aliases, cooldown, declared parameters, and handler
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    cooldown: Duration,
    params: Vec<Param>,
    handler: CommandHandler,
}

impl Command {
    /// A command whose handler receives the client handle
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Client, Context, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::with_handler(
            name,
            CommandHandler::Unbound(Arc::new(move |client, ctx, args| {
                handler(client, ctx, args).boxed()
            })),
        )
    }

    /// A command whose handler does not need the client handle
    pub fn bound<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::with_handler(
            name,
            CommandHandler::Bound(Arc::new(move |ctx, args| handler(ctx, args).boxed())),
        )
    }

    pub fn with_handler(name: impl Into<String>, handler: CommandHandler) -> Self {
        Self {
            name: name.into().to_lowercase(),
            aliases: Vec::new(),
            cooldown: Duration::ZERO,
            params: Vec::new(),
            handler,
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|alias| alias.into().to_lowercase()));
        self
    }

    /// Per-author cooldown. Zero disables it.
    #[must_use]
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    /// The canonical name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn cooldown_period(&self) -> Duration {
        self.cooldown
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn invoke(&self, client: Client, ctx: Context, args: Args) -> CommandFuture {
        match &self.handler {
            CommandHandler::Bound(handler) => handler(ctx, args),
            CommandHandler::Unbound(handler) => handler(client, ctx, args),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("cooldown", &self.cooldown)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
