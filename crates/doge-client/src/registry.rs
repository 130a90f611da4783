//! Listener and command registry
//!
//! Every client owns a `Registry`. It starts as a snapshot of the process-wide
//! default registry (filled through [`register_listener`] and
//! [`register_command`]) and can be extended per instance afterwards.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use crate::client::Client;
use crate::commands::Command;
use crate::error::{ClientError, ClientResult};
use crate::events::{Event, EventKind};

pub type ListenerFuture = BoxFuture<'static, ()>;

/// Event listener callback
#[derive(Clone)]
pub enum Listener {
    Bound(Arc<dyn Fn(Event) -> ListenerFuture + Send + Sync>),
    Unbound(Arc<dyn Fn(Client, Event) -> ListenerFuture + Send + Sync>),
}

impl Listener {
    /// A listener that does not need the client handle
    pub fn bound<F, Fut>(listener: F) -> Self
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::Bound(Arc::new(move |event| listener(event).boxed()))
    }

    /// A listener receiving the client handle first
    pub fn unbound<F, Fut>(listener: F) -> Self
    where
        F: Fn(Client, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::Unbound(Arc::new(move |client, event| listener(client, event).boxed()))
    }

    pub(crate) fn call(&self, client: &Client, event: Event) -> ListenerFuture {
        match self {
            Self::Bound(listener) => listener(event),
            Self::Unbound(listener) => listener(client.clone(), event),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(_) => f.write_str("Listener::Bound"),
            Self::Unbound(_) => f.write_str("Listener::Unbound"),
        }
    }
}

/// Listeners by `on_*` name and commands by every name and alias
#[derive(Clone, Default)]
pub struct Registry {
    listeners: HashMap<String, Listener>,
    commands: HashMap<String, Arc<Command>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under `name` (`user_join` and `on_user_join` are
    /// the same name). A later registration under the same name replaces the
    /// earlier one.
    pub fn add_listener(&mut self, name: &str, listener: Listener) {
        let key = Self::listener_key(name);
        if EventKind::from_name(&key).is_none() {
            tracing::warn!(listener = %key, "Listener registered for an event that is never fired");
        }
        if self.listeners.insert(key.clone(), listener).is_some() {
            tracing::debug!(listener = %key, "Listener replaced");
        }
    }

    /// Register an unbound listener for an event kind
    pub fn on<F, Fut>(&mut self, kind: EventKind, listener: F)
    where
        F: Fn(Client, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.listeners
            .insert(kind.listener_name(), Listener::unbound(listener));
    }

    /// Register a command under its name and aliases.
    ///
    /// Fails without registering anything if any of them is taken.
    pub fn add_command(&mut self, command: Command) -> ClientResult<()> {
        let mut seen: Vec<&str> = Vec::new();
        for name in command.names() {
            if self.commands.contains_key(name) || seen.contains(&name) {
                return Err(ClientError::CommandAlreadyDefined(name.to_string()));
            }
            seen.push(name);
        }

        let names: Vec<String> = command.names().map(str::to_string).collect();
        let command = Arc::new(command);
        for name in names {
            self.commands.insert(name, Arc::clone(&command));
        }
        tracing::debug!(command = %command.name(), aliases = command.alias_names().len(), "Command registered");
        Ok(())
    }

    pub fn listener(&self, name: &str) -> Option<&Listener> {
        self.listeners.get(&Self::listener_key(name))
    }

    pub fn has_listener(&self, name: &str) -> bool {
        self.listener(name).is_some()
    }

    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    /// Registered commands, each once
    pub fn commands(&self) -> Vec<Arc<Command>> {
        let mut commands: Vec<Arc<Command>> = self
            .commands
            .iter()
            .filter(|(name, command)| name.as_str() == command.name())
            .map(|(_, command)| Arc::clone(command))
            .collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn listener_key(name: &str) -> String {
        let name = name.to_lowercase();
        if name.starts_with("on_") {
            name
        } else {
            format!("on_{name}")
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut listeners: Vec<&String> = self.listeners.keys().collect();
        listeners.sort();
        let commands: Vec<String> = self.commands().iter().map(|c| c.name().to_string()).collect();
        f.debug_struct("Registry")
            .field("listeners", &listeners)
            .field("commands", &commands)
            .finish()
    }
}

static DEFAULT_REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

fn default_registry() -> &'static Mutex<Registry> {
    DEFAULT_REGISTRY.get_or_init(|| Mutex::new(Registry::new()))
}

/// Register a listener in the process-wide default registry
pub fn register_listener(name: &str, listener: Listener) {
    default_registry().lock().add_listener(name, listener);
}

/// Register a command in the process-wide default registry
pub fn register_command(command: Command) -> ClientResult<()> {
    default_registry().lock().add_command(command)
}

/// Copy of the default registry, taken by each client at build time
pub fn default_snapshot() -> Registry {
    default_registry().lock().clone()
}
