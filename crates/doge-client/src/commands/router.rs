//! Command execution: lookup, cooldown, argument binding, and scheduling

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;

use super::{ArgValue, Args, Command, Context, Converter, ParamKind};
use crate::client::Client;
use crate::error::{ClientError, ClientResult};
use crate::events::Event;

/// Last accepted invocation per `command-author` key
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_used: DashMap<String, Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(command: &str, author_id: &str) -> String {
        format!("{command}-{author_id}")
    }

    /// Time left on the cooldown for `key` at `now`, if still throttled
    pub fn remaining(&self, key: &str, cooldown: Duration, now: Instant) -> Option<Duration> {
        if cooldown.is_zero() {
            return None;
        }
        let last = *self.last_used.get(key)?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    pub fn record(&self, key: String, at: Instant) {
        self.last_used.insert(key, at);
    }

    pub fn len(&self) -> usize {
        self.last_used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_used.is_empty()
    }
}

/// Outcome of a command invocation
#[derive(Debug)]
pub enum Invocation {
    /// The handler was spawned
    Scheduled(JoinHandle<()>),
    /// Rejected by the cooldown; a `cooldown_trigger` event was fired
    Throttled { remaining: Duration },
}

/// Run the command registered under `name` (or one of its aliases).
///
/// Binding happens inline. The handler is spawned; failures inside it are
/// reported through the `error` event.
pub(crate) async fn execute(
    client: &Client,
    name: &str,
    ctx: Context,
    raw: &[String],
) -> ClientResult<Invocation> {
    let command = client
        .command(name)
        .ok_or_else(|| ClientError::CommandNotFound(name.to_string()))?;

    let invoked_at = Instant::now();
    let key = CooldownTracker::key(command.name(), &ctx.author().id);

    if let Some(remaining) =
        client
            .cooldowns()
            .remaining(&key, command.cooldown_period(), invoked_at)
    {
        tracing::debug!(
            command = %command.name(),
            author_id = %ctx.author().id,
            remaining_ms = remaining.as_millis() as u64,
            "Command on cooldown"
        );
        client.fire(Event::CooldownTrigger {
            context: ctx,
            command: command.name().to_string(),
            remaining,
        });
        return Ok(Invocation::Throttled { remaining });
    }

    let args = bind(client, &command, &ctx, raw).await?;
    client.cooldowns().record(key, invoked_at);

    tracing::debug!(
        command = %command.name(),
        invoked_with = %ctx.invoked_with,
        author_id = %ctx.author().id,
        "Command invoked"
    );

    Ok(Invocation::Scheduled(spawn_handler(client.clone(), command, ctx, args)))
}

/// Bind raw whitespace-split arguments to the command's parameters
pub(crate) async fn bind(
    client: &Client,
    command: &Command,
    ctx: &Context,
    raw: &[String],
) -> ClientResult<Args> {
    let mut args = Args::default();

    for (index, param) in command.params().iter().enumerate() {
        if index >= raw.len() {
            let Some(default) = param.default_value() else {
                return Err(ClientError::NotEnoughArguments(command.name().to_string()));
            };
            args.push(param.name(), default.clone());
            continue;
        }

        let joined;
        let value = match param.kind() {
            ParamKind::Rest => {
                joined = raw[index..].join(" ");
                joined.trim()
            }
            ParamKind::Positional => raw[index].trim(),
        };

        let bound = match param.converter_ref() {
            Converter::Custom(converter) if !value.is_empty() => {
                converter.convert(client, ctx, param, value).await?
            }
            Converter::Custom(_) => ArgValue::Str(value.to_string()),
            Converter::Basic(kind) => kind.coerce(value),
        };
        args.push(param.name(), bound);

        if param.kind() == ParamKind::Rest {
            break;
        }
    }

    Ok(args)
}

fn spawn_handler(client: Client, command: Arc<Command>, ctx: Context, args: Args) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(source) = command.invoke(client.clone(), ctx, args).await {
            client.report_error(ClientError::Handler {
                command: command.name().to_string(),
                source,
            });
        }
    })
}
